//! Per-slot contact tracking.
//!
//! The kernel reports each touch contact in a numbered slot. A slot records
//! where the contact first landed and the last position seen before lift,
//! which is all the swipe evaluation needs.

/// Motion state for one contact slot.
///
/// Coordinates are screen-space. `end` stays `None` for a contact that never
/// produced a motion event after landing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContactSlot {
    pub start: Option<(f64, f64)>,
    pub end: Option<(f64, f64)>,
    pub active: bool,
}

/// Result of releasing a contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lift {
    /// Other contacts are still touching.
    Ongoing,
    /// This was the last contact on the surface. `last_moved` is true when
    /// the lifting contact had recorded motion; evaluation is skipped
    /// otherwise (a stationary release is not a swipe).
    AllUp { last_moved: bool },
}

/// Fixed-capacity table of contact slots plus the active-contact count.
///
/// Single-owner, mutated only through the three touch entry points. Events
/// referencing slots outside the capacity are dropped rather than surfaced;
/// the event source is trusted to stay in range but must never be able to
/// crash the recognizer.
#[derive(Debug)]
pub struct TouchTracker {
    slots: Vec<ContactSlot>,
    active: usize,
}

impl TouchTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![ContactSlot::default(); capacity],
            active: 0,
        }
    }

    pub fn slots(&self) -> &[ContactSlot] {
        &self.slots
    }

    /// Number of contacts currently on the surface.
    pub fn active_contacts(&self) -> usize {
        self.active
    }

    /// Record a contact landing in `slot` at screen position `(x, y)`.
    pub fn touch_down(&mut self, slot: usize, x: f64, y: f64) {
        let Some(state) = self.slots.get_mut(slot) else {
            return;
        };
        if state.active {
            return;
        }
        state.start = Some((x, y));
        state.active = true;
        self.active += 1;
    }

    /// Record motion for an active contact. Overwrites the previous endpoint.
    pub fn touch_motion(&mut self, slot: usize, x: f64, y: f64) {
        if let Some(state) = self.slots.get_mut(slot) {
            if state.active {
                state.end = Some((x, y));
            }
        }
    }

    /// Release a contact. Reports whether the surface is now empty so the
    /// caller can evaluate the finished gesture session.
    pub fn touch_up(&mut self, slot: usize) -> Lift {
        let Some(state) = self.slots.get_mut(slot) else {
            return Lift::Ongoing;
        };
        if !state.active {
            return Lift::Ongoing;
        }
        state.active = false;
        self.active -= 1;

        if self.active == 0 {
            Lift::AllUp {
                last_moved: state.end.is_some(),
            }
        } else {
            Lift::Ongoing
        }
    }

    /// Clear every slot back to the untouched state. Called once per gesture
    /// session, when the last contact lifts.
    pub fn reset(&mut self) {
        for state in &mut self.slots {
            *state = ContactSlot::default();
        }
        self.active = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn down_marks_slot_active_and_counts() {
        let mut tracker = TouchTracker::new(4);
        tracker.touch_down(0, 10.0, 20.0);
        tracker.touch_down(2, 30.0, 40.0);

        assert_eq!(tracker.active_contacts(), 2);
        assert_eq!(tracker.slots()[0].start, Some((10.0, 20.0)));
        assert!(tracker.slots()[0].active);
        assert_eq!(tracker.slots()[0].end, None);
        assert!(tracker.slots()[2].active);
        assert!(!tracker.slots()[1].active);
    }

    #[test]
    fn motion_updates_endpoint_only_while_active() {
        let mut tracker = TouchTracker::new(4);
        tracker.touch_down(1, 0.0, 100.0);
        tracker.touch_motion(1, 5.0, 150.0);
        tracker.touch_motion(1, 6.0, 200.0);
        assert_eq!(tracker.slots()[1].end, Some((6.0, 200.0)));

        // Motion on a slot that was never touched changes nothing.
        tracker.touch_motion(3, 1.0, 1.0);
        assert_eq!(tracker.slots()[3].end, None);
    }

    #[test]
    fn count_matches_active_slots_across_interleavings() {
        let mut tracker = TouchTracker::new(8);
        tracker.touch_down(0, 0.0, 0.0);
        tracker.touch_down(1, 0.0, 0.0);
        tracker.touch_motion(0, 0.0, 50.0);
        assert_eq!(tracker.touch_up(0), Lift::Ongoing);
        tracker.touch_down(2, 0.0, 0.0);

        let active = tracker.slots().iter().filter(|s| s.active).count();
        assert_eq!(tracker.active_contacts(), active);
        assert_eq!(active, 2);
    }

    #[test]
    fn last_lift_reports_all_up_with_motion_flag() {
        let mut tracker = TouchTracker::new(4);
        tracker.touch_down(0, 0.0, 100.0);
        tracker.touch_down(1, 0.0, 100.0);
        tracker.touch_motion(1, 0.0, 300.0);

        assert_eq!(tracker.touch_up(0), Lift::Ongoing);
        assert_eq!(tracker.touch_up(1), Lift::AllUp { last_moved: true });
    }

    #[test]
    fn stationary_last_lift_reports_no_motion() {
        let mut tracker = TouchTracker::new(4);
        tracker.touch_down(0, 0.0, 100.0);
        tracker.touch_motion(0, 0.0, 300.0);
        tracker.touch_down(1, 0.0, 100.0);

        assert_eq!(tracker.touch_up(0), Lift::Ongoing);
        // Slot 1 never moved, so the session must not be evaluated even
        // though slot 0 recorded motion.
        assert_eq!(tracker.touch_up(1), Lift::AllUp { last_moved: false });
    }

    #[test]
    fn noop_events_change_nothing() {
        let mut tracker = TouchTracker::new(2);
        tracker.touch_down(0, 1.0, 2.0);
        let before = tracker.slots().to_vec();
        let count = tracker.active_contacts();

        // Out-of-range slot and repeated up on an inactive slot.
        tracker.touch_down(99, 0.0, 0.0);
        tracker.touch_motion(99, 0.0, 0.0);
        assert_eq!(tracker.touch_up(99), Lift::Ongoing);
        assert_eq!(tracker.touch_up(1), Lift::Ongoing);

        assert_eq!(tracker.slots(), &before[..]);
        assert_eq!(tracker.active_contacts(), count);
    }

    #[test]
    fn double_down_on_active_slot_does_not_inflate_count() {
        let mut tracker = TouchTracker::new(2);
        tracker.touch_down(0, 1.0, 2.0);
        tracker.touch_down(0, 9.0, 9.0);
        assert_eq!(tracker.active_contacts(), 1);
        assert_eq!(tracker.slots()[0].start, Some((1.0, 2.0)));
        assert_eq!(tracker.touch_up(0), Lift::AllUp { last_moved: false });
        assert_eq!(tracker.active_contacts(), 0);
    }

    #[test]
    fn reset_clears_every_slot() {
        let mut tracker = TouchTracker::new(4);
        tracker.touch_down(0, 1.0, 2.0);
        tracker.touch_motion(0, 3.0, 4.0);
        tracker.touch_down(3, 5.0, 6.0);
        tracker.reset();

        assert_eq!(tracker.active_contacts(), 0);
        for slot in tracker.slots() {
            assert_eq!(*slot, ContactSlot::default());
        }
    }
}
