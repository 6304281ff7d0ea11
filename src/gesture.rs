//! Swipe recognition policy.

use crate::tracker::ContactSlot;

/// Result of evaluating a finished gesture session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
    NoGesture,
    Recognized,
}

/// Recognition policy for an N-finger vertical swipe.
///
/// Only the summed vertical displacement and the number of moving contacts
/// are considered. No horizontal distance, timing, or velocity terms: the
/// smaller decision surface is deliberate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwipePolicy {
    /// Exact number of contacts that must have moved.
    pub fingers: usize,
    /// Minimum summed vertical travel, in screen units. Y grows downward on
    /// screen, so a positive threshold recognizes downward screen-space
    /// motion.
    pub distance_threshold: f64,
}

impl Default for SwipePolicy {
    fn default() -> Self {
        Self {
            fingers: 3,
            distance_threshold: 200.0,
        }
    }
}

impl SwipePolicy {
    /// Scan the slot table and decide whether the session was a swipe.
    ///
    /// A slot participates only when both its start and end positions were
    /// recorded. Stateless: all session state lives in the slot table.
    pub fn evaluate(&self, slots: &[ContactSlot]) -> GestureOutcome {
        let mut total_y = 0.0;
        let mut valid = 0usize;

        for slot in slots {
            if let (Some((_, start_y)), Some((_, end_y))) = (slot.start, slot.end) {
                total_y += end_y - start_y;
                valid += 1;
            }
        }

        if valid == self.fingers && total_y > self.distance_threshold {
            GestureOutcome::Recognized
        } else {
            GestureOutcome::NoGesture
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TouchTracker;

    fn three_finger_swipe(travel: f64) -> TouchTracker {
        let mut tracker = TouchTracker::new(20);
        for slot in 0..3 {
            tracker.touch_down(slot, 100.0, 100.0);
            tracker.touch_motion(slot, 100.0, 100.0 + travel);
        }
        tracker
    }

    #[test]
    fn three_fingers_past_threshold_recognized() {
        // Scenario: three contacts travel 250 units down, total 750 > 200.
        let tracker = three_finger_swipe(250.0);
        let policy = SwipePolicy::default();
        assert_eq!(
            policy.evaluate(tracker.slots()),
            GestureOutcome::Recognized
        );
    }

    #[test]
    fn two_fingers_is_not_enough() {
        let mut tracker = TouchTracker::new(20);
        for slot in 0..2 {
            tracker.touch_down(slot, 100.0, 100.0);
            tracker.touch_motion(slot, 100.0, 350.0);
        }
        let policy = SwipePolicy::default();
        assert_eq!(policy.evaluate(tracker.slots()), GestureOutcome::NoGesture);
    }

    #[test]
    fn four_fingers_is_too_many() {
        let mut tracker = TouchTracker::new(20);
        for slot in 0..4 {
            tracker.touch_down(slot, 100.0, 100.0);
            tracker.touch_motion(slot, 100.0, 350.0);
        }
        let policy = SwipePolicy::default();
        assert_eq!(policy.evaluate(tracker.slots()), GestureOutcome::NoGesture);
    }

    #[test]
    fn short_travel_below_threshold_rejected() {
        // Three contacts moving 50 units each: total 150 < 200.
        let tracker = three_finger_swipe(50.0);
        let policy = SwipePolicy::default();
        assert_eq!(policy.evaluate(tracker.slots()), GestureOutcome::NoGesture);
    }

    #[test]
    fn upward_motion_is_rejected() {
        // Negative vertical travel never exceeds a positive threshold.
        let tracker = three_finger_swipe(-300.0);
        let policy = SwipePolicy::default();
        assert_eq!(policy.evaluate(tracker.slots()), GestureOutcome::NoGesture);
    }

    #[test]
    fn total_at_exact_threshold_rejected() {
        // The comparison is strictly greater-than.
        let tracker = three_finger_swipe(100.0);
        let policy = SwipePolicy {
            fingers: 3,
            distance_threshold: 300.0,
        };
        assert_eq!(policy.evaluate(tracker.slots()), GestureOutcome::NoGesture);
    }

    #[test]
    fn empty_table_is_no_gesture() {
        let tracker = TouchTracker::new(20);
        let policy = SwipePolicy::default();
        assert_eq!(policy.evaluate(tracker.slots()), GestureOutcome::NoGesture);
    }

    #[test]
    fn slots_without_motion_do_not_participate() {
        let mut tracker = TouchTracker::new(20);
        for slot in 0..3 {
            tracker.touch_down(slot, 100.0, 100.0);
            tracker.touch_motion(slot, 100.0, 400.0);
        }
        // A fourth contact that never moved must not break the exact count.
        tracker.touch_down(3, 100.0, 100.0);
        let policy = SwipePolicy::default();
        assert_eq!(
            policy.evaluate(tracker.slots()),
            GestureOutcome::Recognized
        );
    }
}
