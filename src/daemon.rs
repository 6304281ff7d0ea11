//! Event dispatch loop and gesture session bookkeeping.

use crate::config::Config;
use crate::error::Result;
use crate::gesture::{GestureOutcome, SwipePolicy};
use crate::screenshot::{ActionTrigger, GnomeScreenshot};
use crate::source::{open_touch_device, EvdevTouchSource, TouchEvent, TouchEventSource};
use crate::tracker::{Lift, TouchTracker};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const POLL_BACKOFF: Duration = Duration::from_millis(2);

/// Routes touch events into the tracker and evaluates the session when the
/// last contact lifts.
pub struct GestureEngine {
    tracker: TouchTracker,
    policy: SwipePolicy,
}

impl GestureEngine {
    pub fn new(policy: SwipePolicy, capacity: usize) -> Self {
        Self {
            tracker: TouchTracker::new(capacity),
            policy,
        }
    }

    /// Dispatch one event. On the lift that empties the surface, evaluate
    /// the session (unless the lifting contact never moved), fire the
    /// trigger on recognition, and reset the table.
    ///
    /// Returns the evaluation outcome; non-terminal events are `NoGesture`.
    pub fn process(&mut self, event: TouchEvent, trigger: &mut dyn ActionTrigger) -> GestureOutcome {
        match event {
            TouchEvent::Down { slot, x, y } => {
                self.tracker.touch_down(slot, x, y);
                GestureOutcome::NoGesture
            }
            TouchEvent::Motion { slot, x, y } => {
                self.tracker.touch_motion(slot, x, y);
                GestureOutcome::NoGesture
            }
            TouchEvent::Up { slot } => match self.tracker.touch_up(slot) {
                Lift::Ongoing => GestureOutcome::NoGesture,
                Lift::AllUp { last_moved } => {
                    let outcome = if last_moved {
                        self.policy.evaluate(self.tracker.slots())
                    } else {
                        debug!("last contact had no motion, skipping evaluation");
                        GestureOutcome::NoGesture
                    };

                    if outcome == GestureOutcome::Recognized {
                        info!("swipe recognized");
                        if let Err(e) = trigger.fire() {
                            warn!("trigger failed: {}", e);
                        }
                    }

                    self.tracker.reset();
                    outcome
                }
            },
        }
    }

    pub fn tracker(&self) -> &TouchTracker {
        &self.tracker
    }
}

/// Poll the source and dispatch until it reports a fatal error.
///
/// Single-threaded and strictly sequential: classification, state mutation,
/// and the trigger all run on this thread. Empty polls back off briefly.
pub fn run_gesture_loop(
    source: &mut dyn TouchEventSource,
    engine: &mut GestureEngine,
    trigger: &mut dyn ActionTrigger,
) -> Result<()> {
    loop {
        match source.poll_events() {
            Ok(batch) => {
                if batch.is_empty() {
                    thread::sleep(POLL_BACKOFF);
                    continue;
                }
                for event in batch {
                    engine.process(event, trigger);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(POLL_BACKOFF);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Open the configured device and run the daemon until the device goes away.
pub fn run(config: &Config) -> Result<()> {
    let (path, device) = open_touch_device(config.device.as_deref())?;
    info!(
        device = device.name().unwrap_or("unknown"),
        path = %path.display(),
        "watching touch device"
    );

    // Remember an interactively picked device so the next run skips the
    // prompt.
    if config.device.is_none() {
        let mut chosen = config.clone();
        chosen.device = Some(path.display().to_string());
        match chosen.save() {
            Ok(()) => info!("device saved to {}", Config::path().display()),
            Err(e) => warn!("failed to save config: {}", e),
        }
    }

    let mut source = EvdevTouchSource::new(device, config.screen_width, config.screen_height)?;
    let mut engine = GestureEngine::new(
        SwipePolicy {
            fingers: config.fingers,
            distance_threshold: config.distance_threshold,
        },
        config.max_slots,
    );
    let mut trigger = GnomeScreenshot::connect()?;

    info!(
        fingers = config.fingers,
        threshold = config.distance_threshold,
        "waiting for swipes"
    );
    run_gesture_loop(&mut source, &mut engine, &mut trigger)
}
