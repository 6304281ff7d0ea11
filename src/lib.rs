pub mod config;
pub mod daemon;
pub mod error;
pub mod gesture;
pub mod screenshot;
pub mod source;
pub mod tracker;

pub use config::Config;
pub use daemon::{run_gesture_loop, GestureEngine};
pub use error::{Error, Result};
pub use gesture::{GestureOutcome, SwipePolicy};
pub use screenshot::{ActionTrigger, GnomeScreenshot};
pub use source::{list_touch_devices, EvdevTouchSource, TouchEvent, TouchEventSource};
pub use tracker::{ContactSlot, Lift, TouchTracker};
