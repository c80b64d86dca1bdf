//! Focus countdown timer.
//!
//! A `FocusTimer` owns a countdown of whole seconds and a one-second
//! `Interval` that is armed only while the timer runs. Hosts call `pump()`
//! once per frame; every deadline that has come due is applied as one tick.
//!
//! The timer never stops itself: at zero it keeps running with `remaining`
//! pinned to 0 until the host pauses or resets it.

mod error;
mod focus_timer;

pub use error::TimerError;
pub use focus_timer::{FocusTimer, TimerSnapshot, DEFAULT_DURATION_SECS, TICK_PERIOD};
