//! Time subsystem.
//!
//! Provides stable, testable timing utilities without coupling to the runtime:
//! - `Clock`: injected monotonic time source (`SystemClock` in production,
//!   `ManualClock` in tests)
//! - `Interval`: fixed-period schedule polled against a clock (timer ticks)
//! - `FrameClock`: per-surface repaint timestamps and delta time

mod clock;
mod frame_clock;
mod interval;

pub use clock::{Clock, ManualClock, SystemClock};
pub use frame_clock::{FrameClock, FrameTime};
pub use interval::Interval;
