//! Contract between the runtime loop and the application.
//!
//! The runtime owns the window, GPU and input plumbing; an `App` only sees
//! window events and a per-frame `FrameCtx`.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
