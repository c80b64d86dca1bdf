//! deepwork engine.
//!
//! A focus timer, an embeddable render surface that keeps its backing size in
//! step with its container, and the animated paint routines shown behind the
//! countdown. The GPU, window and input layers drive it from a `winit` loop.
//!
//! - `timer`: countdown state machine with one-second ticks
//! - `surface`: sizing, event gating and containment around a paint routine
//! - `modes`: the six focus-mode paint routines and their registry
//! - `session`: start/end bookkeeping against a session backend
//! - `render`, `device`, `window`, `core`, `input`: presentation plumbing

pub mod coords;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod modes;
pub mod paint;
pub mod render;
pub mod scene;
pub mod session;
pub mod surface;
pub mod time;
pub mod timer;
pub mod window;
