//! Decorative per-mode paint routines.
//!
//! Each mode is a `ModeRoutine` painting one frame from read-only
//! `ModeParams` and the surface timestamp. `ModePainter` adapts the active
//! routine to the surface's `PaintRoutine` contract.

pub mod easing;

mod drift;
mod flight;
mod growth;
mod ice;
mod id;
mod orbit;
mod painter;
mod registry;
mod ripple;

use std::time::Duration;

use crate::coords::Vec2;
use crate::surface::Canvas;

pub use drift::DriftMode;
pub use flight::FlightMode;
pub use growth::GrowthMode;
pub use ice::IceMode;
pub use id::{ModeId, UnknownMode};
pub use orbit::OrbitMode;
pub use painter::ModePainter;
pub use registry::{ModeFactory, ModeRegistry};
pub use ripple::RippleMode;

/// Inputs a routine reads each frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ModeParams {
    /// Session progress in `[0, 1]`.
    pub progress: f32,
    pub is_break: bool,
    pub allow_interaction: bool,
    /// Consecutive completed sessions; growth caps it at 3.
    pub streak_level: u32,
    pub interruption_detected: bool,
}

impl Default for ModeParams {
    fn default() -> Self {
        Self {
            progress: 0.0,
            is_break: false,
            allow_interaction: true,
            streak_level: 1,
            interruption_detected: false,
        }
    }
}

impl ModeParams {
    /// Copy with `progress` clamped to `[0, 1]` (NaN becomes 0).
    pub fn sanitized(self) -> Self {
        let progress = if self.progress.is_finite() { self.progress.clamp(0.0, 1.0) } else { 0.0 };
        Self { progress, ..self }
    }
}

/// One visual mode.
pub trait ModeRoutine {
    fn paint(&mut self, canvas: &mut Canvas<'_>, params: &ModeParams, timestamp: Duration) -> anyhow::Result<()>;

    fn pointer_down(&mut self, _pos: Vec2, _timestamp: Duration, _params: &ModeParams) {}
}
