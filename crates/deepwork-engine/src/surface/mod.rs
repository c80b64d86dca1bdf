//! Render-surface driver.
//!
//! A surface fills a host-provided container, tracks its size times a capped
//! device pixel scale, and repaints through a `PaintRoutine` once per frame
//! slot. Sizing follows a small state machine:
//!
//! - `Measuring`: a re-measure runs at the next slot. Containers smaller than
//!   `min_extent` keep the surface here (layout not ready yet).
//! - `Stable`: the committed size matches the container.
//!
//! A committed resize paints once immediately with timestamp zero. Failed or
//! panicking paints are contained; the last good frame stays visible.

mod canvas;
mod driver;
mod sizing;

pub use canvas::Canvas;
pub use driver::{Listener, PaintRoutine, SurfaceDriver, SurfaceEvent, SurfaceStats};
pub use sizing::{BackingSize, Container, LayoutSlot, MeasureOutcome, SizingState, SurfaceConfig, SurfacePlacement};
