//! Coordinate and geometry types shared by the surface driver, paint routines
//! and renderers.
//!
//! Canonical CPU space:
//! - Logical (layout) pixels, DPI-independent
//! - Origin top-left
//! - +X right, +Y down
//!
//! Physical pixels only appear in `surface::BackingSize` and in the renderer,
//! which converts logical geometry to NDC with a viewport uniform.

mod rect;
mod transform;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use transform::Transform;
pub use vec2::Vec2;
pub use viewport::Viewport;
