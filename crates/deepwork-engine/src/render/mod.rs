//! GPU rendering subsystem.
//!
//! `SceneRenderer` consumes `scene::DrawList` streams and issues GPU commands
//! via wgpu. It owns its GPU resources (pipelines, buffers).
//! `SurfaceCompositor` rasterizes a surface frame offscreen at the surface's
//! capped scale and stretches it into the window.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod batch;
mod common;
mod ctx;
mod layer;
mod scene;

pub use ctx::{RenderCtx, RenderTarget};
pub use layer::SurfaceCompositor;
pub use scene::SceneRenderer;
