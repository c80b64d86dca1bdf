use std::cell::Cell;
use std::rc::Rc;

use crate::coords::{Rect, Vec2, Viewport};

/// Surface sizing knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    /// Upper bound for the device pixel scale.
    pub max_scale: f32,
    /// Smallest usable container extent, in logical units. Smaller
    /// measurements are treated as "layout not ready yet".
    pub min_extent: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self { max_scale: 2.0, min_extent: 2.0 }
    }
}

impl SurfaceConfig {
    /// Caps a reported device pixel ratio.
    ///
    /// Non-finite or non-positive ratios resolve to 1.
    pub fn resolve_scale(&self, device_ratio: f64) -> f32 {
        let ratio = if device_ratio.is_finite() && device_ratio > 0.0 { device_ratio as f32 } else { 1.0 };
        let cap = if self.max_scale.is_finite() && self.max_scale > 0.0 { self.max_scale } else { 1.0 };
        ratio.min(cap)
    }
}

/// Backing buffer size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackingSize {
    pub width: u32,
    pub height: u32,
}

impl BackingSize {
    /// Smallest backing extent on either axis.
    pub const MIN: u32 = 2;

    /// `max(2, ceil(layout * scale))` per axis.
    pub fn for_layout(layout: Viewport, scale: f32) -> Self {
        let axis = |css: f32| -> u32 {
            let px = (css * scale).ceil();
            if px.is_finite() && px > Self::MIN as f32 { px as u32 } else { Self::MIN }
        };
        Self { width: axis(layout.width), height: axis(layout.height) }
    }
}

/// How a committed surface is presented inside the host window.
///
/// The frame is rasterized at `scale` into a `backing`-sized buffer, which is
/// then stretched over `backing / scale` logical units starting at the clip
/// origin and cut to `clip`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePlacement {
    /// Host-space rect the surface occupies, in logical units.
    pub clip: Rect,
    pub backing: BackingSize,
    pub scale: f32,
}

impl SurfacePlacement {
    /// Logical extent covered by the backing buffer.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.backing.width as f32 / self.scale, self.backing.height as f32 / self.scale)
    }

    /// Host-space rect the backing buffer is stretched over.
    pub fn dest(&self) -> Rect {
        Rect::from_origin_size(self.clip.origin, self.extent())
    }
}

/// Where the driver stands in the measure/commit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizingState {
    /// A re-measure is pending; it runs at the next repaint slot.
    #[default]
    Measuring,
    /// The committed size matches the last measurement.
    Stable,
}

/// Result of one re-measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureOutcome {
    /// Container too small; retried on the next frame.
    Deferred,
    /// New size committed and painted once.
    Resized(BackingSize),
    /// Size and scale match the committed values.
    Unchanged,
}

/// Something with a layout size the surface should fill.
pub trait Container {
    /// Current layout size in logical units.
    fn layout_size(&self) -> Viewport;

    /// Current device pixel ratio reported by the platform.
    fn device_ratio(&self) -> f64 {
        1.0
    }
}

impl<C: Container + ?Sized> Container for Rc<C> {
    fn layout_size(&self) -> Viewport {
        (**self).layout_size()
    }

    fn device_ratio(&self) -> f64 {
        (**self).device_ratio()
    }
}

/// Shared, host-writable container slot.
///
/// The host keeps one clone and updates it from layout; the surface driver
/// reads the other when it re-measures.
#[derive(Debug, Clone)]
pub struct LayoutSlot {
    size: Rc<Cell<Viewport>>,
    device_ratio: Rc<Cell<f64>>,
}

impl LayoutSlot {
    pub fn new(size: Viewport, device_ratio: f64) -> Self {
        Self {
            size: Rc::new(Cell::new(size)),
            device_ratio: Rc::new(Cell::new(device_ratio)),
        }
    }

    pub fn set_size(&self, size: Viewport) {
        self.size.set(size);
    }

    pub fn set_device_ratio(&self, ratio: f64) {
        self.device_ratio.set(ratio);
    }
}

impl Default for LayoutSlot {
    fn default() -> Self {
        Self::new(Viewport::default(), 1.0)
    }
}

impl Container for LayoutSlot {
    fn layout_size(&self) -> Viewport {
        self.size.get()
    }

    fn device_ratio(&self) -> f64 {
        self.device_ratio.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_capped_and_sanitized() {
        let cfg = SurfaceConfig::default();
        assert_eq!(cfg.resolve_scale(1.0), 1.0);
        assert_eq!(cfg.resolve_scale(1.5), 1.5);
        assert_eq!(cfg.resolve_scale(3.0), 2.0);
        assert_eq!(cfg.resolve_scale(0.0), 1.0);
        assert_eq!(cfg.resolve_scale(-2.0), 1.0);
        assert_eq!(cfg.resolve_scale(f64::NAN), 1.0);
        assert_eq!(cfg.resolve_scale(f64::INFINITY), 1.0);
    }

    #[test]
    fn backing_rounds_up_and_floors_at_two() {
        let b = BackingSize::for_layout(Viewport::new(400.0, 300.0), 2.0);
        assert_eq!(b, BackingSize { width: 800, height: 600 });

        let b = BackingSize::for_layout(Viewport::new(100.3, 50.2), 1.5);
        assert_eq!(b, BackingSize { width: 151, height: 76 });

        let b = BackingSize::for_layout(Viewport::new(0.5, 0.0), 1.0);
        assert_eq!(b, BackingSize { width: 2, height: 2 });
    }

    #[test]
    fn placement_covers_the_backing_in_logical_units() {
        let placement = SurfacePlacement {
            clip: Rect::new(0.0, 40.0, 100.3, 50.0),
            backing: BackingSize::for_layout(Viewport::new(100.3, 50.0), 1.5),
            scale: 1.5,
        };
        let dest = placement.dest();
        assert_eq!(dest.origin, Vec2::new(0.0, 40.0));
        assert!((dest.size.x - 151.0 / 1.5).abs() < 1e-4);
        assert!(dest.size.x >= placement.clip.size.x);
        assert_eq!(dest.size.y, 50.0);
    }

    #[test]
    fn layout_slot_is_shared_between_clones() {
        let host = LayoutSlot::default();
        let surface = host.clone();
        host.set_size(Viewport::new(10.0, 20.0));
        host.set_device_ratio(2.0);
        assert_eq!(surface.layout_size(), Viewport::new(10.0, 20.0));
        assert_eq!(surface.device_ratio(), 2.0);
    }
}
