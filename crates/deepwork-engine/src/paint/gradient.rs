use crate::coords::Vec2;

use super::Color;

/// A single gradient stop.
///
/// `t` is expected in [0, 1]. Renderers use the first and last stop only.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient definition in logical pixel space.
///
/// Semantics:
/// - `start` and `end` are positions in the same coordinate space as geometry.
/// - Stops define premultiplied linear colors.
/// - Outside `[start, end]` the edge stops are extended.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>) -> Self {
        Self { start, end, stops }
    }

    /// Two-stop gradient from `c0` at `start` to `c1` at `end`.
    pub fn two(start: Vec2, end: Vec2, c0: Color, c1: Color) -> Self {
        Self::new(start, end, vec![ColorStop::new(0.0, c0), ColorStop::new(1.0, c1)])
    }

    /// Returns true when the gradient definition is structurally usable.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
            && self.stops.len() >= 2
            && (self.end.x != self.start.x || self.end.y != self.start.y)
    }
}

/// Radial gradient between two concentric circles.
///
/// Colors interpolate from `inner_radius` (first stop) to `outer_radius`
/// (last stop) around `center`. Non-concentric radial gradients from the 2D
/// canvas API are approximated by their outer circle's center.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(center: Vec2, inner_radius: f32, outer_radius: f32, stops: Vec<ColorStop>) -> Self {
        Self { center, inner_radius, outer_radius, stops }
    }

    pub fn two(center: Vec2, inner_radius: f32, outer_radius: f32, c0: Color, c1: Color) -> Self {
        Self::new(
            center,
            inner_radius,
            outer_radius,
            vec![ColorStop::new(0.0, c0), ColorStop::new(1.0, c1)],
        )
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.inner_radius.is_finite()
            && self.outer_radius.is_finite()
            && self.outer_radius > self.inner_radius
            && self.stops.len() >= 2
            && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
    }
}
