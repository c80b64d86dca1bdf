//! Paint model shared between the canvas and the renderer.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - paint sources (solid, linear and radial gradients)
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod gradient;

pub use color::Color;
pub use gradient::{ColorStop, LinearGradient, RadialGradient};

use crate::coords::{Transform, Vec2};

/// Paint source for filling geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        match self {
            Paint::Solid(c) => c.a >= 1.0,
            Paint::LinearGradient(g) => g.stops.iter().all(|s| s.color.a >= 1.0),
            Paint::RadialGradient(g) => g.stops.iter().all(|s| s.color.a >= 1.0),
        }
    }

    /// Applies a global opacity to every color of the paint.
    pub fn with_opacity(&self, opacity: f32) -> Paint {
        let fade = |stops: &[ColorStop]| -> Vec<ColorStop> {
            stops
                .iter()
                .map(|s| ColorStop::new(s.t, s.color.with_opacity(opacity)))
                .collect()
        };

        match self {
            Paint::Solid(c) => Paint::Solid(c.with_opacity(opacity)),
            Paint::LinearGradient(g) => Paint::LinearGradient(LinearGradient {
                stops: fade(&g.stops),
                ..g.clone()
            }),
            Paint::RadialGradient(g) => Paint::RadialGradient(RadialGradient {
                stops: fade(&g.stops),
                ..g.clone()
            }),
        }
    }

    /// Evaluates the paint at `p` using its first and last stop.
    ///
    /// Used where geometry is tessellated on the CPU and colored per vertex.
    pub fn color_at(&self, p: Vec2) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::LinearGradient(g) => {
                let axis = g.end - g.start;
                let len2 = axis.dot(axis);
                let t = if len2 > 0.0 { (p - g.start).dot(axis) / len2 } else { 0.0 };
                edge_stops(&g.stops).map_or(Color::transparent(), |(c0, c1)| c0.lerp(c1, t))
            }
            Paint::RadialGradient(g) => {
                let span = g.outer_radius - g.inner_radius;
                let t = if span > 0.0 { (p.distance(g.center) - g.inner_radius) / span } else { 0.0 };
                edge_stops(&g.stops).map_or(Color::transparent(), |(c0, c1)| c0.lerp(c1, t))
            }
        }
    }

    /// Maps gradient geometry through `transform` so it stays attached to the shape.
    pub fn transformed(&self, transform: Transform) -> Paint {
        match self {
            Paint::Solid(c) => Paint::Solid(*c),
            Paint::LinearGradient(g) => Paint::LinearGradient(LinearGradient {
                start: transform.apply(g.start),
                end: transform.apply(g.end),
                stops: g.stops.clone(),
            }),
            Paint::RadialGradient(g) => {
                let k = transform.mean_scale();
                Paint::RadialGradient(RadialGradient {
                    center: transform.apply(g.center),
                    inner_radius: g.inner_radius * k,
                    outer_radius: g.outer_radius * k,
                    stops: g.stops.clone(),
                })
            }
        }
    }
}

/// First and last stop colors; a single stop acts as a solid fill.
pub(crate) fn edge_stops(stops: &[ColorStop]) -> Option<(Color, Color)> {
    let first = stops.first()?.color;
    let last = stops.last()?.color;
    Some((first, last))
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

impl From<LinearGradient> for Paint {
    fn from(gradient: LinearGradient) -> Self {
        Paint::LinearGradient(gradient)
    }
}

impl From<RadialGradient> for Paint {
    fn from(gradient: RadialGradient) -> Self {
        Paint::RadialGradient(gradient)
    }
}
