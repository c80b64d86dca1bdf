use crate::coords::{Transform, Vec2};
use crate::scene::shapes::ellipse::EllipseCmd;
use crate::scene::shapes::line::LineCmd;
use crate::scene::shapes::rect::RectCmd;
use crate::scene::shapes::triangle::TriangleCmd;

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a new shape module under `scene::shapes::*`
/// - add a new variant here
/// - implement push helpers inside that shape module
/// - teach `render::SceneRenderer` how to batch it
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Ellipse(EllipseCmd),
    Line(LineCmd),
    Triangle(TriangleCmd),
}

impl DrawCmd {
    /// Returns the command shifted by `offset` logical pixels.
    pub fn translated(&self, offset: Vec2) -> DrawCmd {
        let t = Transform::translation(offset.x, offset.y);
        match self {
            DrawCmd::Rect(c) => DrawCmd::Rect(RectCmd {
                rect: c.rect.translated(offset),
                paint: c.paint.transformed(t),
            }),
            DrawCmd::Ellipse(c) => DrawCmd::Ellipse(EllipseCmd {
                center: c.center + offset,
                paint: c.paint.transformed(t),
                ..c.clone()
            }),
            DrawCmd::Line(c) => DrawCmd::Line(LineCmd {
                from: c.from + offset,
                to: c.to + offset,
                ..*c
            }),
            DrawCmd::Triangle(c) => DrawCmd::Triangle(TriangleCmd {
                points: c.points.map(|p| p + offset),
                colors: c.colors,
            }),
        }
    }
}
