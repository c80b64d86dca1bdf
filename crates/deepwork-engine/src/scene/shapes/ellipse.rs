use crate::coords::Vec2;
use crate::paint::{Color, Paint};
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Ellipse draw payload; circles are ellipses with equal radii.
///
/// `stroke = None` fills the ellipse. `stroke = Some(w)` draws a ring of
/// width `w` centred on the outline, which is how arcs are stroked.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseCmd {
    pub center: Vec2,
    pub radii: Vec2,
    /// Rotation of the X radius, in radians.
    pub rotation: f32,
    pub paint: Paint,
    pub stroke: Option<f32>,
}

impl DrawList {
    /// Records an ellipse draw command.
    #[inline]
    pub fn push_ellipse(&mut self, z: ZIndex, cmd: EllipseCmd) {
        self.push(z, DrawCmd::Ellipse(cmd));
    }

    /// Records a solid filled circle.
    #[inline]
    pub fn push_solid_circle(&mut self, z: ZIndex, center: Vec2, radius: f32, color: Color) {
        self.push_ellipse(
            z,
            EllipseCmd {
                center,
                radii: Vec2::new(radius, radius),
                rotation: 0.0,
                paint: Paint::Solid(color),
                stroke: None,
            },
        );
    }
}
