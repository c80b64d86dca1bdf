use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Filled triangle with per-vertex colors.
///
/// Polygons, rotated rectangles and filled paths are tessellated into these.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriangleCmd {
    pub points: [Vec2; 3],
    pub colors: [Color; 3],
}

impl DrawList {
    /// Records a triangle.
    #[inline]
    pub fn push_triangle(&mut self, z: ZIndex, points: [Vec2; 3], colors: [Color; 3]) {
        self.push(z, DrawCmd::Triangle(TriangleCmd { points, colors }));
    }
}
