//! CPU-side preparation of a draw list for the scene pipelines.
//!
//! Rects, ellipses and lines become instanced SDF quads (`ShapeInstance`);
//! triangles become plain colored vertices (`MeshVertex`). Consecutive items
//! sharing a pipeline and clip rect are merged into one `Batch`, so paint
//! order is preserved across pipelines.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Vec2};
use crate::paint::{edge_stops, Color, Paint};
use crate::scene::shapes::line::LineCap;
use crate::scene::{DrawCmd, DrawList};

pub(super) const SHAPE_RECT: u32 = 0;
pub(super) const SHAPE_ELLIPSE: u32 = 1;
pub(super) const SHAPE_LINE: u32 = 2;

pub(super) const GRADIENT_NONE: u32 = 0;
pub(super) const GRADIENT_LINEAR: u32 = 1;
pub(super) const GRADIENT_RADIAL: u32 = 2;

/// One SDF quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct ShapeInstance {
    pub center: [f32; 2],
    pub half: [f32; 2],
    /// `(cos, sin)` of the shape's rotation.
    pub axis: [f32; 2],
    /// `[stroke_width, round_cap, 0, 0]`; zero stroke fills.
    pub params: [f32; 4],
    pub color0: [f32; 4],
    pub color1: [f32; 4],
    /// Linear: `[x0, y0, x1, y1]`. Radial: `[cx, cy, r0, r1]`.
    pub gradient: [f32; 4],
    /// `[shape kind, gradient kind]`.
    pub kinds: [u32; 2],
}

impl ShapeInstance {
    const ATTRS: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        1 => Float32x2, // center
        2 => Float32x2, // half
        3 => Float32x2, // axis
        4 => Float32x4, // params
        5 => Float32x4, // color0
        6 => Float32x4, // color1
        7 => Float32x4, // gradient
        8 => Uint32x2   // kinds
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// One vertex of a colored triangle.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct MeshVertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum Pipeline {
    Shape,
    Mesh,
}

/// A run of same-pipeline, same-clip draws. `range` indexes instances
/// (shapes) or vertices (mesh).
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Batch {
    pub pipeline: Pipeline,
    pub clip: Option<Rect>,
    pub range: Range<u32>,
}

#[derive(Debug, Default)]
pub(super) struct PreparedScene {
    pub shapes: Vec<ShapeInstance>,
    pub mesh: Vec<MeshVertex>,
    pub batches: Vec<Batch>,
}

impl PreparedScene {
    pub(super) fn clear(&mut self) {
        self.shapes.clear();
        self.mesh.clear();
        self.batches.clear();
    }

    /// Rebuilds from `list` in paint order.
    pub(super) fn build(&mut self, list: &mut DrawList) {
        self.clear();

        for item in list.iter_in_paint_order() {
            match &item.cmd {
                DrawCmd::Triangle(tri) => {
                    if !tri.points.iter().all(|p| p.is_finite()) {
                        continue;
                    }
                    let start = self.mesh.len() as u32;
                    for (p, c) in tri.points.iter().zip(tri.colors) {
                        self.mesh.push(MeshVertex { pos: [p.x, p.y], color: c.to_array() });
                    }
                    push_batch(&mut self.batches, Pipeline::Mesh, item.clip_rect, start..start + 3);
                }
                cmd => {
                    let Some(instance) = shape_instance(cmd) else { continue };
                    let start = self.shapes.len() as u32;
                    self.shapes.push(instance);
                    push_batch(&mut self.batches, Pipeline::Shape, item.clip_rect, start..start + 1);
                }
            }
        }
    }
}

fn push_batch(batches: &mut Vec<Batch>, pipeline: Pipeline, clip: Option<Rect>, range: Range<u32>) {
    if let Some(last) = batches.last_mut() {
        if last.pipeline == pipeline && last.clip == clip && last.range.end == range.start {
            last.range.end = range.end;
            return;
        }
    }
    batches.push(Batch { pipeline, clip, range });
}

/// `(color0, color1, gradient, gradient kind)` for a paint.
fn resolve_paint(paint: &Paint) -> ([f32; 4], [f32; 4], [f32; 4], u32) {
    match paint {
        Paint::Solid(c) => (c.to_array(), c.to_array(), [0.0; 4], GRADIENT_NONE),
        Paint::LinearGradient(g) => match edge_stops(&g.stops) {
            Some((c0, c1)) => (c0.to_array(), c1.to_array(), [g.start.x, g.start.y, g.end.x, g.end.y], GRADIENT_LINEAR),
            None => solid_none(),
        },
        Paint::RadialGradient(g) => match edge_stops(&g.stops) {
            Some((c0, c1)) => (
                c0.to_array(),
                c1.to_array(),
                [g.center.x, g.center.y, g.inner_radius, g.outer_radius],
                GRADIENT_RADIAL,
            ),
            None => solid_none(),
        },
    }
}

fn solid_none() -> ([f32; 4], [f32; 4], [f32; 4], u32) {
    let c = Color::transparent().to_array();
    (c, c, [0.0; 4], GRADIENT_NONE)
}

fn shape_instance(cmd: &DrawCmd) -> Option<ShapeInstance> {
    match cmd {
        DrawCmd::Rect(r) => {
            let rect = r.rect.normalized();
            if rect.is_empty() || !rect.origin.is_finite() || !rect.size.is_finite() {
                return None;
            }
            let (color0, color1, gradient, grad_kind) = resolve_paint(&r.paint);
            let half = rect.size * 0.5;
            Some(ShapeInstance {
                center: to_arr(rect.origin + half),
                half: to_arr(half),
                axis: [1.0, 0.0],
                params: [0.0; 4],
                color0,
                color1,
                gradient,
                kinds: [SHAPE_RECT, grad_kind],
            })
        }
        DrawCmd::Ellipse(e) => {
            if !(e.radii.x > 0.0 && e.radii.y > 0.0) || !e.center.is_finite() || !e.rotation.is_finite() {
                return None;
            }
            let (color0, color1, gradient, grad_kind) = resolve_paint(&e.paint);
            let stroke = e.stroke.unwrap_or(0.0).max(0.0);
            Some(ShapeInstance {
                center: to_arr(e.center),
                half: to_arr(e.radii),
                axis: to_arr(Vec2::from_angle(e.rotation)),
                params: [stroke, 0.0, 0.0, 0.0],
                color0,
                color1,
                gradient,
                kinds: [SHAPE_ELLIPSE, grad_kind],
            })
        }
        DrawCmd::Line(l) => {
            let delta = l.to - l.from;
            let len = delta.length();
            if !(l.width > 0.0) || !len.is_finite() {
                return None;
            }
            let axis = if len > f32::EPSILON { delta / len } else { Vec2::new(1.0, 0.0) };
            let color = l.color.to_array();
            let round = if l.cap == LineCap::Round { 1.0 } else { 0.0 };
            Some(ShapeInstance {
                center: to_arr((l.from + l.to) * 0.5),
                half: [len * 0.5, l.width * 0.5],
                axis: to_arr(axis),
                params: [0.0, round, 0.0, 0.0],
                color0: color,
                color1: color,
                gradient: [0.0; 4],
                kinds: [SHAPE_LINE, GRADIENT_NONE],
            })
        }
        DrawCmd::Triangle(_) => None,
    }
}

#[inline]
fn to_arr(v: Vec2) -> [f32; 2] {
    [v.x, v.y]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{LinearGradient, RadialGradient};
    use crate::scene::shapes::line::LineCmd;
    use crate::scene::ZIndex;

    fn z() -> ZIndex {
        ZIndex::default()
    }

    #[test]
    fn batches_follow_paint_order_across_pipelines() {
        let mut list = DrawList::new();
        list.push_rect(z(), Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        list.push_solid_circle(z(), Vec2::new(5.0, 5.0), 3.0, Color::WHITE);
        list.push_triangle(z(), [Vec2::zero(), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)], [Color::WHITE; 3]);
        list.push_triangle(z(), [Vec2::zero(), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)], [Color::WHITE; 3]);
        list.push_rect(z(), Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);

        let mut prepared = PreparedScene::default();
        prepared.build(&mut list);

        assert_eq!(prepared.shapes.len(), 3);
        assert_eq!(prepared.mesh.len(), 6);
        assert_eq!(
            prepared.batches,
            vec![
                Batch { pipeline: Pipeline::Shape, clip: None, range: 0..2 },
                Batch { pipeline: Pipeline::Mesh, clip: None, range: 0..6 },
                Batch { pipeline: Pipeline::Shape, clip: None, range: 2..3 },
            ]
        );
    }

    #[test]
    fn clip_changes_split_batches() {
        let mut list = DrawList::new();
        list.push_rect(z(), Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        list.push_clip(Rect::new(0.0, 0.0, 5.0, 5.0));
        list.push_rect(z(), Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
        list.pop_clip();

        let mut prepared = PreparedScene::default();
        prepared.build(&mut list);
        assert_eq!(prepared.batches.len(), 2);
        assert_eq!(prepared.batches[1].clip, Some(Rect::new(0.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn degenerate_shapes_are_dropped() {
        let mut list = DrawList::new();
        list.push_rect(z(), Rect::new(0.0, 0.0, 0.0, 10.0), Color::WHITE);
        list.push_solid_circle(z(), Vec2::zero(), 0.0, Color::WHITE);
        list.push_line(
            z(),
            LineCmd { from: Vec2::zero(), to: Vec2::new(1.0, 0.0), width: 0.0, color: Color::WHITE, cap: LineCap::Butt },
        );

        let mut prepared = PreparedScene::default();
        prepared.build(&mut list);
        assert!(prepared.shapes.is_empty());
        assert!(prepared.batches.is_empty());
    }

    #[test]
    fn line_becomes_oriented_quad() {
        let cmd = DrawCmd::Line(LineCmd {
            from: Vec2::new(0.0, 0.0),
            to: Vec2::new(0.0, 10.0),
            width: 4.0,
            color: Color::WHITE,
            cap: LineCap::Round,
        });
        let inst = shape_instance(&cmd).expect("line instance");
        assert_eq!(inst.center, [0.0, 5.0]);
        assert_eq!(inst.half, [5.0, 2.0]);
        assert_eq!(inst.axis, [0.0, 1.0]);
        assert_eq!(inst.params[1], 1.0);
    }

    #[test]
    fn gradients_resolve_to_edge_stops() {
        let lin = Paint::from(LinearGradient::two(Vec2::zero(), Vec2::new(0.0, 10.0), Color::WHITE, Color::transparent()));
        let (c0, c1, g, kind) = resolve_paint(&lin);
        assert_eq!((c0, c1, g, kind), (Color::WHITE.to_array(), [0.0; 4], [0.0, 0.0, 0.0, 10.0], GRADIENT_LINEAR));

        let rad = Paint::from(RadialGradient::two(Vec2::new(1.0, 2.0), 3.0, 4.0, Color::WHITE, Color::WHITE));
        let (_, _, g, kind) = resolve_paint(&rad);
        assert_eq!((g, kind), ([1.0, 2.0, 3.0, 4.0], GRADIENT_RADIAL));
    }
}
