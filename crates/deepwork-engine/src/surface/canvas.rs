use crate::coords::{Rect, Transform, Vec2, Viewport};
use crate::paint::{Color, Paint};
use crate::scene::shapes::ellipse::EllipseCmd;
use crate::scene::shapes::line::{LineCap, LineCmd};
use crate::scene::{DrawList, Path, ZIndex};

#[derive(Debug, Copy, Clone)]
struct CanvasState {
    transform: Transform,
    alpha: f32,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self { transform: Transform::IDENTITY, alpha: 1.0 }
    }
}

/// Immediate-mode drawing context handed to paint routines.
///
/// Geometry is given in logical units (one unit = one layout pixel) and
/// recorded into a `DrawList` in paint order. The canvas keeps a
/// `save`/`restore` stack of transform and global alpha, mirroring the 2D
/// context API the routines are modelled on.
pub struct Canvas<'a> {
    list: &'a mut DrawList,
    size: Viewport,
    state: CanvasState,
    stack: Vec<CanvasState>,
}

impl<'a> Canvas<'a> {
    pub fn new(list: &'a mut DrawList, size: Viewport) -> Self {
        Self { list, size, state: CanvasState::default(), stack: Vec::new() }
    }

    #[inline]
    pub fn size(&self) -> Viewport {
        self.size
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_viewport(self.size)
    }

    // ── state ─────────────────────────────────────────────────────────────

    pub fn save(&mut self) {
        self.stack.push(self.state);
    }

    /// Pops the last saved state; unbalanced calls are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    #[inline]
    pub fn transform(&self) -> Transform {
        self.state.transform
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform.then(Transform::translation(x, y));
    }

    pub fn rotate(&mut self, angle: f32) {
        self.state.transform = self.state.transform.then(Transform::rotation(angle));
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.then(Transform::scaling(sx, sy));
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.state.alpha
    }

    /// Sets the global alpha applied to everything drawn afterwards.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = if alpha.is_finite() { alpha.clamp(0.0, 1.0) } else { 1.0 };
    }

    // ── fills ─────────────────────────────────────────────────────────────

    /// Fills the whole canvas.
    pub fn fill_all(&mut self, paint: impl Into<Paint>) {
        let bounds = self.bounds();
        self.save();
        self.state.transform = Transform::IDENTITY;
        self.fill_rect(bounds, paint);
        self.restore();
    }

    pub fn fill_rect(&mut self, rect: Rect, paint: impl Into<Paint>) {
        let paint = paint.into();
        let t = self.state.transform;

        if t.is_axis_aligned() {
            let p0 = t.apply(rect.origin);
            let p1 = t.apply(rect.max());
            let mapped = Rect::from_origin_size(p0, p1 - p0).normalized();
            let paint = paint.transformed(t).with_opacity(self.state.alpha);
            self.list.push_rect(ZIndex::default(), mapped, paint);
            return;
        }

        let min = rect.origin;
        let max = rect.max();
        let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        self.fill_polygon_local(&corners, &paint);
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, paint: impl Into<Paint>) {
        self.fill_ellipse(center, Vec2::new(radius, radius), 0.0, paint);
    }

    pub fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, paint: impl Into<Paint>) {
        self.push_ellipse(center, radii, rotation, paint.into(), None);
    }

    // ── strokes ───────────────────────────────────────────────────────────

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        self.stroke_ellipse(center, Vec2::new(radius, radius), 0.0, width, color);
    }

    pub fn stroke_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, width: f32, color: Color) {
        let scaled = width * self.state.transform.mean_scale();
        self.push_ellipse(center, radii, rotation, Paint::Solid(color), Some(scaled));
    }

    pub fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.line(from, to, width, color, LineCap::Butt);
    }

    pub fn stroke_line_round(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.line(from, to, width, color, LineCap::Round);
    }

    /// Strokes a straight dashed line starting with a dash.
    pub fn stroke_dashed_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, dash: f32, gap: f32) {
        let len = from.distance(to);
        if len <= 0.0 || dash <= 0.0 {
            return;
        }
        let dir = (to - from) / len;
        let step = dash + gap.max(0.0);

        let mut at = 0.0;
        while at < len {
            let end = (at + dash).min(len);
            self.line(from + dir * at, from + dir * end, width, color, LineCap::Butt);
            at += step;
        }
    }

    // ── paths ─────────────────────────────────────────────────────────────

    /// Fills every sub-path with at least three points as a triangle fan.
    ///
    /// Correct for convex and star-shaped outlines.
    pub fn fill_path(&mut self, path: &Path, paint: impl Into<Paint>) {
        let paint = paint.into();
        for sub in path.subpaths() {
            if sub.points.len() >= 3 {
                self.fill_polygon_local(&sub.points, &paint);
            }
        }
    }

    /// Strokes every sub-path with round-capped segments.
    pub fn stroke_path(&mut self, path: &Path, width: f32, color: Color) {
        for sub in path.subpaths() {
            for pair in sub.points.windows(2) {
                self.line(pair[0], pair[1], width, color, LineCap::Round);
            }
            if sub.closed && sub.points.len() > 2 {
                if let (Some(&last), Some(&first)) = (sub.points.last(), sub.points.first()) {
                    self.line(last, first, width, color, LineCap::Round);
                }
            }
        }
    }

    // ── internals ─────────────────────────────────────────────────────────

    fn push_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, paint: Paint, stroke: Option<f32>) {
        let t = self.state.transform;
        let (sx, sy) = t.axis_scales();
        self.list.push_ellipse(
            ZIndex::default(),
            EllipseCmd {
                center: t.apply(center),
                radii: Vec2::new(radii.x.abs() * sx, radii.y.abs() * sy),
                rotation: rotation + t.rotation_angle(),
                paint: paint.transformed(t).with_opacity(self.state.alpha),
                stroke,
            },
        );
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color, cap: LineCap) {
        let t = self.state.transform;
        self.list.push_line(
            ZIndex::default(),
            LineCmd {
                from: t.apply(from),
                to: t.apply(to),
                width: width * t.mean_scale(),
                color: color.with_opacity(self.state.alpha),
                cap,
            },
        );
    }

    /// Fan-triangulates `points` (local space), coloring each vertex by
    /// evaluating `paint` before the transform.
    fn fill_polygon_local(&mut self, points: &[Vec2], paint: &Paint) {
        let t = self.state.transform;
        let alpha = self.state.alpha;
        let vertex = |p: Vec2| (t.apply(p), paint.color_at(p).with_opacity(alpha));

        let Some(&anchor) = points.first() else {
            return;
        };
        let (a, ca) = vertex(anchor);
        for pair in points[1..].windows(2) {
            let (b, cb) = vertex(pair[0]);
            let (c, cc) = vertex(pair[1]);
            self.list.push_triangle(ZIndex::default(), [a, b, c], [ca, cb, cc]);
        }
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::scene::DrawCmd;

    fn canvas_cmds(f: impl FnOnce(&mut Canvas<'_>)) -> Vec<DrawCmd> {
        let mut list = DrawList::new();
        {
            let mut canvas = Canvas::new(&mut list, Viewport::new(100.0, 50.0));
            f(&mut canvas);
        }
        list.items().iter().map(|i| i.cmd.clone()).collect()
    }

    #[test]
    fn translated_rect_stays_a_rect() {
        let cmds = canvas_cmds(|c| {
            c.translate(10.0, 5.0);
            c.fill_rect(Rect::new(0.0, 0.0, 4.0, 2.0), Color::WHITE);
        });
        match &cmds[..] {
            [DrawCmd::Rect(r)] => assert_eq!(r.rect, Rect::new(10.0, 5.0, 4.0, 2.0)),
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn rotated_rect_becomes_two_triangles() {
        let cmds = canvas_cmds(|c| {
            c.rotate(0.3);
            c.fill_rect(Rect::new(0.0, 0.0, 4.0, 2.0), Color::WHITE);
        });
        assert_eq!(cmds.len(), 2);
        assert!(cmds.iter().all(|c| matches!(c, DrawCmd::Triangle(_))));
    }

    #[test]
    fn save_restore_rolls_back_transform_and_alpha() {
        let cmds = canvas_cmds(|c| {
            c.save();
            c.translate(50.0, 0.0);
            c.set_alpha(0.5);
            c.restore();
            c.fill_circle(Vec2::new(1.0, 2.0), 3.0, Color::WHITE);
        });
        match &cmds[..] {
            [DrawCmd::Ellipse(e)] => {
                assert_eq!(e.center, Vec2::new(1.0, 2.0));
                assert_eq!(e.paint, Paint::Solid(Color::WHITE));
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let cmds = canvas_cmds(|c| {
            c.restore();
            c.stroke_line(Vec2::zero(), Vec2::new(1.0, 0.0), 2.0, Color::WHITE);
        });
        assert_eq!(cmds.len(), 1);
    }

    #[test]
    fn alpha_multiplies_colors() {
        let cmds = canvas_cmds(|c| {
            c.set_alpha(0.25);
            c.stroke_line(Vec2::zero(), Vec2::new(1.0, 0.0), 2.0, Color::WHITE);
        });
        match &cmds[..] {
            [DrawCmd::Line(l)] => assert_eq!(l.color.a, 0.25),
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn scale_and_rotation_reach_ellipses_and_strokes() {
        let cmds = canvas_cmds(|c| {
            c.scale(2.0, 2.0);
            c.rotate(FRAC_PI_2);
            c.stroke_ellipse(Vec2::zero(), Vec2::new(3.0, 1.0), 0.0, 1.5, Color::WHITE);
        });
        match &cmds[..] {
            [DrawCmd::Ellipse(e)] => {
                assert!((e.radii.x - 6.0).abs() < 1e-4);
                assert!((e.radii.y - 2.0).abs() < 1e-4);
                assert!((e.rotation - FRAC_PI_2).abs() < 1e-4);
                assert_eq!(e.stroke.map(|w| (w * 100.0).round()), Some(300.0));
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn dashed_line_emits_segments() {
        let cmds = canvas_cmds(|c| {
            c.stroke_dashed_line(Vec2::zero(), Vec2::new(100.0, 0.0), 2.0, Color::WHITE, 20.0, 15.0);
        });
        // Dashes start at 0, 35, 70.
        assert_eq!(cmds.len(), 3);
        match &cmds[2] {
            DrawCmd::Line(l) => {
                assert_eq!(l.from, Vec2::new(70.0, 0.0));
                assert_eq!(l.to, Vec2::new(90.0, 0.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn fill_path_fans_triangles() {
        let path = Path::new()
            .move_to(Vec2::new(0.0, 0.0))
            .line_to(Vec2::new(10.0, 0.0))
            .line_to(Vec2::new(10.0, 10.0))
            .line_to(Vec2::new(0.0, 10.0))
            .close();
        let cmds = canvas_cmds(|c| c.fill_path(&path, Color::WHITE));
        assert_eq!(cmds.len(), 2);
    }

    #[test]
    fn fill_all_ignores_current_transform() {
        let cmds = canvas_cmds(|c| {
            c.translate(30.0, 30.0);
            c.fill_all(Color::WHITE);
        });
        match &cmds[..] {
            [DrawCmd::Rect(r)] => assert_eq!(r.rect, Rect::new(0.0, 0.0, 100.0, 50.0)),
            other => panic!("unexpected commands: {other:?}"),
        }
    }
}
