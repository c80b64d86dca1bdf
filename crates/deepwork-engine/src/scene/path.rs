//! Minimal path builder.
//!
//! Curves are flattened to polylines at build time so the canvas only ever
//! deals with straight segments.

use crate::coords::Vec2;

/// Number of segments used to flatten one curve.
const CURVE_SEGMENTS: usize = 16;

/// One connected run of points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubPath {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

/// A sequence of sub-paths built with `move_to` / `line_to` / curve commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    subpaths: Vec<SubPath>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    /// Starts a new sub-path at `p`.
    pub fn move_to(mut self, p: Vec2) -> Self {
        self.subpaths.push(SubPath { points: vec![p], closed: false });
        self
    }

    /// Adds a straight segment; starts a sub-path if none is open.
    pub fn line_to(mut self, p: Vec2) -> Self {
        match self.subpaths.last_mut() {
            Some(sp) if !sp.closed => sp.points.push(p),
            _ => self.subpaths.push(SubPath { points: vec![p], closed: false }),
        }
        self
    }

    /// Quadratic Bézier from the current point through `ctrl` to `end`.
    pub fn quad_to(self, ctrl: Vec2, end: Vec2) -> Self {
        let Some(start) = self.current_point() else {
            return self.move_to(end);
        };
        let mut path = self;
        for i in 1..=CURVE_SEGMENTS {
            let t = i as f32 / CURVE_SEGMENTS as f32;
            path = path.line_to(quadratic_point(start, ctrl, end, t));
        }
        path
    }

    /// Cubic Bézier from the current point through `c1`, `c2` to `end`.
    pub fn cubic_to(self, c1: Vec2, c2: Vec2, end: Vec2) -> Self {
        let Some(start) = self.current_point() else {
            return self.move_to(end);
        };
        let mut path = self;
        for i in 1..=CURVE_SEGMENTS {
            let t = i as f32 / CURVE_SEGMENTS as f32;
            path = path.line_to(cubic_point(start, c1, c2, end, t));
        }
        path
    }

    /// Closes the current sub-path.
    pub fn close(mut self) -> Self {
        if let Some(sp) = self.subpaths.last_mut() {
            sp.closed = true;
        }
        self
    }

    fn current_point(&self) -> Option<Vec2> {
        self.subpaths.last().and_then(|sp| sp.points.last().copied())
    }
}

/// Point on a quadratic Bézier at `t`.
#[inline]
pub fn quadratic_point(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

/// Point on a cubic Bézier at `t`.
#[inline]
pub fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}
