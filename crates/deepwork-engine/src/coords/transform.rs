use super::Vec2;

/// 2D affine transform (row-major 2x3).
///
/// Maps `p` to `(a*x + c*y + e, b*x + d*y + f)`, matching the canvas
/// convention of the browser 2D context the paint routines were written for.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[inline]
    pub const fn translation(x: f32, y: f32) -> Self {
        Self { e: x, f: y, ..Self::IDENTITY }
    }

    #[inline]
    pub const fn scaling(sx: f32, sy: f32) -> Self {
        Self { a: sx, d: sy, ..Self::IDENTITY }
    }

    #[inline]
    pub fn rotation(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self { a: c, b: s, c: -s, d: c, e: 0.0, f: 0.0 }
    }

    /// Returns `self * rhs`: `rhs` is applied first, then `self`.
    #[inline]
    pub fn then(self, rhs: Transform) -> Transform {
        Transform {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            e: self.a * rhs.e + self.c * rhs.f + self.e,
            f: self.b * rhs.e + self.d * rhs.f + self.f,
        }
    }

    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Applies only the linear part (no translation).
    #[inline]
    pub fn apply_vector(self, v: Vec2) -> Vec2 {
        Vec2::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    /// Rotation angle of the X basis vector, in radians.
    #[inline]
    pub fn rotation_angle(self) -> f32 {
        self.b.atan2(self.a)
    }

    /// Length of the transformed X and Y basis vectors.
    #[inline]
    pub fn axis_scales(self) -> (f32, f32) {
        (Vec2::new(self.a, self.b).length(), Vec2::new(self.c, self.d).length())
    }

    /// Geometric mean of the axis scales; used to scale stroke widths.
    #[inline]
    pub fn mean_scale(self) -> f32 {
        let (sx, sy) = self.axis_scales();
        (sx * sy).sqrt()
    }

    /// True when the transform keeps axis-aligned rectangles axis-aligned.
    #[inline]
    pub fn is_axis_aligned(self) -> bool {
        self.b.abs() <= f32::EPSILON && self.c.abs() <= f32::EPSILON
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn translate_then_rotate_matches_canvas_order() {
        // ctx.translate(10, 0); ctx.rotate(π/2): a point at (1, 0) lands at (10, 1).
        let t = Transform::translation(10.0, 0.0).then(Transform::rotation(FRAC_PI_2));
        assert!(close(t.apply(Vec2::new(1.0, 0.0)), Vec2::new(10.0, 1.0)));
    }

    #[test]
    fn scaling_reports_axis_scales() {
        let t = Transform::scaling(2.0, 3.0);
        assert_eq!(t.axis_scales(), (2.0, 3.0));
        assert!(t.is_axis_aligned());
        assert!(!Transform::rotation(0.3).is_axis_aligned());
    }

    #[test]
    fn vectors_ignore_translation() {
        let t = Transform::translation(5.0, 5.0);
        assert_eq!(t.apply_vector(Vec2::new(1.0, 2.0)), Vec2::new(1.0, 2.0));
    }
}
