//! Easing curves over `t ∈ [0, 1]`.

#[inline]
pub fn linear(t: f32) -> f32 {
    t
}

#[inline]
pub fn ease_in_out_quad(t: f32) -> f32 {
    if t < 0.5 { 2.0 * t * t } else { -1.0 + (4.0 - 2.0 * t) * t }
}

#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    t * t * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn curves_hit_endpoints() {
        let curves: [fn(f32) -> f32; 4] = [linear, ease_in_out_quad, ease_out_cubic, ease_in_cubic];
        for f in curves {
            assert!(close(f(0.0), 0.0));
            assert!(close(f(1.0), 1.0));
        }
    }

    #[test]
    fn in_out_quad_is_symmetric_around_half() {
        assert!(close(ease_in_out_quad(0.5), 0.5));
        assert!(close(ease_in_out_quad(0.25), 0.125));
        assert!(close(ease_in_out_quad(0.75), 0.875));
    }

    #[test]
    fn cubic_shapes() {
        assert!(close(ease_out_cubic(0.5), 0.875));
        assert!(close(ease_in_cubic(0.5), 0.125));
    }
}
