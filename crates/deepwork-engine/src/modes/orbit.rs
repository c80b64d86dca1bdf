use core::f32::consts::TAU;
use std::time::Duration;

use crate::coords::{Rect, Vec2};
use crate::paint::{Color, RadialGradient};
use crate::scene::Path;
use crate::surface::Canvas;

use super::{ModeParams, ModeRoutine};

const STARS: usize = 60;

/// A ship orbiting a planet once per session; descends during breaks.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrbitMode;

fn ship(canvas: &mut Canvas<'_>, at: Vec2, s: f32) {
    let hull = Path::new()
        .move_to(Vec2::new(0.0, -8.0))
        .line_to(Vec2::new(10.0, 0.0))
        .line_to(Vec2::new(0.0, 8.0))
        .line_to(Vec2::new(-12.0, 0.0))
        .close();

    canvas.save();
    canvas.translate(at.x, at.y);
    canvas.scale(s, s);
    canvas.fill_path(&hull, Color::hex(0xe5e7eb));
    canvas.stroke_path(&hull, 2.0, Color::hex(0x94a3b8));
    canvas.restore();
}

impl ModeRoutine for OrbitMode {
    fn paint(&mut self, canvas: &mut Canvas<'_>, params: &ModeParams, _timestamp: Duration) -> anyhow::Result<()> {
        let (w, h) = (canvas.width(), canvas.height());
        let center = Vec2::new(w / 2.0, h / 2.0);

        canvas.fill_rect(
            Rect::new(0.0, 0.0, w, h),
            RadialGradient::two(center, w.min(h) * 0.2, w.max(h), Color::hex(0x0b1020), Color::hex(0x00010a)),
        );

        let star = Color::rgba(255, 255, 255, 0.8);
        for i in 0..STARS {
            let i = i as f32;
            let at = Vec2::new((i * 91.123).fract() * w, (i * 53.789).fract() * h);
            canvas.fill_circle(at, 0.5 + (i * 3.1).fract() * 1.5, star);
        }

        let planet_r = w.min(h) * 0.18;
        let highlight = center - Vec2::new(planet_r * 0.4, planet_r * 0.4);
        canvas.fill_circle(
            center,
            planet_r,
            RadialGradient::two(highlight, planet_r * 0.2, planet_r * 1.4, Color::hex(0x3b82f6), Color::hex(0x1e40af)),
        );

        let radii = Vec2::new(planet_r * 2.2, planet_r * 1.5);
        canvas.stroke_ellipse(center, radii, 0.0, 1.0, Color::rgba(148, 163, 184, 0.4));

        let angle = params.progress * TAU;
        let orbit_pos = center + Vec2::new(radii.x * angle.cos(), radii.y * angle.sin());

        if params.is_break {
            let landing = center.lerp(orbit_pos, 1.0 - params.progress);
            ship(canvas, landing, 0.5);
        } else {
            ship(canvas, orbit_pos, 0.6);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::test_support::paint_once;
    use crate::scene::DrawCmd;

    fn ship_anchor(params: ModeParams) -> Vec2 {
        let list = paint_once(&mut OrbitMode, params, Duration::ZERO);
        // The ship is the last fan; its first vertex is the nose at (0, -8) scaled.
        list.items()
            .iter()
            .filter_map(|i| match &i.cmd {
                DrawCmd::Triangle(t) => Some(t.points[0]),
                _ => None,
            })
            .last()
            .unwrap_or_default()
    }

    #[test]
    fn ship_starts_on_the_right_of_the_orbit() {
        let nose = ship_anchor(ModeParams::default());
        let planet_r = 300.0 * 0.18;
        assert!((nose.x - (200.0 + planet_r * 2.2)).abs() < 1e-3);
        assert!((nose.y - (150.0 - 8.0 * 0.6)).abs() < 1e-3);
    }

    #[test]
    fn ship_lands_at_end_of_break() {
        let nose = ship_anchor(ModeParams { progress: 1.0, is_break: true, ..Default::default() });
        assert!((nose.x - 200.0).abs() < 1e-3);
        assert!((nose.y - (150.0 - 8.0 * 0.5)).abs() < 1e-3);
    }
}
