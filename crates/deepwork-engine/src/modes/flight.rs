use core::f32::consts::PI;
use std::time::Duration;

use crate::coords::{Rect, Vec2};
use crate::paint::{Color, LinearGradient};
use crate::scene::Path;
use crate::surface::Canvas;

use super::easing::ease_in_out_quad;
use super::{ModeParams, ModeRoutine};

const CLOUDS: usize = 10;
const HULL: u32 = 0x334155;

/// A plane crossing the sky; lands on a runway during breaks.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlightMode;

fn fuselage() -> Path {
    Path::new()
        .move_to(Vec2::new(0.0, 0.0))
        .line_to(Vec2::new(40.0, 6.0))
        .line_to(Vec2::new(-15.0, 0.0))
        .close()
}

fn cloud(canvas: &mut Canvas<'_>, center: Vec2, s: f32, alpha: f32) {
    canvas.save();
    canvas.set_alpha(alpha);
    canvas.fill_circle(center, 20.0 * s, Color::WHITE);
    canvas.fill_circle(center + Vec2::new(25.0 * s, 5.0 * s), 25.0 * s, Color::WHITE);
    canvas.fill_circle(center + Vec2::new(-25.0 * s, 5.0 * s), 18.0 * s, Color::WHITE);
    canvas.restore();
}

impl ModeRoutine for FlightMode {
    fn paint(&mut self, canvas: &mut Canvas<'_>, params: &ModeParams, _timestamp: Duration) -> anyhow::Result<()> {
        let (w, h) = (canvas.width(), canvas.height());
        let progress = params.progress;

        canvas.fill_rect(
            Rect::new(0.0, 0.0, w, h),
            LinearGradient::two(Vec2::zero(), Vec2::new(0.0, h), Color::hex(0x66a6ff), Color::hex(0x89f7fe)),
        );

        let t = ease_in_out_quad(progress);
        let x = 40.0 + (w - 80.0) * t;
        let y = h * (0.25 + 0.1 * (progress * PI * 2.0).sin());

        for i in 0..CLOUDS {
            let layer = (i % 3) as f32;
            let px = (i as f32 * 97.0 + progress * 200.0) % (w + 100.0) - 50.0;
            cloud(canvas, Vec2::new(px, h * 0.3 + layer * 40.0), 1.0 + layer * 0.3, 0.5);
        }

        let hull = fuselage();
        canvas.save();
        canvas.translate(x, y);
        canvas.rotate(0.02 * (progress * PI * 4.0).sin());
        canvas.fill_path(&hull, Color::hex(HULL));
        canvas.stroke_path(&hull, 2.0, Color::hex(0x0f172a));

        let tail = Path::new()
            .move_to(Vec2::new(-10.0, 0.0))
            .line_to(Vec2::new(-18.0, -8.0))
            .line_to(Vec2::new(-6.0, -2.0))
            .close();
        canvas.fill_path(&tail, Color::hex(0x475569));
        canvas.restore();

        if params.is_break {
            let runway_y = h * 0.75;
            canvas.fill_rect(Rect::new(0.0, runway_y, w, 6.0), Color::hex(0x1e293b));
            canvas.stroke_dashed_line(
                Vec2::new(0.0, runway_y + 3.0),
                Vec2::new(w, runway_y + 3.0),
                1.0,
                Color::rgba(255, 255, 255, 0.7),
                12.0,
                12.0,
            );

            canvas.save();
            canvas.translate(40.0 + (w - 80.0) * t, runway_y - 12.0);
            canvas.fill_path(&hull, Color::hex(HULL));
            canvas.restore();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::test_support::paint_once;
    use crate::scene::DrawCmd;

    fn rect_count(params: ModeParams) -> usize {
        paint_once(&mut FlightMode, params, Duration::ZERO)
            .items()
            .iter()
            .filter(|i| matches!(i.cmd, DrawCmd::Rect(_)))
            .count()
    }

    #[test]
    fn runway_only_during_break() {
        assert_eq!(rect_count(ModeParams::default()), 1);
        assert_eq!(rect_count(ModeParams { is_break: true, ..Default::default() }), 2);
    }

    #[test]
    fn clouds_are_drawn_as_circles() {
        let list = paint_once(&mut FlightMode, ModeParams::default(), Duration::ZERO);
        let circles = list.items().iter().filter(|i| matches!(i.cmd, DrawCmd::Ellipse(_))).count();
        assert_eq!(circles, CLOUDS * 3);
    }
}
