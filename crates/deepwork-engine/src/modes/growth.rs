use core::f32::consts::TAU;
use std::time::Duration;

use crate::coords::{Rect, Vec2};
use crate::paint::{Color, LinearGradient};
use crate::scene::Path;
use crate::surface::Canvas;

use super::{ModeParams, ModeRoutine};

const LEAF_STAGES: [f32; 3] = [0.2, 0.35, 0.5];
const BUD_STAGE: f32 = 0.65;
const BLOOM_STAGE: f32 = 0.85;
const PETALS: usize = 6;

/// Seed growing into a flower over the session.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrowthMode;

fn leaf(canvas: &mut Canvas<'_>, at: Vec2, size: f32, flip: f32) {
    let outline = Path::new()
        .move_to(Vec2::zero())
        .quad_to(Vec2::new(24.0 * size, -18.0 * size), Vec2::new(48.0 * size, 0.0))
        .quad_to(Vec2::new(24.0 * size, 18.0 * size), Vec2::zero());

    canvas.save();
    canvas.translate(at.x, at.y);
    canvas.scale(flip, 1.0);
    canvas.fill_path(&outline, Color::hex(0x22c55e));
    canvas.restore();
}

impl ModeRoutine for GrowthMode {
    fn paint(&mut self, canvas: &mut Canvas<'_>, params: &ModeParams, _timestamp: Duration) -> anyhow::Result<()> {
        let (w, h) = (canvas.width(), canvas.height());

        canvas.fill_rect(
            Rect::new(0.0, 0.0, w, h),
            LinearGradient::two(Vec2::zero(), Vec2::new(0.0, h), Color::hex(0x0f172a), Color::hex(0x0b3d2e)),
        );

        let cx = w / 2.0;
        let base_y = h * 0.8;
        let scale = 1.0 + params.streak_level.min(3) as f32 * 0.2;
        let stage = params.progress.min(0.999);
        let stem_h = h * 0.5 * stage * scale;

        canvas.fill_rect(Rect::new(0.0, base_y, w, h - base_y), Color::hex(0x065f46));
        canvas.fill_ellipse(
            Vec2::new(cx, base_y - 6.0),
            Vec2::new(10.0 * scale, 6.0 * scale),
            0.0,
            Color::hex(0xa16207),
        );

        let stem = Path::new()
            .move_to(Vec2::new(cx, base_y - 6.0))
            .quad_to(Vec2::new(cx - 10.0, base_y - stem_h * 0.5), Vec2::new(cx, base_y - stem_h));
        canvas.stroke_path(&stem, 4.0 * scale, Color::hex(0x16a34a));

        let leaves = [
            (Vec2::new(cx - 8.0, base_y - stem_h * 0.4), 0.3, -1.0),
            (Vec2::new(cx + 8.0, base_y - stem_h * 0.6), 0.28, 1.0),
            (Vec2::new(cx - 6.0, base_y - stem_h * 0.75), 0.25, -1.0),
        ];
        for (threshold, (at, size, flip)) in LEAF_STAGES.iter().zip(leaves) {
            if stage > *threshold {
                leaf(canvas, at, size * scale, flip);
            }
        }

        if stage > BUD_STAGE {
            let bud = Vec2::new(cx, base_y - stem_h - 10.0 * scale);
            canvas.fill_circle(bud, 8.0 * scale, Color::hex(0xf97316));

            if stage > BLOOM_STAGE {
                let radius = 6.0 * scale * (stage - BLOOM_STAGE + 0.2);
                for i in 0..PETALS {
                    let offset = Vec2::from_angle(i as f32 / PETALS as f32 * TAU) * (14.0 * scale);
                    canvas.fill_circle(bud + offset, radius, Color::hex(0xfb7185));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::test_support::paint_once;
    use crate::scene::DrawCmd;

    fn circles(progress: f32, streak: u32) -> Vec<f32> {
        let params = ModeParams { progress, streak_level: streak, ..Default::default() };
        paint_once(&mut GrowthMode, params, Duration::ZERO)
            .items()
            .iter()
            .filter_map(|i| match &i.cmd {
                DrawCmd::Ellipse(e) => Some(e.radii.x),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn stages_unlock_with_progress() {
        // seed only
        assert_eq!(circles(0.1, 1).len(), 1);
        // seed + bud
        assert_eq!(circles(0.7, 1).len(), 2);
        // seed + bud + petals
        assert_eq!(circles(0.9, 1).len(), 2 + PETALS);
    }

    #[test]
    fn streak_scale_is_capped() {
        let three = circles(0.5, 3);
        let ten = circles(0.5, 10);
        assert_eq!(three, ten);
        assert!((three[0] - 10.0 * 1.6).abs() < 1e-4);
    }

    #[test]
    fn leaves_appear_at_thresholds() {
        let triangles = |p: f32| {
            paint_once(&mut GrowthMode, ModeParams { progress: p, ..Default::default() }, Duration::ZERO)
                .items()
                .iter()
                .filter(|i| matches!(i.cmd, DrawCmd::Triangle(_)))
                .count()
        };
        let none = triangles(0.1);
        let one = triangles(0.3);
        let three = triangles(0.6);
        assert_eq!(none, 0);
        assert!(one > 0);
        assert_eq!(three, one * 3);
    }
}
