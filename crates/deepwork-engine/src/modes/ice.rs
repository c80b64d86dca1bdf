use core::f32::consts::TAU;
use std::time::Duration;

use crate::coords::{Rect, Vec2};
use crate::paint::{Color, LinearGradient, RadialGradient};
use crate::surface::Canvas;

use super::easing::ease_out_cubic;
use super::{ModeParams, ModeRoutine};

const CRACK_COUNT: usize = 16;
const CRACK_SEED: u32 = 42;
const FOG_BLOBS: usize = 20;

/// A crack in normalized surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Crack {
    x: f32,
    y: f32,
    len: f32,
    rot: f32,
    alpha: f32,
}

/// Numerical Recipes LCG, yielding values in `[0, 1)`.
struct Lcg(u32);

impl Lcg {
    fn next(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (self.0 as f64 / 4_294_967_296.0) as f32
    }
}

fn seeded_cracks() -> Vec<Crack> {
    let mut rng = Lcg(CRACK_SEED);
    (0..CRACK_COUNT)
        .map(|_| Crack {
            x: rng.next(),
            y: rng.next(),
            len: 40.0 + rng.next() * 120.0,
            rot: rng.next() * TAU,
            alpha: 0.15 + rng.next() * 0.35,
        })
        .collect()
}

/// Frosted pane that thaws as the session progresses.
pub struct IceMode {
    cracks: Vec<Crack>,
}

impl IceMode {
    pub fn new() -> Self {
        Self { cracks: seeded_cracks() }
    }
}

impl Default for IceMode {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeRoutine for IceMode {
    fn paint(&mut self, canvas: &mut Canvas<'_>, params: &ModeParams, _timestamp: Duration) -> anyhow::Result<()> {
        let (w, h) = (canvas.width(), canvas.height());
        let melt = ease_out_cubic(params.progress);
        let frost = 1.0 - melt;

        let tint = (if params.is_break { 0.2 } else { 0.6 * frost }).max(0.05);
        canvas.fill_rect(
            Rect::new(0.0, 0.0, w, h),
            LinearGradient::two(
                Vec2::zero(),
                Vec2::new(0.0, h),
                Color::rgba(180, 220, 255, tint),
                Color::rgba(120, 180, 255, tint),
            ),
        );

        let crack_color = Color::rgba(255, 255, 255, 0.15 + 0.6 * frost);
        for (idx, crack) in self.cracks.iter().enumerate() {
            let length = crack.len * (0.3 + 0.7 * frost);
            let width = 1.0 + (idx % 3) as f32;

            canvas.save();
            canvas.translate(crack.x * w, crack.y * h);
            canvas.rotate(crack.rot);
            canvas.set_alpha(crack.alpha * frost);

            canvas.stroke_line(Vec2::new(-length / 2.0, 0.0), Vec2::new(length / 2.0, 0.0), width, crack_color);
            canvas.stroke_line(Vec2::zero(), Vec2::new(length / 3.0, 8.0), width, crack_color);
            canvas.stroke_line(Vec2::zero(), Vec2::new(-length / 3.0, -8.0), width, crack_color);
            canvas.restore();
        }

        let fog = 0.05 + 0.15 * frost;
        for i in 0..FOG_BLOBS {
            let i = i as f32;
            let center = Vec2::new((i * 123.45).fract() * w, (i * 54.321).fract() * h);
            let radius = 60.0 + (i * 19.2).fract() * 140.0;
            canvas.fill_circle(
                center,
                radius,
                RadialGradient::two(center, 0.0, radius, Color::rgba(255, 255, 255, fog), Color::transparent()),
            );
        }

        Ok(())
    }
}
