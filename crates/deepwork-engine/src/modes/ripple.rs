use std::time::Duration;

use crate::coords::{Rect, Vec2};
use crate::paint::{Color, LinearGradient};
use crate::surface::Canvas;

use super::{ModeParams, ModeRoutine};

/// How long a user ripple stays on screen.
const RIPPLE_LIFETIME: Duration = Duration::from_millis(1500);
const RIPPLE_START_RADIUS: f32 = 10.0;
/// Growth speed of user ripples, in logical units per second.
const RIPPLE_SPEED: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Ripple {
    at: Vec2,
    born: Duration,
}

/// Water surface with automatic ripples; pointer presses add more.
#[derive(Debug, Default, Clone)]
pub struct RippleMode {
    ripples: Vec<Ripple>,
}

impl RippleMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of user ripples still alive after the last paint.
    pub fn active_ripples(&self) -> usize {
        self.ripples.len()
    }
}

fn ring(canvas: &mut Canvas<'_>, at: Vec2, radius: f32, alpha: f32) {
    let color = Color::rgba(255, 255, 255, alpha);
    canvas.save();
    canvas.stroke_circle(at, radius, 2.0, color);
    canvas.set_alpha(alpha * 0.6);
    canvas.stroke_circle(at, radius * 0.6, 2.0, color);
    canvas.restore();
}

impl ModeRoutine for RippleMode {
    fn paint(&mut self, canvas: &mut Canvas<'_>, params: &ModeParams, timestamp: Duration) -> anyhow::Result<()> {
        let (w, h) = (canvas.width(), canvas.height());
        let hue = 200.0 + params.progress * 40.0;

        canvas.fill_rect(
            Rect::new(0.0, 0.0, w, h),
            LinearGradient::two(
                Vec2::zero(),
                Vec2::new(0.0, h),
                Color::from_hsl(hue, 0.8, 0.65, 1.0),
                Color::from_hsl(hue + 20.0, 0.7, 0.55, 1.0),
            ),
        );

        let time = timestamp.as_secs_f32();
        let auto = (1.0 + params.progress * 3.0).floor() as usize;
        for i in 0..auto {
            let k = i as f32;
            let radius = 40.0 + (time * (k + 1.0) * 20.0) % 80.0;
            let at = Vec2::new((k * 97.31).fract() * w, (k * 53.19).fract() * h);
            ring(canvas, at, radius, 0.8);
        }

        self.ripples.retain(|r| timestamp.saturating_sub(r.born) < RIPPLE_LIFETIME);
        for r in &self.ripples {
            let elapsed = timestamp.saturating_sub(r.born).as_secs_f32();
            let fade = 1.0 - elapsed / RIPPLE_LIFETIME.as_secs_f32();
            ring(canvas, r.at, RIPPLE_START_RADIUS + elapsed * RIPPLE_SPEED, fade);
        }

        Ok(())
    }

    fn pointer_down(&mut self, pos: Vec2, timestamp: Duration, params: &ModeParams) {
        if params.allow_interaction {
            self.ripples.push(Ripple { at: pos, born: timestamp });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::test_support::paint_once;
    use crate::scene::DrawCmd;

    fn rings(list: &crate::scene::DrawList) -> usize {
        list.items().iter().filter(|i| matches!(i.cmd, DrawCmd::Ellipse(_))).count()
    }

    #[test]
    fn auto_ripples_grow_with_progress() {
        let mut mode = RippleMode::new();
        let at = |p: f32| ModeParams { progress: p, ..Default::default() };
        assert_eq!(rings(&paint_once(&mut mode, at(0.0), Duration::ZERO)), 2);
        assert_eq!(rings(&paint_once(&mut mode, at(0.5), Duration::ZERO)), 4);
        assert_eq!(rings(&paint_once(&mut mode, at(1.0), Duration::ZERO)), 8);
    }

    #[test]
    fn user_ripples_expire() {
        let mut mode = RippleMode::new();
        let params = ModeParams::default();
        mode.pointer_down(Vec2::new(10.0, 10.0), Duration::from_secs(1), &params);

        paint_once(&mut mode, params, Duration::from_millis(2000));
        assert_eq!(mode.active_ripples(), 1);

        paint_once(&mut mode, params, Duration::from_millis(2500));
        assert_eq!(mode.active_ripples(), 0);
    }

    #[test]
    fn clicks_ignored_without_interaction() {
        let mut mode = RippleMode::new();
        let params = ModeParams { allow_interaction: false, ..Default::default() };
        mode.pointer_down(Vec2::new(10.0, 10.0), Duration::ZERO, &params);
        assert_eq!(mode.active_ripples(), 0);
    }
}
