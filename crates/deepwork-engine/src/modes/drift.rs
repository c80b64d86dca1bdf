use std::time::Duration;

use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::path::cubic_point;
use crate::scene::Path;
use crate::surface::Canvas;

use super::{ModeParams, ModeRoutine};

/// A car drifting along a curved track; wobbles while an interruption is
/// detected.
#[derive(Debug, Default, Clone, Copy)]
pub struct DriftMode;

fn track(w: f32, h: f32) -> [Vec2; 4] {
    [
        Vec2::new(w * 0.1, h * 0.8),
        Vec2::new(w * 0.3, h * 0.6),
        Vec2::new(w * 0.6, h * 0.9),
        Vec2::new(w * 0.9, h * 0.2),
    ]
}

impl ModeRoutine for DriftMode {
    fn paint(&mut self, canvas: &mut Canvas<'_>, params: &ModeParams, timestamp: Duration) -> anyhow::Result<()> {
        let (w, h) = (canvas.width(), canvas.height());
        let [p0, p1, p2, p3] = track(w, h);

        canvas.fill_rect(Rect::new(0.0, 0.0, w, h), Color::hex(0x111827));
        canvas.stroke_path(&Path::new().move_to(p0).cubic_to(p1, p2, p3), 14.0, Color::hex(0x374151));

        let t = params.progress.min(0.999);
        let pos = cubic_point(p0, p1, p2, p3, t);
        let ahead = cubic_point(p0, p1, p2, p3, (t + 0.001).min(0.999)) - pos;
        let heading = ahead.y.atan2(ahead.x);

        let drift = 0.4 * (params.progress * core::f32::consts::PI * 4.0).sin();
        let wobble = if params.interruption_detected {
            ((timestamp.as_secs_f64() * 1000.0 / 60.0).sin() * 0.2) as f32
        } else {
            0.0
        };

        canvas.save();
        canvas.translate(pos.x, pos.y);
        canvas.rotate(heading + drift + wobble);
        canvas.fill_rect(Rect::new(-14.0, -8.0, 28.0, 16.0), Color::hex(0xef4444));

        let spark = Color::rgba(255, 215, 0, 0.8);
        for i in 0..6 {
            let at = Vec2::new(-14.0 + (i % 2) as f32 * 28.0, if i < 3 { -8.0 } else { 8.0 });
            canvas.fill_circle(at, 2.0 + (i % 3) as f32, spark);
        }
        canvas.restore();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::test_support::paint_once;
    use crate::scene::{DrawCmd, DrawList};

    fn car_points(list: &DrawList) -> Vec<Vec2> {
        list.items()
            .iter()
            .filter_map(|i| match &i.cmd {
                DrawCmd::Triangle(t) => Some(t.points),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn car_starts_at_track_origin() {
        let list = paint_once(&mut DriftMode, ModeParams::default(), Duration::ZERO);
        let pts = car_points(&list);
        assert!(!pts.is_empty());
        let centroid = pts.iter().fold(Vec2::zero(), |acc, &p| acc + p) / pts.len() as f32;
        assert!(centroid.distance(Vec2::new(40.0, 240.0)) < 8.0);
    }

    #[test]
    fn wobble_only_when_interrupted() {
        let calm = ModeParams::default();
        let shaky = ModeParams { interruption_detected: true, ..calm };
        let ts = Duration::from_millis(100);

        let a = car_points(&paint_once(&mut DriftMode, calm, ts));
        let b = car_points(&paint_once(&mut DriftMode, calm, Duration::from_millis(700)));
        assert_eq!(a, b);

        let c = car_points(&paint_once(&mut DriftMode, shaky, ts));
        assert_ne!(a, c);
    }
}
