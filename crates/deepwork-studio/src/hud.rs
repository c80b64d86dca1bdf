//! Side panel: seven-segment countdown, progress bar, run state and mode dots.
//!
//! Drawn straight into the window's draw list on its own layer, above the
//! composited surface frame.

use deepwork_engine::coords::{Rect, Vec2};
use deepwork_engine::modes::ModeId;
use deepwork_engine::paint::Color;
use deepwork_engine::scene::{DrawList, ZIndex};

const LAYER: ZIndex = ZIndex::OVERLAY;
const PADDING: f32 = 24.0;

/// Width of the panel in logical pixels.
pub const PANEL_WIDTH: f32 = 280.0;

/// What the panel shows for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HudState {
    /// Countdown text as `MM:SS`.
    pub countdown: String,
    pub progress: f32,
    pub running: bool,
    pub is_break: bool,
    pub mode: ModeId,
    pub interruptions: u32,
    pub completed: u32,
}

struct Palette {
    panel: Color,
    lit: Color,
    unlit: Color,
    track: Color,
}

impl Palette {
    fn for_state(is_break: bool) -> Self {
        let lit = if is_break { Color::hex(0x7ee0a1) } else { Color::hex(0x8ec5ff) };
        Self {
            panel: Color::rgba(8, 12, 24, 0.82),
            lit,
            unlit: lit.with_opacity(0.08),
            track: Color::rgba(255, 255, 255, 0.1),
        }
    }
}

/// Segment mask for a decimal digit, bit 0 = `a` through bit 6 = `g`.
pub fn segments_for(ch: char) -> Option<u8> {
    const MASKS: [u8; 10] = [0x3f, 0x06, 0x5b, 0x4f, 0x66, 0x6d, 0x7d, 0x07, 0x7f, 0x6f];
    ch.to_digit(10).map(|d| MASKS[d as usize])
}

/// The seven segment rects of a digit cell, in `a..g` order.
pub fn segment_rects(cell: Rect, thickness: f32) -> [Rect; 7] {
    let Rect { origin: Vec2 { x, y }, size: Vec2 { x: w, y: h } } = cell;
    let t = thickness;
    let half = h * 0.5;
    let vert = (half - 1.5 * t).max(0.0);
    let horiz = (w - 2.0 * t).max(0.0);

    [
        Rect::new(x + t, y, horiz, t),
        Rect::new(x + w - t, y + t, t, vert),
        Rect::new(x + w - t, y + half + 0.5 * t, t, vert),
        Rect::new(x + t, y + h - t, horiz, t),
        Rect::new(x, y + half + 0.5 * t, t, vert),
        Rect::new(x, y + t, t, vert),
        Rect::new(x + t, y + half - 0.5 * t, horiz, t),
    ]
}

/// Draws the panel into `panel`.
pub fn draw(list: &mut DrawList, panel: Rect, state: &HudState) {
    if panel.is_empty() {
        return;
    }

    let palette = Palette::for_state(state.is_break);
    list.push_clip(panel);
    list.push_rect(LAYER, panel, palette.panel);

    let inner = panel.inset(PADDING);
    let mut y = inner.origin.y + 12.0;

    y = draw_countdown(list, inner.origin.x, y, inner.size.x, &state.countdown, &palette) + 20.0;

    // Progress bar.
    let track = Rect::new(inner.origin.x, y, inner.size.x, 6.0);
    list.push_rect(LAYER, track, palette.track);
    let filled = track.size.x * state.progress.clamp(0.0, 1.0);
    if filled > 0.0 {
        list.push_rect(LAYER, Rect::new(track.origin.x, y, filled, 6.0), palette.lit);
    }
    y += 30.0;

    draw_run_state(list, Vec2::new(inner.origin.x, y), state.running, &palette);

    // One dot per mode; the active one is filled.
    let dot_y = y + 10.0;
    for (i, mode) in ModeId::ALL.iter().enumerate() {
        let center = Vec2::new(inner.origin.x + 60.0 + i as f32 * 22.0, dot_y);
        let color = if *mode == state.mode { palette.lit } else { palette.track };
        list.push_solid_circle(LAYER, center, 6.0, color);
    }
    y += 40.0;

    // Tally marks: completed sessions, then interruptions in a dimmer shade.
    draw_tally(list, Vec2::new(inner.origin.x, y), state.completed, palette.lit);
    draw_tally(list, Vec2::new(inner.origin.x, y + 22.0), state.interruptions, palette.lit.with_opacity(0.4));

    list.pop_clip();
}

/// Returns the y coordinate below the digits.
fn draw_countdown(list: &mut DrawList, x: f32, y: f32, width: f32, text: &str, palette: &Palette) -> f32 {
    let digits = text.chars().filter(|c| c.is_ascii_digit()).count().max(1) as f32;
    let colons = text.chars().filter(|c| *c == ':').count() as f32;

    // Each digit is one cell plus a gap; a colon takes half a cell.
    let cell_w = width / (digits * 1.25 + colons * 0.5);
    let cell_h = cell_w * 1.8;
    let thickness = (cell_w * 0.16).max(2.0);
    let gap = cell_w * 0.25;

    let mut cursor = x;
    for ch in text.chars() {
        if ch == ':' {
            let cx = cursor + cell_w * 0.2;
            list.push_rect(LAYER, Rect::new(cx, y + cell_h * 0.28, thickness, thickness), palette.lit);
            list.push_rect(LAYER, Rect::new(cx, y + cell_h * 0.66, thickness, thickness), palette.lit);
            cursor += cell_w * 0.5;
            continue;
        }

        let Some(mask) = segments_for(ch) else { continue };
        let cell = Rect::new(cursor, y, cell_w, cell_h);
        for (bit, rect) in segment_rects(cell, thickness).into_iter().enumerate() {
            let color = if mask & (1 << bit) != 0 { palette.lit } else { palette.unlit };
            list.push_rect(LAYER, rect, color);
        }
        cursor += cell_w + gap;
    }

    y + cell_h
}

/// Play triangle while running, pause bars otherwise.
fn draw_run_state(list: &mut DrawList, at: Vec2, running: bool, palette: &Palette) {
    if running {
        let pts = [at, Vec2::new(at.x + 18.0, at.y + 10.0), Vec2::new(at.x, at.y + 20.0)];
        list.push_triangle(LAYER, pts, [palette.lit; 3]);
    } else {
        list.push_rect(LAYER, Rect::new(at.x, at.y, 6.0, 20.0), palette.lit);
        list.push_rect(LAYER, Rect::new(at.x + 11.0, at.y, 6.0, 20.0), palette.lit);
    }
}

fn draw_tally(list: &mut DrawList, at: Vec2, count: u32, color: Color) {
    for i in 0..count.min(24) {
        let x = at.x + i as f32 * 9.0 + (i / 5) as f32 * 6.0;
        list.push_rect(LAYER, Rect::new(x, at.y, 3.0, 14.0), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepwork_engine::scene::DrawCmd;

    fn state(countdown: &str) -> HudState {
        HudState {
            countdown: countdown.to_string(),
            progress: 0.5,
            running: true,
            is_break: false,
            mode: ModeId::Orbit,
            interruptions: 2,
            completed: 1,
        }
    }

    #[test]
    fn digit_masks() {
        assert_eq!(segments_for('8'), Some(0x7f));
        assert_eq!(segments_for('1').map(u8::count_ones), Some(2));
        assert_eq!(segments_for('7').map(u8::count_ones), Some(3));
        assert_eq!(segments_for(':'), None);
    }

    #[test]
    fn segments_stay_inside_their_cell() {
        let cell = Rect::new(10.0, 20.0, 40.0, 72.0);
        for seg in segment_rects(cell, 6.0) {
            assert!(seg.origin.x >= cell.origin.x && seg.origin.y >= cell.origin.y);
            assert!(seg.max().x <= cell.max().x + 1e-4 && seg.max().y <= cell.max().y + 1e-4);
        }
    }

    #[test]
    fn panel_is_clipped_to_its_rect() {
        let panel = Rect::new(600.0, 0.0, PANEL_WIDTH, 500.0);
        let mut list = DrawList::new();
        draw(&mut list, panel, &state("24:59"));

        assert!(!list.is_empty());
        for item in list.items() {
            assert_eq!(item.clip_rect, Some(panel));
            assert_eq!(item.key.z, LAYER);
        }
        // Four digits of seven segments each, lit or not.
        let rects = list.items().iter().filter(|i| matches!(i.cmd, DrawCmd::Rect(_))).count();
        assert!(rects >= 28);
    }

    #[test]
    fn empty_panel_draws_nothing() {
        let mut list = DrawList::new();
        draw(&mut list, Rect::new(0.0, 0.0, 0.0, 300.0), &state("00:00"));
        assert!(list.is_empty());
    }
}
