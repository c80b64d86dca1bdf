use crate::coords::Rect;
use crate::paint::Paint;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Axis-aligned filled rectangle.
///
/// The canvas records rotated rectangles as triangles, so this payload never
/// carries a transform.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub paint: Paint,
}

impl RectCmd {
    #[inline]
    pub fn new(rect: Rect, paint: Paint) -> Self {
        Self { rect, paint }
    }
}

impl DrawList {
    /// Records a filled rectangle. Empty rectangles are dropped.
    #[inline]
    pub fn push_rect(&mut self, z: ZIndex, rect: Rect, paint: impl Into<Paint>) {
        if rect.is_empty() {
            return;
        }
        self.push(z, DrawCmd::Rect(RectCmd::new(rect, paint.into())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    #[test]
    fn empty_rects_are_not_recorded() {
        let mut dl = DrawList::new();
        dl.push_rect(ZIndex::default(), Rect::new(5.0, 5.0, 0.0, 10.0), Color::WHITE);
        dl.push_rect(ZIndex::default(), Rect::new(5.0, 5.0, 10.0, -1.0), Color::WHITE);
        assert!(dl.is_empty());

        dl.push_rect(ZIndex::default(), Rect::new(5.0, 5.0, 1.0, 1.0), Color::WHITE);
        assert_eq!(dl.len(), 1);
    }
}
