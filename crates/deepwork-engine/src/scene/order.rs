/// Paint layer. Higher layers are drawn over lower ones.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Layer a surface's frame is recorded and composited on.
    pub const SURFACE: ZIndex = ZIndex(0);
    /// Host chrome drawn over composited surfaces.
    pub const OVERLAY: ZIndex = ZIndex(10);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }
}

/// Paint-order key of a draw item: layer first, then recording order.
///
/// Field order matters: the derived `Ord` compares `z` before `order`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    /// Recording index, unique within one `DrawList`.
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: u32) -> Self {
        Self { z, order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_dominates_recording_order() {
        let early_top = SortKey::new(ZIndex::OVERLAY, 0);
        let late_bottom = SortKey::new(ZIndex::SURFACE, 7);
        assert!(late_bottom < early_top);
        assert!(SortKey::new(ZIndex::SURFACE, 1) < SortKey::new(ZIndex::SURFACE, 2));
    }
}
