/// Layout size in logical pixels.
///
/// Used both as the renderer's NDC basis and as the measured size of a
/// surface container.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Returns true when both axes are finite and at least `min` units.
    ///
    /// NaN compares false, so a NaN measurement never counts as usable.
    #[inline]
    pub fn is_at_least(self, min: f32) -> bool {
        self.width >= min && self.height >= min && self.width.is_finite() && self.height.is_finite()
    }
}
