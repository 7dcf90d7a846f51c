/// Ratio between physical pixels and density-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density(pub f32);

impl Density {
    /// One pixel per dp.
    pub const BASELINE: Self = Self(1.0);

    pub fn from_dpi(dpi: f32) -> Self {
        Self(dpi / 160.0)
    }

    #[inline]
    pub fn dp_to_px(&self, dp: f32) -> f32 {
        dp * self.0
    }

    /// Truncates like the integer layout conversions of most
    /// toolkits.
    #[inline]
    pub fn dp_to_px_int(&self, dp: u32) -> u32 {
        (dp as f32 * self.0) as u32
    }

    #[inline]
    pub fn px_to_dp(&self, px: f32) -> f32 {
        px / self.0
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::BASELINE
    }
}
