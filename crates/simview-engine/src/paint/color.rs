/// Scene fill color with normalized channels.
///
/// Bodies report colors in this form; each channel must lie in `[0, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbColor {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn is_normalized(self) -> bool {
        [self.r, self.g, self.b].iter().all(|c| (0.0..=1.0).contains(c))
    }

    /// Checks the channel range.
    ///
    /// # Panics
    /// Panics if any channel is outside `[0, 1]` (NaN included).
    #[inline]
    pub fn assert_normalized(self) {
        assert!(
            self.is_normalized(),
            "color channels must be within [0, 1], got ({}, {}, {})",
            self.r, self.g, self.b
        );
    }

    /// Converts to opaque 8-bit RGBA, truncating each scaled channel.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r * 255.0) as u8,
            (self.g * 255.0) as u8,
            (self.b * 255.0) as u8,
            255,
        ]
    }
}

/// Straight-alpha RGBA color in sRGB encoding, as handed to the renderer.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Converts the RGB channels from sRGB to linear light. Alpha is unchanged.
    #[inline]
    pub fn linearized(self) -> Self {
        Self::new(srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b), self.a)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<RgbColor> for Color {
    #[inline]
    fn from(c: RgbColor) -> Self {
        Color::from_rgba8(c.to_rgba8())
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_rgba8_scales_and_truncates() {
        assert_eq!(RgbColor::new(0.0, 0.5, 1.0).to_rgba8(), [0, 127, 255, 255]);
    }

    #[test]
    fn normalized_range_is_inclusive() {
        assert!(RgbColor::new(0.0, 1.0, 0.25).is_normalized());
        assert!(!RgbColor::new(1.01, 0.0, 0.0).is_normalized());
        assert!(!RgbColor::new(0.0, -0.1, 0.0).is_normalized());
        assert!(!RgbColor::new(0.0, 0.0, f32::NAN).is_normalized());
    }

    #[test]
    #[should_panic(expected = "color channels")]
    fn assert_normalized_rejects_out_of_range() {
        RgbColor::new(0.2, 2.0, 0.2).assert_normalized();
    }

    #[test]
    fn linearize_keeps_endpoints() {
        let c = Color::new(0.0, 1.0, 0.5, 0.3).linearized();
        assert_eq!(c.r, 0.0);
        assert!((c.g - 1.0).abs() < 1e-6);
        assert!(c.b > 0.2 && c.b < 0.22);
        assert_eq!(c.a, 0.3);
    }

    #[test]
    fn scene_color_converts_through_bytes() {
        let c: Color = RgbColor::new(1.0, 0.0, 0.0).into();
        assert_eq!(c, Color::new(1.0, 0.0, 0.0, 1.0));
    }
}
