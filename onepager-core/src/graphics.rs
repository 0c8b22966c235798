use crate::document::format_coord;

/// RGB fill color for text.
///
/// Each component is in the range 0.0 (none) to 1.0 (full intensity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    /// Create a color from RGB components (each 0.0–1.0).
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    /// Create a color from a `0xRRGGBB` literal, as in `#0f2742`.
    pub fn hex(rgb: u32) -> Self {
        let channel = |shift: u32| ((rgb >> shift) & 0xff) as f64 / 255.0;
        Color::rgb(channel(16), channel(8), channel(0))
    }

    /// Content stream operator setting this as the fill color.
    pub(crate) fn fill_op(&self) -> String {
        format!(
            "{} {} {} rg\n",
            format_coord(self.r),
            format_coord(self.g),
            format_coord(self.b),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_splits_channels() {
        let c = Color::hex(0x0f2742);
        assert!((c.r - 15.0 / 255.0).abs() < 1e-12);
        assert!((c.g - 39.0 / 255.0).abs() < 1e-12);
        assert!((c.b - 66.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn fill_op_formats_components() {
        assert_eq!(Color::hex(0x000000).fill_op(), "0 0 0 rg\n");
        assert_eq!(Color::rgb(1.0, 0.5, 0.25).fill_op(), "1 0.5 0.25 rg\n");
        assert_eq!(
            Color::hex(0x444444).fill_op(),
            "0.2667 0.2667 0.2667 rg\n"
        );
    }
}
