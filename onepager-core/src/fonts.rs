/// Font identifier for the two base-14 fonts the page uses.
/// Both are available in every PDF viewer without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
}

impl BuiltinFont {
    /// Resource name used in content streams.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F1",
            BuiltinFont::HelveticaBold => "F2",
        }
    }

    /// PDF BaseFont name.
    pub fn pdf_base_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// The bold face of this family. Bold stays bold.
    pub fn bold(&self) -> BuiltinFont {
        match self {
            BuiltinFont::Helvetica | BuiltinFont::HelveticaBold => BuiltinFont::HelveticaBold,
        }
    }

    /// Every font the document declares in its page resources.
    pub fn all() -> [BuiltinFont; 2] {
        [BuiltinFont::Helvetica, BuiltinFont::HelveticaBold]
    }
}

/// Helvetica widths for ASCII 32..=126, 1/1000 em, from the Adobe AFM.
const HELVETICA_WIDTHS: [u16; 95] = [
     278,  278,  355,  556,  556,  889,  667,  191,  333,  333,  389,  584,  278,  333,  278,  278,
     556,  556,  556,  556,  556,  556,  556,  556,  556,  556,  278,  278,  584,  584,  584,  556,
    1015,  667,  667,  722,  722,  667,  611,  778,  722,  278,  500,  667,  556,  833,  722,  778,
     667,  778,  722,  667,  611,  722,  667,  944,  667,  667,  611,  278,  278,  278,  469,  556,
     333,  556,  556,  500,  556,  556,  278,  556,  556,  222,  222,  500,  222,  833,  556,  556,
     556,  556,  333,  500,  278,  556,  500,  722,  500,  500,  500,  334,  260,  334,  584,
];

/// Helvetica-Bold widths for ASCII 32..=126, 1/1000 em, from the Adobe AFM.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
     278,  333,  474,  556,  556,  889,  722,  238,  333,  333,  389,  584,  278,  333,  278,  278,
     556,  556,  556,  556,  556,  556,  556,  556,  556,  556,  333,  333,  584,  584,  584,  611,
     975,  722,  722,  722,  722,  667,  611,  778,  722,  278,  556,  722,  611,  833,  722,  778,
     667,  778,  722,  667,  611,  722,  667,  944,  667,  667,  611,  333,  278,  333,  584,  556,
     333,  556,  611,  556,  611,  556,  333,  611,  611,  278,  278,  556,  278,  889,  611,  611,
     611,  611,  389,  556,  333,  611,  556,  778,  556,  556,  500,  389,  280,  389,  584,
];

/// StandardEncoding bullet (octal 267); same width in both faces.
pub const BULLET: char = '\u{b7}';
const BULLET_WIDTH: u16 = 350;

/// Width used for anything outside the mapped range.
const DEFAULT_WIDTH: u16 = 278;

/// Font metrics for the built-in fonts.
pub struct FontMetrics;

impl FontMetrics {
    /// Returns the width of a character in 1/1000 em units.
    pub fn char_width(font: BuiltinFont, ch: char) -> u16 {
        if ch == BULLET {
            return BULLET_WIDTH;
        }
        let code = ch as u32;
        if !(32..=126).contains(&code) {
            return DEFAULT_WIDTH;
        }
        let index = (code - 32) as usize;
        match font {
            BuiltinFont::Helvetica => HELVETICA_WIDTHS[index],
            BuiltinFont::HelveticaBold => HELVETICA_BOLD_WIDTHS[index],
        }
    }

    /// Measures the width of a text string in points.
    pub fn measure_text(text: &str, font: BuiltinFont, font_size: f64) -> f64 {
        let total: u32 = text
            .chars()
            .map(|ch| Self::char_width(font, ch) as u32)
            .sum();
        total as f64 * font_size / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_helvetica_widths() {
        assert_eq!(FontMetrics::char_width(BuiltinFont::Helvetica, ' '), 278);
        assert_eq!(FontMetrics::char_width(BuiltinFont::Helvetica, 'T'), 611);
        assert_eq!(FontMetrics::char_width(BuiltinFont::Helvetica, 'i'), 222);
        assert_eq!(FontMetrics::char_width(BuiltinFont::Helvetica, '~'), 584);
    }

    #[test]
    fn bold_is_wider() {
        assert_eq!(FontMetrics::char_width(BuiltinFont::HelveticaBold, 'i'), 278);
        let regular = FontMetrics::measure_text("Summary", BuiltinFont::Helvetica, 10.0);
        let bold = FontMetrics::measure_text("Summary", BuiltinFont::HelveticaBold, 10.0);
        assert!(bold > regular);
    }

    #[test]
    fn measure_scales_with_size() {
        // "npm" = 556 + 556 + 833
        let w = FontMetrics::measure_text("npm", BuiltinFont::Helvetica, 10.0);
        assert!((w - 19.45).abs() < 1e-9);
        let half = FontMetrics::measure_text("npm", BuiltinFont::Helvetica, 5.0);
        assert!((w - 2.0 * half).abs() < 1e-9);
    }

    #[test]
    fn bullet_and_unmapped_widths() {
        assert_eq!(FontMetrics::char_width(BuiltinFont::Helvetica, BULLET), 350);
        assert_eq!(FontMetrics::char_width(BuiltinFont::HelveticaBold, '\u{e9}'), 278);
    }

    #[test]
    fn bold_of_either_face_is_bold() {
        assert_eq!(BuiltinFont::Helvetica.bold(), BuiltinFont::HelveticaBold);
        assert_eq!(BuiltinFont::HelveticaBold.bold(), BuiltinFont::HelveticaBold);
        assert_eq!(BuiltinFont::HelveticaBold.pdf_name(), "F2");
    }
}
