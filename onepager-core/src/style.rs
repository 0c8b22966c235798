//! Named paragraph styles.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::fonts::BuiltinFont;
use crate::graphics::Color;

/// A bullet drawn in front of the first line of a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletMark {
    /// Distance from the frame's left edge to the bullet glyph.
    pub indent: f64,
}

/// Typographic attributes of one kind of text block. All lengths
/// are in points.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSpec {
    pub name: String,
    pub font: BuiltinFont,
    pub font_size: f64,
    /// Baseline-to-baseline distance.
    pub leading: f64,
    pub color: Color,
    pub space_before: f64,
    pub space_after: f64,
    pub left_indent: f64,
    /// Added to `left_indent` on the first line; negative for a
    /// hanging indent.
    pub first_line_indent: f64,
    pub bullet: Option<BulletMark>,
}

impl StyleSpec {
    /// A plain style: no spacing, no indentation, no bullet.
    pub fn new(
        name: &str,
        font: BuiltinFont,
        font_size: f64,
        leading: f64,
        color: Color,
    ) -> Self {
        StyleSpec {
            name: name.to_string(),
            font,
            font_size,
            leading,
            color,
            space_before: 0.0,
            space_after: 0.0,
            left_indent: 0.0,
            first_line_indent: 0.0,
            bullet: None,
        }
    }

    pub fn spacing(mut self, before: f64, after: f64) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    pub fn indent(mut self, left: f64, first_line: f64) -> Self {
        self.left_indent = left;
        self.first_line_indent = first_line;
        self
    }

    pub fn bullet(mut self, indent: f64) -> Self {
        self.bullet = Some(BulletMark { indent });
        self
    }

    /// Indent of the first line from the frame's left edge.
    pub fn first_line_offset(&self) -> f64 {
        self.left_indent + self.first_line_indent
    }

    /// This style with every length multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> StyleSpec {
        StyleSpec {
            name: self.name.clone(),
            font: self.font,
            font_size: self.font_size * factor,
            leading: self.leading * factor,
            color: self.color,
            space_before: self.space_before * factor,
            space_after: self.space_after * factor,
            left_indent: self.left_indent * factor,
            first_line_indent: self.first_line_indent * factor,
            bullet: self.bullet.map(|b| BulletMark {
                indent: b.indent * factor,
            }),
        }
    }
}

/// Styles keyed by name.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    styles: BTreeMap<String, StyleSpec>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed palette of the summary page: `title`, `subtitle`,
    /// `h2`, `body` and `bullet`.
    pub fn summary() -> Self {
        let ink = Color::hex(0x111111);
        let mut sheet = StyleSheet::new();
        sheet.insert(
            StyleSpec::new("title", BuiltinFont::HelveticaBold, 15.0, 17.0, ink)
                .spacing(0.0, 3.0),
        );
        sheet.insert(
            StyleSpec::new(
                "subtitle",
                BuiltinFont::Helvetica,
                8.4,
                10.0,
                Color::hex(0x444444),
            )
            .spacing(0.0, 5.0),
        );
        sheet.insert(
            StyleSpec::new(
                "h2",
                BuiltinFont::HelveticaBold,
                10.2,
                12.0,
                Color::hex(0x0f2742),
            )
            .spacing(4.0, 1.0),
        );
        sheet.insert(
            StyleSpec::new("body", BuiltinFont::Helvetica, 8.7, 10.8, ink)
                .spacing(0.0, 2.0),
        );
        sheet.insert(
            StyleSpec::new("bullet", BuiltinFont::Helvetica, 8.3, 10.2, ink)
                .spacing(0.0, 1.0)
                .indent(13.0, -7.0)
                .bullet(3.0),
        );
        sheet
    }

    /// Add or replace a style under its own name.
    pub fn insert(&mut self, style: StyleSpec) {
        self.styles.insert(style.name.clone(), style);
    }

    pub fn remove(&mut self, name: &str) -> Option<StyleSpec> {
        self.styles.remove(name)
    }

    pub fn get(&self, name: &str) -> Result<&StyleSpec> {
        self.styles
            .get(name)
            .ok_or_else(|| Error::MissingStyle(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_sheet_has_all_styles() {
        let sheet = StyleSheet::summary();
        for name in ["title", "subtitle", "h2", "body", "bullet"] {
            assert_eq!(sheet.get(name).unwrap().name, name);
        }
    }

    #[test]
    fn missing_style_is_an_error() {
        let sheet = StyleSheet::summary();
        match sheet.get("caption") {
            Err(Error::MissingStyle(name)) => assert_eq!(name, "caption"),
            other => panic!("expected MissingStyle, got {:?}", other),
        }
    }

    #[test]
    fn bullet_style_hangs_first_line() {
        let sheet = StyleSheet::summary();
        let bullet = sheet.get("bullet").unwrap();
        assert_eq!(bullet.first_line_offset(), 6.0);
        assert_eq!(bullet.bullet, Some(BulletMark { indent: 3.0 }));
    }

    #[test]
    fn scaled_preserves_ratios() {
        let sheet = StyleSheet::summary();
        let h2 = sheet.get("h2").unwrap();
        let body = sheet.get("body").unwrap();
        let (sh2, sbody) = (h2.scaled(0.5), body.scaled(0.5));
        assert!((sh2.font_size - 5.1).abs() < 1e-12);
        assert!((sh2.space_before - 2.0).abs() < 1e-12);
        assert!(
            (sh2.font_size / sbody.font_size - h2.font_size / body.font_size)
                .abs()
                < 1e-12
        );
        assert_eq!(sh2.color, h2.color);
    }
}
