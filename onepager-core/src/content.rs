//! The summary's text, kept as data, and the builder that turns it
//! into styled blocks.

use crate::error::Result;
use crate::style::{StyleSheet, StyleSpec};

/// One paragraph, heading or bullet item: markup plus the style it
/// is set in.
#[derive(Debug, Clone)]
pub struct TextBlock<'s> {
    pub markup: String,
    pub style: &'s StyleSpec,
}

/// Blocks in top-to-bottom document order.
#[derive(Debug, Clone, Default)]
pub struct ContentSequence<'s> {
    blocks: Vec<TextBlock<'s>>,
}

impl<'s> ContentSequence<'s> {
    pub fn blocks(&self) -> &[TextBlock<'s>] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn push(&mut self, markup: &str, style: &'s StyleSpec) {
        self.blocks.push(TextBlock {
            markup: markup.to_string(),
            style,
        });
    }
}

/// A block of text under a section header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Paragraph(String),
    Bullet(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub header: String,
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn new(header: &str) -> Self {
        Section {
            header: header.to_string(),
            entries: Vec::new(),
        }
    }

    pub fn paragraph(mut self, markup: &str) -> Self {
        self.entries.push(Entry::Paragraph(markup.to_string()));
        self
    }

    pub fn bullets(mut self, items: &[&str]) -> Self {
        self.entries
            .extend(items.iter().map(|s| Entry::Bullet(s.to_string())));
        self
    }
}

/// Everything printed on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryContent {
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<Section>,
}

const NOT_FOUND: &str = "<b>Not found in repo.</b>";

impl SummaryContent {
    /// The Tova app summary.
    pub fn tova() -> Self {
        let sections = vec![
            Section::new("What it is").paragraph(
                "Tova is a Vite + Three.js single-page first-person exploration app that runs \
                 in the browser. It combines procedural terrain, stylized structures, \
                 atmosphere, and movement controls in a real-time render loop.",
            ),
            Section::new("Who it is for").paragraph(&format!(
                "Primary user/persona: {NOT_FOUND} Inferred from the implemented controls \
                 and UI: desktop keyboard-and-mouse players exploring a fantasy scene."
            )),
            Section::new("What it does").bullets(&[
                "Pointer-lock first-person movement with WASD/arrow keys and fly/walk chat \
                 commands.",
                "Procedural terrain generation with central hill, flattened town zone, ocean \
                 drop-off, and valley carving.",
                "Dynamic day/night environment updates for sun, fog, sky color, and light \
                 intensities.",
                "World composition modules: ocean tide motion, layered mountain ring, and \
                 instanced forest placement.",
                "Procedural structure placement: merged-geometry castle and town aligned to \
                 sampled terrain height.",
                "In-game overlays: loading state, crosshair, FPS/coordinates readout, \
                 day/night progress bar, and ambient music toggle.",
            ]),
            Section::new("How it works (repo-evidence architecture)").bullets(&[
                "`index.html` loads `src/main.js`; `main.js` initializes Scene, Camera, \
                 WebGLRenderer, and optional postprocessing.",
                "`main.js` creates Environment, Terrain, Ocean, Mountains, Forest, Castle, \
                 Town, and Player components.",
                "Player input and chat commands flow to movement logic and environment \
                 override (`day`/`night`).",
                "Terrain height queries (`getHeightAt`) drive player ground alignment and \
                 structure/vegetation placement.",
                "Animation loop (`THREE.Clock`) updates environment/ocean/player/mountains, \
                 then renders via composer or renderer.",
                &format!("External backend services/API calls for gameplay: {NOT_FOUND}"),
            ]),
            Section::new("How to run (minimal)").bullets(&[
                "From repo root: `npm install`",
                "Start dev server: `npm run dev`",
                "Open the local Vite URL shown in terminal.",
                &format!("Automated test/lint scripts in `package.json`: {NOT_FOUND}"),
            ]),
        ];

        SummaryContent {
            title: "Tova App Summary".to_string(),
            subtitle: "Repository-based one-page overview".to_string(),
            sections,
        }
    }

    /// Lay the content out as blocks styled from `styles`.
    ///
    /// Every style the summary uses is looked up before any block is
    /// produced, so a sheet missing one fails even if no block would
    /// have needed it.
    pub fn build<'s>(&self, styles: &'s StyleSheet) -> Result<ContentSequence<'s>> {
        let title = styles.get("title")?;
        let subtitle = styles.get("subtitle")?;
        let header = styles.get("h2")?;
        let body = styles.get("body")?;
        let bullet = styles.get("bullet")?;

        let mut seq = ContentSequence::default();
        seq.push(&self.title, title);
        seq.push(&self.subtitle, subtitle);
        for section in &self.sections {
            seq.push(&section.header, header);
            for entry in &section.entries {
                match entry {
                    Entry::Paragraph(text) => seq.push(text, body),
                    Entry::Bullet(text) => seq.push(text, bullet),
                }
            }
        }
        log::debug!("built {} text blocks", seq.len());
        Ok(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn tova_block_order() {
        let styles = StyleSheet::summary();
        let seq = SummaryContent::tova().build(&styles).unwrap();
        // title, subtitle, 5 headers, 2 paragraphs, 6 + 6 + 4 bullets
        assert_eq!(seq.len(), 25);

        let names: Vec<&str> =
            seq.blocks().iter().map(|b| b.style.name.as_str()).collect();
        assert_eq!(&names[..5], &["title", "subtitle", "h2", "body", "h2"]);
        assert_eq!(names.iter().filter(|n| **n == "h2").count(), 5);
        assert_eq!(names.iter().filter(|n| **n == "bullet").count(), 16);
        assert_eq!(seq.blocks()[0].markup, "Tova App Summary");
    }

    #[test]
    fn headers_appear_in_order() {
        let styles = StyleSheet::summary();
        let seq = SummaryContent::tova().build(&styles).unwrap();
        let headers: Vec<&str> = seq
            .blocks()
            .iter()
            .filter(|b| b.style.name == "h2")
            .map(|b| b.markup.as_str())
            .collect();
        assert_eq!(
            headers,
            vec![
                "What it is",
                "Who it is for",
                "What it does",
                "How it works (repo-evidence architecture)",
                "How to run (minimal)",
            ]
        );
    }

    #[test]
    fn not_found_marker_is_bold() {
        let content = SummaryContent::tova();
        let count = content
            .sections
            .iter()
            .flat_map(|s| s.entries.iter())
            .filter(|e| match e {
                Entry::Paragraph(t) | Entry::Bullet(t) => t.contains(NOT_FOUND),
            })
            .count();
        assert_eq!(count, 3);
    }

    #[test]
    fn missing_style_fails_fast() {
        let mut styles = StyleSheet::summary();
        styles.remove("bullet");
        let content = SummaryContent {
            title: "t".to_string(),
            subtitle: "s".to_string(),
            sections: Vec::new(),
        };
        match content.build(&styles) {
            Err(Error::MissingStyle(name)) => assert_eq!(name, "bullet"),
            other => panic!("expected MissingStyle, got {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn building_twice_is_identical() {
        let styles = StyleSheet::summary();
        let a = SummaryContent::tova().build(&styles).unwrap();
        let b = SummaryContent::tova().build(&styles).unwrap();
        let markup = |s: &ContentSequence| {
            s.blocks().iter().map(|b| b.markup.clone()).collect::<Vec<_>>()
        };
        assert_eq!(markup(&a), markup(&b));
    }
}
