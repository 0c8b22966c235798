use crate::content::TextBlock;
use crate::document::format_coord;
use crate::fonts::{BuiltinFont, FontMetrics, BULLET};
use crate::markup;
use crate::style::StyleSpec;
use crate::writer::escape_pdf_string;

/// A span of text in a single font.
#[derive(Debug, Clone)]
struct TextSpan {
    text: String,
    font: BuiltinFont,
}

/// A word extracted from spans, carrying its font and whether
/// it is preceded by a space.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub font: BuiltinFont,
    pub leading_space: bool,
}

/// One wrapped line. `width` is measured at the size the line was
/// wrapped at and includes inter-word spaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub words: Vec<Word>,
    pub width: f64,
}

/// The styled text of one block, ready to be wrapped into lines.
#[derive(Debug)]
pub struct TextFlow {
    spans: Vec<TextSpan>,
}

impl TextFlow {
    /// Parse a block's markup; bold spans use the bold face of the
    /// block's font.
    pub fn from_block(block: &TextBlock<'_>) -> Self {
        let base = block.style.font;
        let spans = markup::parse(&block.markup)
            .into_iter()
            .map(|span| TextSpan {
                font: if span.bold { base.bold() } else { base },
                text: span.text,
            })
            .collect();
        TextFlow { spans }
    }

    /// Split the spans on whitespace. A word remembers whether
    /// whitespace preceded it, even across a span boundary.
    fn extract_words(&self) -> Vec<Word> {
        let mut words = Vec::new();
        let mut had_space = false;
        for span in &self.spans {
            let mut word = String::new();
            for ch in span.text.chars() {
                if ch.is_whitespace() {
                    if !word.is_empty() {
                        words.push(Word {
                            text: std::mem::take(&mut word),
                            font: span.font,
                            leading_space: had_space && !words.is_empty(),
                        });
                    }
                    had_space = true;
                } else {
                    word.push(ch);
                }
            }
            if !word.is_empty() {
                words.push(Word {
                    text: word,
                    font: span.font,
                    leading_space: had_space && !words.is_empty(),
                });
                had_space = false;
            }
        }
        words
    }

    /// Greedy line filling. The first line gets `first_width`, the
    /// rest `rest_width`. A word wider than its line is placed alone
    /// on that line and overflows it.
    pub fn wrap(
        &self,
        font_size: f64,
        first_width: f64,
        rest_width: f64,
    ) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut current: Vec<Word> = Vec::new();
        let mut line_width = 0.0;

        for word in self.extract_words() {
            let available = if lines.is_empty() { first_width } else { rest_width };
            let word_width =
                FontMetrics::measure_text(&word.text, word.font, font_size);
            let space_width = if word.leading_space && !current.is_empty() {
                FontMetrics::measure_text(" ", word.font, font_size)
            } else {
                0.0
            };

            let total = line_width + space_width + word_width;
            if total > available && !current.is_empty() {
                lines.push(Line {
                    words: std::mem::take(&mut current),
                    width: line_width,
                });
                line_width = word_width;
            } else {
                line_width = total;
            }
            current.push(word);
        }

        if !current.is_empty() {
            lines.push(Line {
                words: current,
                width: line_width,
            });
        }
        lines
    }
}

/// Content stream operations drawing `lines` in `style` (already at
/// its final size). `x` is the frame's left edge and `baseline` the
/// first line's baseline.
pub(crate) fn block_ops(
    lines: &[Line],
    style: &StyleSpec,
    x: f64,
    baseline: f64,
) -> Vec<u8> {
    let mut output = Vec::new();
    if lines.is_empty() {
        return output;
    }
    let size = format_coord(style.font_size);

    if let Some(bullet) = style.bullet {
        output.extend_from_slice(b"BT\n");
        output.extend_from_slice(style.color.fill_op().as_bytes());
        output.extend_from_slice(
            format!(
                "/{} {} Tf\n{} {} Td\n({}) Tj\nET\n",
                style.font.pdf_name(),
                size,
                format_coord(x + bullet.indent),
                format_coord(baseline),
                escape_pdf_string(&BULLET.to_string()),
            )
            .as_bytes(),
        );
    }

    output.extend_from_slice(b"BT\n");
    output.extend_from_slice(style.color.fill_op().as_bytes());
    let mut active_font: Option<BuiltinFont> = None;

    for (n, line) in lines.iter().enumerate() {
        if n == 0 {
            output.extend_from_slice(
                format!(
                    "{} {} Td\n",
                    format_coord(x + style.first_line_offset()),
                    format_coord(baseline),
                )
                .as_bytes(),
            );
        } else {
            // Td is relative to the previous line's start.
            let dx = if n == 1 { -style.first_line_indent } else { 0.0 };
            output.extend_from_slice(
                format!(
                    "{} {} Td\n",
                    format_coord(dx),
                    format_coord(-style.leading),
                )
                .as_bytes(),
            );
        }

        for (i, word) in line.words.iter().enumerate() {
            if active_font != Some(word.font) {
                output.extend_from_slice(
                    format!("/{} {} Tf\n", word.font.pdf_name(), size).as_bytes(),
                );
                active_font = Some(word.font);
            }
            let display_text = if word.leading_space && i > 0 {
                format!(" {}", word.text)
            } else {
                word.text.clone()
            };
            output.extend_from_slice(
                format!("({}) Tj\n", escape_pdf_string(&display_text)).as_bytes(),
            );
        }
    }

    output.extend_from_slice(b"ET\n");
    output
}
