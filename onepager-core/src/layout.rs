//! Vertical stacking of text blocks and the single-pass
//! shrink-to-fit that keeps everything on one page.

use crate::content::ContentSequence;
use crate::error::{Error, Result};
use crate::fonts::{FontMetrics, BULLET};
use crate::style::StyleSpec;
use crate::textflow::{self, Line, TextFlow};

/// A rectangle on the page. (x, y) is the upper-left corner in PDF
/// page coordinates; content flows downward from `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A wrapped block and its distance from the top of the flow.
#[derive(Debug, Clone)]
struct PlacedBlock<'s> {
    style: &'s StyleSpec,
    lines: Vec<Line>,
    top: f64,
}

/// Blocks flowed into a column of a given width at their natural
/// sizes.
#[derive(Debug, Clone)]
pub struct Flow<'s> {
    blocks: Vec<PlacedBlock<'s>>,
    height: f64,
    width: f64,
}

impl<'s> Flow<'s> {
    /// Wrap every block at `width` and stack them top-down.
    ///
    /// The first block's space-before is dropped, adjacent blocks are
    /// separated by the larger of the upper block's space-after and
    /// the lower block's space-before, and the last block's
    /// space-after is not part of the height.
    pub fn new(content: &ContentSequence<'s>, width: f64) -> Self {
        let mut blocks = Vec::with_capacity(content.len());
        let mut y = 0.0;
        let mut extent: f64 = 0.0;
        let mut prev_after: Option<f64> = None;

        for block in content.blocks() {
            let style = block.style;
            if let Some(after) = prev_after {
                y += after.max(style.space_before);
            }

            let lines = TextFlow::from_block(block).wrap(
                style.font_size,
                width - style.first_line_offset(),
                width - style.left_indent,
            );
            for (n, line) in lines.iter().enumerate() {
                let indent = if n == 0 {
                    style.first_line_offset()
                } else {
                    style.left_indent
                };
                extent = extent.max(indent + line.width);
            }
            if let (Some(bullet), false) = (style.bullet, lines.is_empty()) {
                let glyph = FontMetrics::measure_text(
                    &BULLET.to_string(),
                    style.font,
                    style.font_size,
                );
                extent = extent.max(bullet.indent + glyph);
            }

            let height = lines.len() as f64 * style.leading;
            blocks.push(PlacedBlock {
                style,
                lines,
                top: y,
            });
            y += height;
            prev_after = Some(style.space_after);
        }

        Flow {
            blocks,
            height: y,
            width: extent,
        }
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The widest line, indentation included.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn line_count(&self) -> usize {
        self.blocks.iter().map(|b| b.lines.len()).sum()
    }
}

/// The uniform factor that brings a natural size inside the frame.
/// Never above 1.
pub fn shrink_factor(
    natural_width: f64,
    natural_height: f64,
    frame_width: f64,
    frame_height: f64,
) -> f64 {
    let mut scale: f64 = 1.0;
    if natural_height > frame_height {
        scale = scale.min(frame_height / natural_height);
    }
    if natural_width > frame_width {
        scale = scale.min(frame_width / natural_width);
    }
    scale
}

/// Content laid out to fit a frame.
#[derive(Debug, Clone)]
pub struct FittedLayout<'s> {
    flow: Flow<'s>,
    scale: f64,
    natural_width: f64,
    natural_height: f64,
}

impl<'s> FittedLayout<'s> {
    /// Measure the content once at the frame width; if it does not
    /// fit, compute one scale factor and re-flow once with every
    /// metric scaled by it.
    ///
    /// Re-flowing scaled text at `frame_width` is the same as flowing
    /// unscaled text at `frame_width / scale`, which is what happens
    /// here; drawing applies the scale. A wider column never needs
    /// more lines, so the scaled height stays within the frame.
    pub fn shrink_to_fit(
        content: &ContentSequence<'s>,
        frame_width: f64,
        frame_height: f64,
    ) -> Result<Self> {
        if frame_width <= 0.0 || frame_height <= 0.0 {
            return Err(Error::Geometry {
                width: frame_width,
                height: frame_height,
            });
        }

        let natural = Flow::new(content, frame_width);
        let (natural_width, natural_height) = (natural.width(), natural.height());
        let scale =
            shrink_factor(natural_width, natural_height, frame_width, frame_height);
        log::debug!(
            "natural size {:.2}x{:.2}pt in frame {:.2}x{:.2}pt, scale {:.4}",
            natural_width,
            natural_height,
            frame_width,
            frame_height,
            scale,
        );

        let flow = if scale < 1.0 {
            Flow::new(content, frame_width / scale)
        } else {
            natural
        };

        Ok(FittedLayout {
            flow,
            scale,
            natural_width,
            natural_height,
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn natural_width(&self) -> f64 {
        self.natural_width
    }

    pub fn natural_height(&self) -> f64 {
        self.natural_height
    }

    /// Height as drawn.
    pub fn height(&self) -> f64 {
        self.flow.height() * self.scale
    }

    /// Width as drawn.
    pub fn width(&self) -> f64 {
        self.flow.width() * self.scale
    }

    pub fn line_count(&self) -> usize {
        self.flow.line_count()
    }

    /// Content stream operations drawing the layout with its
    /// bottom-left corner at (x, y).
    pub fn content_ops(&self, x: f64, y: f64) -> Vec<u8> {
        let top = y + self.height();
        let mut ops = Vec::new();
        for block in &self.flow.blocks {
            let style = block.style.scaled(self.scale);
            let block_top = top - block.top * self.scale;
            let baseline = block_top - style.font_size;
            ops.extend(textflow::block_ops(&block.lines, &style, x, baseline));
        }
        ops
    }
}
