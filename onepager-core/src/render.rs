//! Puts a content sequence on exactly one page and writes the PDF.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::content::ContentSequence;
use crate::document::PdfDocument;
use crate::error::{Error, Result};
use crate::layout::{FittedLayout, Rect};

use tempfile::NamedTempFile;

const POINTS_PER_INCH: f64 = 72.0;

/// Physical page size and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    /// Left and right margin.
    pub margin_x: f64,
}

impl PageGeometry {
    /// US Letter with 0.6in side and top margins and a 0.55in
    /// bottom margin.
    pub fn letter() -> Self {
        PageGeometry {
            width: 8.5 * POINTS_PER_INCH,
            height: 11.0 * POINTS_PER_INCH,
            margin_top: 0.6 * POINTS_PER_INCH,
            margin_bottom: 0.55 * POINTS_PER_INCH,
            margin_x: 0.6 * POINTS_PER_INCH,
        }
    }

    /// The area left for content once margins are removed.
    pub fn frame(&self) -> Result<Rect> {
        let frame = Rect {
            x: self.margin_x,
            y: self.height - self.margin_top,
            width: self.width - 2.0 * self.margin_x,
            height: self.height - self.margin_top - self.margin_bottom,
        };
        if frame.width <= 0.0 || frame.height <= 0.0 {
            return Err(Error::Geometry {
                width: frame.width,
                height: frame.height,
            });
        }
        Ok(frame)
    }
}

/// What a render produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderReport {
    pub scale: f64,
    pub natural_height: f64,
    pub drawn_height: f64,
    pub page_count: usize,
}

/// Lays content out on a single page.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    geometry: PageGeometry,
    compress: bool,
    producer: String,
}

impl PageRenderer {
    pub fn new(geometry: PageGeometry) -> Self {
        PageRenderer {
            geometry,
            compress: false,
            producer: concat!("onepager ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Flate-compress the page content stream.
    pub fn compress(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Fit `content` into the frame without drawing anything.
    pub fn fit<'s>(&self, content: &ContentSequence<'s>) -> Result<FittedLayout<'s>> {
        let frame = self.geometry.frame()?;
        FittedLayout::shrink_to_fit(content, frame.width, frame.height)
    }

    /// Render to any writer and hand the writer back.
    pub fn render<W: Write>(
        &self,
        content: &ContentSequence<'_>,
        writer: W,
    ) -> Result<(W, RenderReport)> {
        let layout = self.fit(content)?;
        let geometry = &self.geometry;
        // Top-aligned: leftover space stays at the bottom.
        let origin_y = geometry.height - geometry.margin_top - layout.height();

        let mut doc = PdfDocument::new(writer)?;
        doc.set_compression(self.compress);
        doc.set_info("Producer", &self.producer);
        doc.begin_page(geometry.width, geometry.height)?;
        doc.place_layout(&layout, geometry.margin_x, origin_y)?;
        doc.end_page()?;
        let page_count = doc.page_count();
        let writer = doc.end_document()?;

        let report = RenderReport {
            scale: layout.scale(),
            natural_height: layout.natural_height(),
            drawn_height: layout.height(),
            page_count,
        };
        Ok((writer, report))
    }

    /// Render and write the document to `path`, replacing any file
    /// already there.
    ///
    /// The document is assembled in memory first, so layout and
    /// geometry errors never touch the filesystem. The bytes go to a
    /// temporary file next to `path` which is then renamed over it: a
    /// failed write leaves whatever was at `path` untouched and the
    /// temporary file is removed.
    pub fn render_to_path<P: AsRef<Path>>(
        &self,
        content: &ContentSequence<'_>,
        path: P,
    ) -> Result<RenderReport> {
        let path = path.as_ref();
        let (bytes, report) = self.render(content, Vec::new())?;
        write_replacing(path, &bytes)?;

        log::info!(
            "wrote {} ({} bytes, scale {:.4})",
            path.display(),
            bytes.len(),
            report.scale
        );
        Ok(report)
    }
}

/// Write `bytes` to a temporary file in the target directory, then
/// rename it onto `path`.
fn write_replacing(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    set_output_permissions(tmp.as_file(), path)?;

    tmp.persist(path).map_err(|err| {
        log::warn!(
            "could not move {} onto {}: {}",
            err.file.path().display(),
            path.display(),
            err.error
        );
        Error::Io(err.error)
    })?;
    Ok(())
}

/// A replaced file keeps its permissions; a new one is world-readable
/// rather than owner-only like the temporary file.
fn set_output_permissions(file: &File, path: &Path) -> io::Result<()> {
    if let Ok(meta) = fs::metadata(path) {
        if meta.is_file() {
            return file.set_permissions(meta.permissions());
        }
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_frame() {
        let frame = PageGeometry::letter().frame().unwrap();
        assert!((frame.x - 43.2).abs() < 1e-9);
        assert!((frame.y - 748.8).abs() < 1e-9);
        assert!((frame.width - 525.6).abs() < 1e-9);
        assert!((frame.height - 709.2).abs() < 1e-9);
    }

    #[test]
    fn margins_wider_than_page_are_rejected() {
        let geometry = PageGeometry {
            margin_x: 306.0,
            ..PageGeometry::letter()
        };
        assert!(matches!(geometry.frame(), Err(Error::Geometry { .. })));

        let geometry = PageGeometry {
            margin_top: 400.0,
            margin_bottom: 400.0,
            ..PageGeometry::letter()
        };
        match geometry.frame() {
            Err(Error::Geometry { height, .. }) => assert!(height < 0.0),
            other => panic!("expected Geometry error, got {:?}", other),
        }
    }
}
