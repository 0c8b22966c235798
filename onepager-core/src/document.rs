use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::fonts::BuiltinFont;
use crate::layout::FittedLayout;
use crate::objects::{ObjId, PdfObject};
use crate::writer::PdfWriter;

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FIRST_FONT_OBJ_NUM: u32 = 3;

/// Builds a PDF document page by page.
///
/// Generic over `Write` so it works with files, in-memory buffers
/// (`Vec<u8>`), or any other writer. `end_page()` writes the page's
/// objects immediately; only the page tree, catalog and xref wait
/// for `end_document()`.
pub struct PdfDocument<W: Write> {
    writer: PdfWriter<W>,
    info: Vec<(String, String)>,
    page_obj_ids: Vec<ObjId>,
    current_page: Option<PageBuilder>,
    next_obj_num: u32,
    compress: bool,
}

struct PageBuilder {
    width: f64,
    height: f64,
    content_ops: Vec<u8>,
}

fn font_obj_id(font: BuiltinFont) -> ObjId {
    let index = BuiltinFont::all()
        .iter()
        .position(|f| *f == font)
        .unwrap_or(0);
    ObjId(FIRST_FONT_OBJ_NUM + index as u32, 0)
}

fn no_open_page() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "no open page")
}

impl<W: Write> PdfDocument<W> {
    /// Start a document on `writer`. The header and the shared font
    /// objects are written immediately.
    pub fn new(writer: W) -> io::Result<Self> {
        let mut pdf_writer = PdfWriter::new(writer);
        pdf_writer.write_header()?;

        for font in BuiltinFont::all() {
            pdf_writer.write_object(
                font_obj_id(font),
                &PdfObject::type1_font(font.pdf_base_name()),
            )?;
        }

        Ok(PdfDocument {
            writer: pdf_writer,
            info: Vec::new(),
            page_obj_ids: Vec::new(),
            current_page: None,
            next_obj_num: FIRST_FONT_OBJ_NUM + BuiltinFont::all().len() as u32,
            compress: false,
        })
    }

    /// Set a document info entry (e.g. "Producer").
    pub fn set_info(&mut self, key: &str, value: &str) -> &mut Self {
        self.info.push((key.to_string(), value.to_string()));
        self
    }

    /// Flate-compress page content streams written from now on.
    pub fn set_compression(&mut self, enabled: bool) -> &mut Self {
        self.compress = enabled;
        self
    }

    /// Number of pages finished so far.
    pub fn page_count(&self) -> usize {
        self.page_obj_ids.len()
    }

    /// Begin a new page with the given dimensions in points.
    /// An open page is finished first.
    pub fn begin_page(&mut self, width: f64, height: f64) -> io::Result<&mut Self> {
        if self.current_page.is_some() {
            self.end_page()?;
        }
        self.current_page = Some(PageBuilder {
            width,
            height,
            content_ops: Vec::new(),
        });
        Ok(self)
    }

    /// Draw a fitted layout on the current page with its bottom-left
    /// corner at (x, y). Coordinates use PDF's bottom-left origin.
    pub fn place_layout(
        &mut self,
        layout: &FittedLayout<'_>,
        x: f64,
        y: f64,
    ) -> io::Result<&mut Self> {
        let page = self.current_page.as_mut().ok_or_else(no_open_page)?;
        page.content_ops.extend(layout.content_ops(x, y));
        Ok(self)
    }

    /// Finish the current page: write its content stream and page
    /// dictionary.
    pub fn end_page(&mut self) -> io::Result<()> {
        let page = self.current_page.take().ok_or_else(no_open_page)?;

        let content_id = ObjId(self.next_obj_num, 0);
        let page_id = ObjId(self.next_obj_num + 1, 0);
        self.next_obj_num += 2;

        let content_stream = if self.compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&page.content_ops)?;
            PdfObject::stream(
                vec![("Filter", PdfObject::name("FlateDecode"))],
                encoder.finish()?,
            )
        } else {
            PdfObject::stream(vec![], page.content_ops)
        };
        self.writer.write_object(content_id, &content_stream)?;

        let fonts = BuiltinFont::all()
            .into_iter()
            .map(|font| (font.pdf_name(), PdfObject::Reference(font_obj_id(font))))
            .collect();
        let page_dict = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(PAGES_OBJ)),
            (
                "MediaBox",
                PdfObject::array(vec![
                    PdfObject::Integer(0),
                    PdfObject::Integer(0),
                    PdfObject::Real(page.width),
                    PdfObject::Real(page.height),
                ]),
            ),
            ("Contents", PdfObject::Reference(content_id)),
            (
                "Resources",
                PdfObject::dict(vec![("Font", PdfObject::dict(fonts))]),
            ),
        ]);
        self.writer.write_object(page_id, &page_dict)?;

        self.page_obj_ids.push(page_id);
        Ok(())
    }

    /// Finish the document: info dictionary, page tree, catalog, xref
    /// and trailer. An open page is finished first.
    pub fn end_document(mut self) -> io::Result<W> {
        if self.current_page.is_some() {
            self.end_page()?;
        }

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = ObjId(self.next_obj_num, 0);
            self.next_obj_num += 1;
            let entries = self
                .info
                .iter()
                .map(|(k, v)| (k.as_str(), PdfObject::literal_string(v)))
                .collect();
            self.writer.write_object(id, &PdfObject::dict(entries))?;
            Some(id)
        };

        let kids = self
            .page_obj_ids
            .iter()
            .map(|id| PdfObject::Reference(*id))
            .collect();
        let pages = PdfObject::dict(vec![
            ("Type", PdfObject::name("Pages")),
            ("Kids", PdfObject::Array(kids)),
            ("Count", PdfObject::Integer(self.page_obj_ids.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;

        self.writer.write_xref_and_trailer(CATALOG_OBJ, info_id)?;
        Ok(self.writer.into_inner())
    }
}

/// Format a coordinate value for PDF content streams.
pub(crate) fn format_coord(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" {
            "0".to_string()
        } else {
            s.to_string()
        }
    }
}
