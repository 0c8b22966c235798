use std::io::{self, Write};

use crate::objects::{ObjId, PdfObject};

/// Serializes PDF objects to any `Write` target, remembering the
/// byte offset of every indirect object for the xref table.
pub struct PdfWriter<W: Write> {
    writer: W,
    offset: usize,
    xref_entries: Vec<(u32, usize)>,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(writer: W) -> Self {
        PdfWriter {
            writer,
            offset: 0,
            xref_entries: Vec::new(),
        }
    }

    fn write_bytes(&mut self, data: &[u8]) -> io::Result<()> {
        self.writer.write_all(data)?;
        self.offset += data.len();
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Write the PDF 1.7 header and binary comment.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.write_str("%PDF-1.7\n")?;
        // Four bytes >= 128 mark the file as binary.
        self.write_bytes(b"%\xe2\xe3\xcf\xd3\n")?;
        Ok(())
    }

    /// Write an indirect object, recording its byte offset for xref.
    pub fn write_object(
        &mut self,
        id: ObjId,
        obj: &PdfObject,
    ) -> io::Result<()> {
        self.xref_entries.push((id.0, self.offset));
        self.write_str(&format!("{} {} obj\n", id.0, id.1))?;
        self.write_pdf_object(obj)?;
        self.write_str("\nendobj\n")?;
        Ok(())
    }

    fn write_dict_entries(
        &mut self,
        entries: &[(String, PdfObject)],
    ) -> io::Result<()> {
        for (key, val) in entries {
            self.write_str(" /")?;
            self.write_str(key)?;
            self.write_str(" ")?;
            self.write_pdf_object(val)?;
        }
        Ok(())
    }

    fn write_pdf_object(
        &mut self,
        obj: &PdfObject,
    ) -> io::Result<()> {
        match obj {
            PdfObject::Integer(n) => self.write_str(&n.to_string()),
            PdfObject::Real(f) => self.write_str(&format_real(*f)),
            PdfObject::Name(name) => {
                self.write_str("/")?;
                self.write_str(name)
            }
            PdfObject::LiteralString(s) => {
                self.write_str("(")?;
                self.write_str(&escape_pdf_string(s))?;
                self.write_str(")")
            }
            PdfObject::Array(items) => {
                self.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write_str(" ")?;
                    }
                    self.write_pdf_object(item)?;
                }
                self.write_str("]")
            }
            PdfObject::Dictionary(entries) => {
                self.write_str("<<")?;
                self.write_dict_entries(entries)?;
                self.write_str(" >>")
            }
            PdfObject::Stream { dict, data } => {
                self.write_str("<<")?;
                self.write_dict_entries(dict)?;
                self.write_str(&format!(
                    " /Length {} >>\nstream\n",
                    data.len()
                ))?;
                self.write_bytes(data)?;
                self.write_str("\nendstream")
            }
            PdfObject::Reference(id) => {
                self.write_str(&format!("{} {} R", id.0, id.1))
            }
        }
    }

    /// Write xref table, trailer, startxref, and %%EOF.
    pub fn write_xref_and_trailer(
        &mut self,
        root_id: ObjId,
        info_id: Option<ObjId>,
    ) -> io::Result<()> {
        let xref_offset = self.offset;

        let size = self
            .xref_entries
            .iter()
            .map(|&(num, _)| num)
            .max()
            .unwrap_or(0)
            + 1;
        let mut offsets = vec![None; size as usize];
        for &(num, off) in &self.xref_entries {
            offsets[num as usize] = Some(off);
        }

        self.write_str(&format!("xref\n0 {}\n", size))?;
        // Head of the free list; every entry is exactly 20 bytes.
        self.write_bytes(b"0000000000 65535 f\r\n")?;
        for off in offsets.into_iter().skip(1) {
            match off {
                Some(off) => {
                    let entry = format!("{:010} 00000 n\r\n", off);
                    self.write_bytes(entry.as_bytes())?;
                }
                None => {
                    self.write_bytes(b"0000000000 00000 f\r\n")?
                }
            }
        }

        self.write_str(&format!(
            "trailer\n<< /Size {} /Root {} {} R",
            size, root_id.0, root_id.1,
        ))?;
        if let Some(info) = info_id {
            self.write_str(&format!(
                " /Info {} {} R",
                info.0, info.1
            ))?;
        }
        self.write_str(" >>\n")?;
        self.write_str(&format!(
            "startxref\n{}\n%%EOF\n",
            xref_offset
        ))?;
        self.writer.flush()
    }

    /// Return the inner writer, consuming this PdfWriter.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Escape a string for use inside a PDF literal string.
///
/// Characters outside printable ASCII are written as octal escapes
/// of their single-byte code, so `'\u{b7}'` becomes `\267`
/// (the StandardEncoding bullet).
pub fn escape_pdf_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '(' => result.push_str("\\("),
            ')' => result.push_str("\\)"),
            ' '..='~' => result.push(c),
            _ => {
                let code = u32::from(c);
                let byte = if code <= 0xff { code } else { u32::from(b'?') };
                result.push_str(&format!("\\{:03o}", byte));
            }
        }
    }
    result
}

/// Format a float for PDF output: no trailing zeros,
/// no scientific notation.
fn format_real(f: f64) -> String {
    if f == f.floor() && f.abs() < 1e15 {
        format!("{:.1}", f)
    } else {
        let s = format!("{:.6}", f);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bytes() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_header().unwrap();
        assert!(buf.starts_with(b"%PDF-1.7\n"));
        assert_eq!(buf[9], b'%');
        assert!(buf[10..14].iter().all(|&b| b >= 128));
    }

    #[test]
    fn write_page_dictionary() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        let obj = PdfObject::dict(vec![
            ("Type", PdfObject::name("Page")),
            ("Parent", PdfObject::Reference(ObjId(2, 0))),
            (
                "MediaBox",
                PdfObject::array(vec![
                    PdfObject::Integer(0),
                    PdfObject::Integer(0),
                    PdfObject::Real(612.0),
                    PdfObject::Real(792.0),
                ]),
            ),
        ]);
        w.write_object(ObjId(6, 0), &obj).unwrap();
        let output = String::from_utf8_lossy(&buf);
        assert!(output.starts_with("6 0 obj\n"));
        assert!(output.contains(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612.0 792.0] >>"
        ));
        assert!(output.ends_with("endobj\n"));
    }

    #[test]
    fn stream_length_matches_data() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        let obj = PdfObject::stream(
            vec![],
            b"BT /F1 8.7 Tf ET".to_vec(),
        );
        w.write_object(ObjId(5, 0), &obj).unwrap();
        let output = String::from_utf8_lossy(&buf);
        assert!(output.contains("<< /Length 16 >>\nstream\n"));
        assert!(output.contains("BT /F1 8.7 Tf ET\nendstream"));
    }

    #[test]
    fn xref_entries_are_20_bytes() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_header().unwrap();
        w.write_object(ObjId(1, 0), &PdfObject::name("Catalog"))
            .unwrap();
        w.write_xref_and_trailer(ObjId(1, 0), None).unwrap();

        let marker = b"xref\n0 2\n";
        let pos = buf
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap();
        let entries = &buf[pos + marker.len()..];
        assert_eq!(&entries[18..20], b"\r\n");
        assert_eq!(&entries[38..40], b"\r\n");
        assert_eq!(&entries[..10], b"0000000000");
        assert_eq!(&entries[20..30], b"0000000015");
    }

    #[test]
    fn gaps_in_object_numbers_become_free_entries() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_object(ObjId(2, 0), &PdfObject::Integer(1))
            .unwrap();
        w.write_xref_and_trailer(ObjId(2, 0), None).unwrap();
        let output = String::from_utf8_lossy(&buf);
        assert!(output.contains(
            "0 3\n0000000000 65535 f\r\n0000000000 00000 f\r\n"
        ));
    }

    #[test]
    fn trailer_has_required_keys() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_header().unwrap();
        w.write_object(ObjId(1, 0), &PdfObject::name("Catalog"))
            .unwrap();
        let info = PdfObject::dict(vec![(
            "Producer",
            PdfObject::literal_string("onepager"),
        )]);
        w.write_object(ObjId(2, 0), &info).unwrap();
        w.write_xref_and_trailer(ObjId(1, 0), Some(ObjId(2, 0)))
            .unwrap();

        let output = String::from_utf8_lossy(&buf);
        assert!(output.contains("/Size 3"));
        assert!(output.contains("/Root 1 0 R"));
        assert!(output.contains("/Info 2 0 R"));
        assert!(output.contains("(onepager)"));
        assert!(output.ends_with("%%EOF\n"));
    }

    #[test]
    fn format_real_values() {
        assert_eq!(format_real(612.0), "612.0");
        assert_eq!(format_real(0.0), "0.0");
        assert_eq!(format_real(8.7), "8.7");
        assert_eq!(format_real(39.6), "39.6");
    }

    #[test]
    fn escape_special_chars() {
        assert_eq!(escape_pdf_string("npm run dev"), "npm run dev");
        assert_eq!(escape_pdf_string("a(b)c"), "a\\(b\\)c");
        assert_eq!(escape_pdf_string("back\\slash"), "back\\\\slash");
        assert_eq!(escape_pdf_string("\u{b7}"), "\\267");
        assert_eq!(escape_pdf_string("\u{2192}"), "\\077");
    }
}
