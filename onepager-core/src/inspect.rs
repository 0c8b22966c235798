//! Reads back a PDF produced by this crate: page tree and the text
//! drawn on each page.
//!
//! Only classic xref tables are understood, and only `Tj` text
//! operators are decoded, which covers everything the renderer emits.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use flate2::read::ZlibDecoder;
use thiserror::Error;

/// Errors that can occur when inspecting a PDF.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InspectError {
    #[error("not a PDF file")]
    NotAPdf,
    #[error("startxref not found")]
    StartxrefNotFound,
    #[error("malformed or missing xref table")]
    MalformedXref,
    #[error("malformed or missing trailer")]
    MalformedTrailer,
    #[error("cannot resolve object {0}")]
    UnresolvableObject(u32),
    #[error("malformed page tree")]
    MalformedPageTree,
    #[error("cannot decode stream in object {0}")]
    BadStream(u32),
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for InspectError {
    fn from(e: std::io::Error) -> Self {
        InspectError::Io(e.to_string())
    }
}

type Dict = HashMap<String, String>;

/// A parsed PDF file.
pub struct PdfInspector {
    data: Vec<u8>,
    xref: HashMap<u32, usize>,
    version: String,
    root: u32,
}

impl PdfInspector {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, InspectError> {
        Self::from_bytes(std::fs::read(path.as_ref())?)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, InspectError> {
        let version = parse_version(&data)?;
        let xref_offset = find_startxref(&data)?;
        let xref = parse_xref(&data[xref_offset..])?;
        let root = parse_trailer_root(&data[xref_offset..])?;
        Ok(PdfInspector {
            data,
            xref,
            version,
            root,
        })
    }

    /// PDF version string (e.g. `"1.7"`).
    pub fn pdf_version(&self) -> &str {
        &self.version
    }

    /// The page tree's `/Count`.
    pub fn page_count(&self) -> Result<usize, InspectError> {
        let pages = self.pages_dict()?;
        pages
            .get("Count")
            .and_then(|c| c.parse().ok())
            .ok_or(InspectError::MalformedPageTree)
    }

    /// The `/MediaBox` of every page, as (width, height).
    pub fn page_sizes(&self) -> Result<Vec<(f64, f64)>, InspectError> {
        self.page_dicts()?
            .iter()
            .map(|page| {
                let nums: Vec<f64> = page
                    .get("MediaBox")
                    .map(|b| numbers(b))
                    .unwrap_or_default();
                match nums.as_slice() {
                    [x0, y0, x1, y1] => Ok((x1 - x0, y1 - y0)),
                    _ => Err(InspectError::MalformedPageTree),
                }
            })
            .collect()
    }

    /// Text drawn on each page, one string per page. Text objects
    /// sharing a baseline are joined into one line; lines are
    /// separated by `\n`.
    pub fn page_texts(&self) -> Result<Vec<String>, InspectError> {
        self.page_dicts()?
            .iter()
            .map(|page| {
                let contents = page
                    .get("Contents")
                    .and_then(|c| reference(c))
                    .ok_or(InspectError::MalformedPageTree)?;
                let ops = self.stream_data(contents)?;
                Ok(extract_text(&ops).join("\n"))
            })
            .collect()
    }

    fn pages_dict(&self) -> Result<Dict, InspectError> {
        let catalog = self.resolve_dict(self.root)?;
        let pages = catalog
            .get("Pages")
            .and_then(|p| reference(p))
            .ok_or(InspectError::MalformedPageTree)?;
        self.resolve_dict(pages)
    }

    fn page_dicts(&self) -> Result<Vec<Dict>, InspectError> {
        let pages = self.pages_dict()?;
        let kids = pages.get("Kids").ok_or(InspectError::MalformedPageTree)?;
        references(kids)
            .into_iter()
            .map(|id| self.resolve_dict(id))
            .collect()
    }

    /// Bytes following the `N G obj` header of an object.
    fn object_body(&self, obj_num: u32) -> Result<&[u8], InspectError> {
        let offset = self
            .xref
            .get(&obj_num)
            .copied()
            .filter(|&off| off < self.data.len())
            .ok_or(InspectError::UnresolvableObject(obj_num))?;
        skip_obj_header(&self.data[offset..])
            .ok_or(InspectError::UnresolvableObject(obj_num))
    }

    fn resolve_dict(&self, obj_num: u32) -> Result<Dict, InspectError> {
        let body = self.object_body(obj_num)?;
        parse_dict(body)
            .map(|(dict, _)| dict)
            .ok_or(InspectError::UnresolvableObject(obj_num))
    }

    /// Decoded data of a stream object.
    fn stream_data(&self, obj_num: u32) -> Result<Vec<u8>, InspectError> {
        let bad = InspectError::BadStream(obj_num);
        let body = self.object_body(obj_num)?;
        let (dict, rest) = parse_dict(body).ok_or_else(|| bad.clone())?;
        let length: usize = dict
            .get("Length")
            .and_then(|l| l.parse().ok())
            .ok_or_else(|| bad.clone())?;

        let rest = skip_ascii_whitespace(rest);
        let rest = rest.strip_prefix(b"stream").ok_or_else(|| bad.clone())?;
        let rest = rest
            .strip_prefix(b"\r\n")
            .or_else(|| rest.strip_prefix(b"\n"))
            .ok_or_else(|| bad.clone())?;
        let raw = rest.get(..length).ok_or_else(|| bad.clone())?;

        match dict.get("Filter").map(String::as_str) {
            None => Ok(raw.to_vec()),
            Some("/FlateDecode") => {
                let mut out = Vec::new();
                ZlibDecoder::new(raw)
                    .read_to_end(&mut out)
                    .map_err(|_| bad.clone())?;
                Ok(out)
            }
            Some(_) => Err(bad),
        }
    }
}

// ── File structure ─────────────────────────────────────────────────────────────

fn parse_version(data: &[u8]) -> Result<String, InspectError> {
    let rest = data.strip_prefix(b"%PDF-").ok_or(InspectError::NotAPdf)?;
    let end = rest
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(rest.len());
    std::str::from_utf8(&rest[..end])
        .map(str::to_string)
        .map_err(|_| InspectError::NotAPdf)
}

/// `startxref` sits within the last kilobyte of the file.
fn find_startxref(data: &[u8]) -> Result<usize, InspectError> {
    let tail_start = data.len().saturating_sub(1024);
    let tail = &data[tail_start..];
    let keyword = b"startxref";
    let pos = tail
        .windows(keyword.len())
        .rposition(|w| w == keyword)
        .ok_or(InspectError::StartxrefNotFound)?;
    let (token, _) = next_token(&tail[pos + keyword.len()..])
        .ok_or(InspectError::StartxrefNotFound)?;
    token
        .parse()
        .ok()
        .filter(|&off: &usize| off < data.len())
        .ok_or(InspectError::StartxrefNotFound)
}

/// Parse `xref` subsections of fixed 20-byte entries.
fn parse_xref(section: &[u8]) -> Result<HashMap<u32, usize>, InspectError> {
    let mut cursor = skip_ascii_whitespace(section)
        .strip_prefix(b"xref")
        .ok_or(InspectError::MalformedXref)?;
    let mut map = HashMap::new();

    loop {
        cursor = skip_ascii_whitespace(cursor);
        if cursor.is_empty() || cursor.starts_with(b"trailer") {
            break;
        }
        let (first, rest) = next_token(cursor).ok_or(InspectError::MalformedXref)?;
        let (count, rest) = next_token(rest).ok_or(InspectError::MalformedXref)?;
        let first: u32 = first.parse().map_err(|_| InspectError::MalformedXref)?;
        let count: usize = count.parse().map_err(|_| InspectError::MalformedXref)?;

        let entries = skip_line(rest);
        if entries.len() < count * 20 {
            return Err(InspectError::MalformedXref);
        }
        for (i, entry) in entries[..count * 20].chunks(20).enumerate() {
            if entry[17] != b'n' {
                continue;
            }
            let offset = std::str::from_utf8(&entry[..10])
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or(InspectError::MalformedXref)?;
            map.insert(first + i as u32, offset);
        }
        cursor = &entries[count * 20..];
    }
    Ok(map)
}

fn parse_trailer_root(section: &[u8]) -> Result<u32, InspectError> {
    let keyword = b"trailer";
    let pos = section
        .windows(keyword.len())
        .position(|w| w == keyword)
        .ok_or(InspectError::MalformedTrailer)?;
    let (dict, _) =
        parse_dict(&section[pos + keyword.len()..]).ok_or(InspectError::MalformedTrailer)?;
    dict.get("Root")
        .and_then(|r| reference(r))
        .ok_or(InspectError::MalformedTrailer)
}

// ── Objects ────────────────────────────────────────────────────────────────────

/// Parse a `<<...>>` dictionary into `key -> raw value text`, returning
/// the bytes after the closing `>>`. References keep their `N G R`
/// form; arrays, strings and nested dictionaries are kept verbatim.
fn parse_dict(data: &[u8]) -> Option<(Dict, &[u8])> {
    let mut cursor = skip_ascii_whitespace(data).strip_prefix(b"<<")?;
    let mut dict = HashMap::new();

    loop {
        cursor = skip_ascii_whitespace(cursor);
        if let Some(rest) = cursor.strip_prefix(b">>") {
            return Some((dict, rest));
        }
        let (key, rest) = next_token(cursor.strip_prefix(b"/")?)?;
        let rest = skip_ascii_whitespace(rest);

        let value_end = if rest.starts_with(b"<<") {
            rest.len() - skip_balanced(rest, b"<<", b">>")?.len()
        } else if rest.starts_with(b"[") {
            rest.len() - skip_balanced(rest, b"[", b"]")?.len()
        } else if rest.starts_with(b"(") {
            rest.len() - skip_literal_string(rest)?.len()
        } else if let Some(name) = rest.strip_prefix(b"/") {
            let (_, after) = next_token(name)?;
            rest.len() - after.len()
        } else {
            let (_, after) = next_token(rest)?;
            // An indirect reference spans three tokens.
            match (next_token(after), next_token(after).and_then(|(_, a)| next_token(a))) {
                (Some((gen, _)), Some(("R", after_r)))
                    if gen.bytes().all(|b| b.is_ascii_digit()) =>
                {
                    rest.len() - after_r.len()
                }
                _ => rest.len() - after.len(),
            }
        };

        let value = std::str::from_utf8(&rest[..value_end]).ok()?.trim();
        dict.insert(key.to_string(), value.to_string());
        cursor = &rest[value_end..];
    }
}

/// The object number of an `N G R` reference.
fn reference(value: &str) -> Option<u32> {
    let mut parts = value.split_whitespace();
    let num = parts.next()?.parse().ok()?;
    parts.next()?;
    (parts.next()? == "R").then_some(num)
}

/// Object numbers of all `N G R` references in an array.
fn references(array: &str) -> Vec<u32> {
    let tokens: Vec<&str> = array
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split_whitespace()
        .collect();
    tokens
        .windows(3)
        .filter(|w| w[2] == "R")
        .filter_map(|w| w[0].parse().ok())
        .collect()
}

/// All numbers in an array such as `[0 0 612.0 792.0]`.
fn numbers(array: &str) -> Vec<f64> {
    array
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split_whitespace()
        .filter_map(|t| t.parse().ok())
        .collect()
}

// ── Content streams ────────────────────────────────────────────────────────────

/// Collect `Tj` strings into lines keyed by their baseline. Only
/// `BT`, `Td` and `Tj` affect the result.
fn extract_text(ops: &[u8]) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line_y: Option<f64> = None;
    let mut y = 0.0;
    let mut nums: Vec<f64> = Vec::new();
    let mut string: Option<String> = None;
    let mut new_object = false;
    let mut cursor = ops;

    loop {
        cursor = skip_ascii_whitespace(cursor);
        if cursor.is_empty() {
            break;
        }
        if cursor.starts_with(b"(") {
            let rest = match skip_literal_string(cursor) {
                Some(rest) => rest,
                None => break,
            };
            let raw = &cursor[1..cursor.len() - rest.len() - 1];
            string = Some(unescape(raw));
            cursor = rest;
            continue;
        }
        let (token, rest) = match next_token(cursor) {
            Some(t) => t,
            None => break,
        };
        cursor = rest;
        if let Ok(n) = token.parse::<f64>() {
            nums.push(n);
            continue;
        }
        match token {
            "BT" => {
                y = 0.0;
                new_object = true;
            }
            "Td" => {
                if let Some(ty) = nums.last() {
                    y += ty;
                }
            }
            "Tj" => {
                if let Some(text) = string.take() {
                    let same_line = line_y.map_or(false, |ly| (ly - y).abs() < 1e-6);
                    match lines.last_mut() {
                        Some(line) if same_line => {
                            if new_object && !line.ends_with(' ') && !text.starts_with(' ') {
                                line.push(' ');
                            }
                            line.push_str(&text);
                        }
                        _ => {
                            lines.push(text.trim_start().to_string());
                            line_y = Some(y);
                        }
                    }
                    new_object = false;
                }
            }
            _ => {}
        }
        nums.clear();
    }
    lines
}

/// Decode a literal string body. Bytes map to chars one-to-one.
fn unescape(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] != b'\\' || i + 1 == raw.len() {
            out.push(raw[i] as char);
            i += 1;
            continue;
        }
        let next = raw[i + 1];
        match next {
            b'0'..=b'7' => {
                let digits = raw[i + 1..]
                    .iter()
                    .take(3)
                    .take_while(|b| (b'0'..=b'7').contains(*b))
                    .count();
                let code = raw[i + 1..i + 1 + digits]
                    .iter()
                    .fold(0u32, |acc, b| acc * 8 + u32::from(b - b'0'));
                out.push(char::from_u32(code & 0xff).unwrap_or('?'));
                i += 1 + digits;
            }
            b'n' => {
                out.push('\n');
                i += 2;
            }
            b'r' => {
                out.push('\r');
                i += 2;
            }
            b't' => {
                out.push('\t');
                i += 2;
            }
            _ => {
                out.push(next as char);
                i += 2;
            }
        }
    }
    out
}

// ── Token / byte utilities ─────────────────────────────────────────────────────

/// Skip a balanced `open ... close` run, returning the bytes after it.
fn skip_balanced<'a>(data: &'a [u8], open: &[u8], close: &[u8]) -> Option<&'a [u8]> {
    let mut depth = 0usize;
    let mut i = 0;
    while i < data.len() {
        if data[i..].starts_with(open) {
            depth += 1;
            i += open.len();
        } else if data[i..].starts_with(close) {
            depth -= 1;
            i += close.len();
            if depth == 0 {
                return Some(&data[i..]);
            }
        } else if data[i] == b'(' {
            let rest = skip_literal_string(&data[i..])?;
            i = data.len() - rest.len();
        } else {
            i += 1;
        }
    }
    None
}

/// Skip over a `(...)` literal string (handles escapes and nested
/// parens), returning the bytes after `)`.
fn skip_literal_string(data: &[u8]) -> Option<&[u8]> {
    let mut i = 1;
    let mut depth = 1i32;
    while i < data.len() {
        match data[i] {
            b'\\' => i += 2,
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return Some(&data[i..]);
                }
            }
            _ => i += 1,
        }
    }
    None
}

/// Skip the `N G obj` header of an indirect object.
fn skip_obj_header(data: &[u8]) -> Option<&[u8]> {
    let (_, rest) = next_token(data)?;
    let (_, rest) = next_token(rest)?;
    let (keyword, rest) = next_token(rest)?;
    (keyword == "obj").then_some(rest)
}

fn skip_ascii_whitespace(data: &[u8]) -> &[u8] {
    let pos = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[pos..]
}

/// Skip past the next `\n`.
fn skip_line(data: &[u8]) -> &[u8] {
    match data.iter().position(|&b| b == b'\n') {
        Some(pos) => &data[pos + 1..],
        None => &data[data.len()..],
    }
}

/// Next whitespace- or delimiter-terminated token.
fn next_token(data: &[u8]) -> Option<(&str, &[u8])> {
    let data = skip_ascii_whitespace(data);
    if data.is_empty() {
        return None;
    }
    let end = data
        .iter()
        .position(|&b| b.is_ascii_whitespace() || b"<>[]()/".contains(&b))
        .unwrap_or(data.len())
        .max(1);
    let token = std::str::from_utf8(&data[..end]).ok()?;
    Some((token, &data[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dict_keeps_references_and_arrays() {
        let (dict, rest) =
            parse_dict(b"<< /Type /Pages /Kids [5 0 R 7 0 R] /Count 2 >> tail").unwrap();
        assert_eq!(dict["Type"], "/Pages");
        assert_eq!(references(&dict["Kids"]), vec![5, 7]);
        assert_eq!(dict["Count"], "2");
        assert_eq!(rest, b" tail");
    }

    #[test]
    fn dict_with_nested_dict_and_reference() {
        let (dict, _) = parse_dict(
            b"<< /Contents 5 0 R /Resources << /Font << /F1 3 0 R >> >> /Parent 2 0 R >>",
        )
        .unwrap();
        assert_eq!(reference(&dict["Contents"]), Some(5));
        assert_eq!(reference(&dict["Parent"]), Some(2));
        assert!(dict["Resources"].starts_with("<<"));
    }

    #[test]
    fn dict_with_string_containing_delimiters() {
        let (dict, _) = parse_dict(b"<< /Producer (a >> b \\) c) /Size 3 >>").unwrap();
        assert_eq!(dict["Producer"], "(a >> b \\) c)");
        assert_eq!(dict["Size"], "3");
    }

    #[test]
    fn unescape_octal_and_specials() {
        assert_eq!(unescape(b"\\267"), "\u{b7}");
        assert_eq!(unescape(b"a\\(b\\)\\\\"), "a(b)\\");
        assert_eq!(unescape(b"x\\ny"), "x\ny");
    }

    #[test]
    fn text_objects_on_one_baseline_join() {
        let ops = b"BT\n/F1 8 Tf\n46 700 Td\n(\\267) Tj\nET\n\
                    BT\n49 700 Td\n(npm) Tj\n( run) Tj\n7 -10 Td\n(dev) Tj\nET\n";
        assert_eq!(extract_text(ops), vec!["\u{b7} npm run", "dev"]);
    }

    #[test]
    fn not_a_pdf() {
        assert!(matches!(
            PdfInspector::from_bytes(b"hello world".to_vec()),
            Err(InspectError::NotAPdf)
        ));
    }
}
