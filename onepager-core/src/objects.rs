/// Indirect object identifier: (object_number, generation_number).
/// A freshly written document only ever uses generation 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjId(pub u32, pub u16);

/// The subset of PDF object types (PDF 32000-1:2008 Section 7.3)
/// a one-page text document needs.
#[derive(Debug, Clone)]
pub enum PdfObject {
    Integer(i64),
    Real(f64),
    /// PDF name object (stored without the leading `/`).
    Name(String),
    /// PDF literal string (stored without the enclosing parens).
    LiteralString(String),
    Array(Vec<PdfObject>),
    /// Key-value pairs. Uses Vec for deterministic output order.
    Dictionary(Vec<(String, PdfObject)>),
    Stream {
        dict: Vec<(String, PdfObject)>,
        data: Vec<u8>,
    },
    Reference(ObjId),
}

impl PdfObject {
    pub fn name(s: &str) -> Self {
        PdfObject::Name(s.to_string())
    }

    pub fn literal_string(s: &str) -> Self {
        PdfObject::LiteralString(s.to_string())
    }

    pub fn array(items: Vec<PdfObject>) -> Self {
        PdfObject::Array(items)
    }

    pub fn dict(entries: Vec<(&str, PdfObject)>) -> Self {
        PdfObject::Dictionary(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    pub fn stream(
        dict_entries: Vec<(&str, PdfObject)>,
        data: Vec<u8>,
    ) -> Self {
        PdfObject::Stream {
            dict: dict_entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            data,
        }
    }

    /// Base-14 Type1 font dictionary; no embedding needed.
    pub fn type1_font(base_font: &str) -> Self {
        PdfObject::dict(vec![
            ("Type", PdfObject::name("Font")),
            ("Subtype", PdfObject::name("Type1")),
            ("BaseFont", PdfObject::name(base_font)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type1_font_names_base_font() {
        let obj = PdfObject::type1_font("Helvetica-Bold");
        match obj {
            PdfObject::Dictionary(entries) => {
                assert_eq!(entries.len(), 3);
                assert_eq!(entries[1].0, "Subtype");
                match &entries[2].1 {
                    PdfObject::Name(n) => {
                        assert_eq!(n, "Helvetica-Bold")
                    }
                    _ => panic!("expected Name"),
                }
            }
            _ => panic!("expected Dictionary"),
        }
    }

    #[test]
    fn dict_keeps_insertion_order() {
        let obj = PdfObject::dict(vec![
            ("Type", PdfObject::name("Catalog")),
            ("Pages", PdfObject::Reference(ObjId(2, 0))),
        ]);
        match obj {
            PdfObject::Dictionary(entries) => {
                assert_eq!(entries[0].0, "Type");
                assert_eq!(entries[1].0, "Pages");
            }
            _ => panic!("expected Dictionary"),
        }
    }

    #[test]
    fn stream_constructor() {
        let data = b"BT /F1 8.7 Tf ET".to_vec();
        let obj = PdfObject::stream(
            vec![("Filter", PdfObject::name("FlateDecode"))],
            data.clone(),
        );
        match obj {
            PdfObject::Stream { dict, data: d } => {
                assert_eq!(dict.len(), 1);
                assert_eq!(d, data);
            }
            _ => panic!("expected Stream"),
        }
    }
}
