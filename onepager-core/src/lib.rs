pub mod content;
pub mod document;
pub mod error;
pub mod fonts;
pub mod graphics;
pub mod inspect;
pub mod layout;
pub mod markup;
pub mod objects;
pub mod render;
pub mod style;
pub mod textflow;
pub mod writer;

pub use content::{ContentSequence, Entry, Section, SummaryContent, TextBlock};
pub use document::PdfDocument;
pub use error::{Error, Result};
pub use fonts::BuiltinFont;
pub use graphics::Color;
pub use inspect::{InspectError, PdfInspector};
pub use layout::{FittedLayout, Flow, Rect};
pub use render::{PageGeometry, PageRenderer, RenderReport};
pub use style::{StyleSheet, StyleSpec};
