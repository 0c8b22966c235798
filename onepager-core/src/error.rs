//! Error types for rendering the summary page.

use std::io;
use thiserror::Error;

/// Result type alias for onepager operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or rendering the page.
#[derive(Error, Debug)]
pub enum Error {
    /// Content referenced a style the style sheet does not define.
    #[error("missing style: {0}")]
    MissingStyle(String),

    /// Margins leave no room for content.
    #[error("degenerate content frame: {width}pt x {height}pt")]
    Geometry { width: f64, height: f64 },

    /// I/O error when writing the output file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
