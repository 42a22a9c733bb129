//! Template document model and substitution engine
//!
//! A `.docx` template is a ZIP package ([`DocxPackage`]) whose
//! `word/document.xml` part is parsed into a [`TemplateDocument`]: an
//! ordered sequence of blocks (paragraphs of formatting runs) and tables
//! (cells of blocks). Every part and every piece of XML the model does not
//! understand is preserved verbatim, so a populated document differs from
//! the template only in the runs whose text was rewritten.

pub mod document;
pub mod engine;
pub mod package;

pub use document::{Block, Run, Table, TemplateDocument};
pub use engine::{apply_record, find_placeholders};
pub use package::DocxPackage;

use atenea_core::AteneaError;
use thiserror::Error;

/// Error type for template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container error
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A required package part is absent
    #[error("Package is missing required part '{0}'")]
    MissingPart(String),

    /// Structurally invalid document
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// Document ended before an open element was closed
    #[error("Unexpected end of document")]
    UnexpectedEof,

    /// The document part is not valid UTF-8
    #[error("Document part is not valid UTF-8")]
    Encoding,
}

/// Result type for template operations
pub type TemplateResult<T> = std::result::Result<T, TemplateError>;

impl From<TemplateError> for AteneaError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::Io(io_err) => AteneaError::IoError(io_err),
            other => AteneaError::template(other.to_string()),
        }
    }
}
