//! Core generator traits and types

use atenea_core::{AteneaError, BatchReport};
use thiserror::Error;

use crate::template::{DocxPackage, TemplateResult};

/// Result type for generator operations
pub type GeneratorResult<T> = std::result::Result<T, GeneratorError>;

/// Fatal errors for a whole batch run.
///
/// Per-row failures are not errors at this level; they are collected in the
/// [`BatchReport`].
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The dataset holds no records; nothing to generate
    #[error("dataset contains no records")]
    EmptyDataset,

    /// Output archive error
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<GeneratorError> for AteneaError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::Io(io_err) => AteneaError::IoError(io_err),
            GeneratorError::Configuration(msg) => AteneaError::config(msg),
            other => AteneaError::data_validation(other.to_string()),
        }
    }
}

/// A re-readable source of template packages.
///
/// The orchestrator opens the source once per record so that every row works
/// on a fresh, independent copy of the template.
pub trait TemplateSource: Send + Sync {
    /// Open a fresh copy of the template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template bytes cannot be read or parsed.
    fn open(&self) -> TemplateResult<DocxPackage>;
}

/// Template source backed by an in-memory byte buffer.
#[derive(Debug, Clone)]
pub struct BytesTemplateSource {
    bytes: Vec<u8>,
}

impl BytesTemplateSource {
    /// Wrap raw `.docx` bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl TemplateSource for BytesTemplateSource {
    fn open(&self) -> TemplateResult<DocxPackage> {
        DocxPackage::from_bytes(&self.bytes)
    }
}

/// Progress emitted after each record, success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Records processed so far (1-based after the first record)
    pub processed: usize,
    /// Total records in the batch
    pub total: usize,
    /// Human-readable status line
    pub status: String,
}

impl ProgressUpdate {
    /// Completed fraction in `(0, 1]`; the batch is never empty
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        self.processed as f64 / self.total as f64
    }
}

/// Fire-and-forget observer for batch progress.
///
/// Observers must not block or alter control flow; the orchestrator ignores
/// anything they do.
pub trait ProgressObserver {
    /// Called once per processed record
    fn on_progress(&mut self, update: ProgressUpdate);
}

impl<F: FnMut(ProgressUpdate)> ProgressObserver for F {
    fn on_progress(&mut self, update: ProgressUpdate) {
        self(update);
    }
}

/// Observer that discards all updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&mut self, _update: ProgressUpdate) {}
}

/// Everything a finished batch hands back to the caller.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// The finalized ZIP archive, one entry per generated document
    pub archive: Vec<u8>,
    /// Success count, total count and per-row failures
    pub report: BatchReport,
}
