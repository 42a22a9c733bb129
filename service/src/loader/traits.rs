//! Common traits and types for dataset loaders

use std::path::Path;

use atenea_core::{AteneaError, Record};
use thiserror::Error;

/// Error type for dataset loading operations
#[derive(Debug, Error)]
pub enum LoaderError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("Error: {0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type for loader operations
pub type LoaderResult<T> = std::result::Result<T, LoaderError>;

impl From<LoaderError> for AteneaError {
    fn from(err: LoaderError) -> Self {
        match err {
            LoaderError::Io(io_err) => AteneaError::IoError(io_err),
            LoaderError::Parse(msg) | LoaderError::InvalidFormat(msg) => AteneaError::parse(msg),
            LoaderError::Configuration(msg) => AteneaError::config(msg),
            LoaderError::Other(boxed_err) => AteneaError::Other {
                message: "Loader error".to_string(),
                source: Some(boxed_err),
            },
        }
    }
}

/// Options for loading records
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Maximum number of records to load
    pub limit: Option<usize>,
}

/// Trait for dataset loaders.
///
/// Loading is synchronous: the whole pipeline is a single-pass batch flow
/// with no concurrency.
pub trait DataLoader: Send + Sync {
    /// Name of the loader
    fn name(&self) -> &str;

    /// Description of the loader
    fn description(&self) -> &str;

    /// Supported file extensions
    fn supported_extensions(&self) -> Vec<&str>;

    /// Load records from bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a readable dataset.
    fn load_bytes(&self, data: &[u8], options: &LoadOptions) -> LoaderResult<Vec<Record>>;

    /// Load records from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    fn load_file(&self, path: &Path, options: &LoadOptions) -> LoaderResult<Vec<Record>> {
        let data = std::fs::read(path)?;
        self.load_bytes(&data, options)
    }
}
