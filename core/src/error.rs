//! Error types for ATENEA operations

use thiserror::Error;

/// Main error type for ATENEA operations
#[derive(Error, Debug)]
pub enum AteneaError {
    /// Dataset or template parsing errors
    #[error("Failed to parse input: {message}")]
    ParseError {
        /// Error message
        message: String,
        /// Location in the input if available
        location: Option<String>,
    },

    /// Data validation errors
    #[error("Data validation failed: {message}")]
    DataValidationError {
        /// Error message
        message: String,
        /// Path to invalid data
        path: Option<String>,
    },

    /// Template document errors
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic errors with context
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AteneaError {
    /// Create a parse error without location information
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: None,
        }
    }

    /// Create a parse error with a location
    pub fn parse_at(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            location: Some(location.into()),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidationError {
            message: message.into(),
            path: None,
        }
    }

    /// Create a template error
    pub fn template(message: impl Into<String>) -> Self {
        Self::TemplateError(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }
}

/// Result type for ATENEA operations
pub type Result<T> = std::result::Result<T, AteneaError>;
