//! # ATENEA Core
//!
//! Core types for the ATENEA batch document generator.
//!
//! This crate provides the fundamental building blocks shared by the
//! generation service: scalar values and records as read from a tabular
//! dataset, the batch report returned to callers, generation configuration,
//! and error handling.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Core error types for ATENEA operations
pub mod error;

/// Value, record and report types
pub mod types;

/// Configuration for batch generation
pub mod config;

pub use config::GenerationConfig;
pub use error::{AteneaError, Result};
pub use types::{BatchReport, Record, RowFailure, ScalarValue};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::GenerationConfig;
    pub use crate::error::{AteneaError, Result};
    pub use crate::types::*;
}
