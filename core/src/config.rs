//! Configuration for batch generation

use serde::{Deserialize, Serialize};

use crate::error::{AteneaError, Result};

/// Configuration for one batch generation run.
///
/// The defaults reproduce the canonical archive layout: entries named
/// `Documento_<n>.docx` where `<n>` is the 1-based record index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Prefix for archive entry names
    pub entry_prefix: String,

    /// Extension for archive entry names (without the dot)
    pub entry_extension: String,

    /// Worksheet to read records from (None = first sheet)
    pub sheet: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            entry_prefix: "Documento".to_string(),
            entry_extension: "docx".to_string(),
            sheet: None,
        }
    }
}

impl GenerationConfig {
    /// Deterministic archive entry name for a 1-based row index
    #[must_use]
    pub fn entry_name(&self, row: usize) -> String {
        format!("{}_{}.{}", self.entry_prefix, row, self.entry_extension)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the entry prefix or extension is empty.
    pub fn validate(&self) -> Result<()> {
        if self.entry_prefix.is_empty() {
            return Err(AteneaError::config("entry_prefix must not be empty"));
        }
        if self.entry_extension.is_empty() {
            return Err(AteneaError::config("entry_extension must not be empty"));
        }
        Ok(())
    }
}
