//! CSV dataset loader
//!
//! Loads CSV/TSV files into records. Field values are inferred per cell:
//! integers and floats parse to their numeric types, empty fields become
//! `Null`, everything else stays text.

use atenea_core::{Record, ScalarValue};
use csv::ReaderBuilder;

use super::traits::{DataLoader, LoadOptions, LoaderError, LoaderResult};

/// Options specific to CSV loading
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,

    /// Whether the first row contains headers
    pub has_headers: bool,

    /// Whether to trim whitespace from fields
    pub trim: bool,

    /// Whether to allow rows with variable field counts
    pub flexible: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            trim: true,
            flexible: false,
        }
    }
}

impl CsvOptions {
    /// Create options for TSV format
    #[must_use]
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }
}

/// CSV dataset loader
#[derive(Debug, Default)]
pub struct CsvLoader {
    options: CsvOptions,
}

impl CsvLoader {
    /// Create a new CSV loader with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new CSV loader with custom options
    #[must_use]
    pub fn with_options(options: CsvOptions) -> Self {
        Self { options }
    }

    /// Infer a scalar value from a raw CSV field
    fn infer_value(field: &str) -> ScalarValue {
        if field.is_empty() {
            return ScalarValue::Null;
        }
        if let Ok(i) = field.parse::<i64>() {
            return ScalarValue::Integer(i);
        }
        if let Ok(f) = field.parse::<f64>() {
            return ScalarValue::Float(f);
        }
        ScalarValue::Text(field.to_string())
    }
}

impl DataLoader for CsvLoader {
    fn name(&self) -> &str {
        "csv"
    }

    fn description(&self) -> &str {
        "Loads records from CSV/TSV files"
    }

    fn supported_extensions(&self) -> Vec<&str> {
        vec!["csv", "tsv"]
    }

    fn load_bytes(&self, data: &[u8], options: &LoadOptions) -> LoaderResult<Vec<Record>> {
        let trim = if self.options.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        };
        let mut reader = ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(self.options.has_headers)
            .flexible(self.options.flexible)
            .trim(trim)
            .from_reader(data);

        let headers: Vec<String> = if self.options.has_headers {
            reader
                .headers()
                .map_err(|e| LoaderError::Parse(format!("cannot read CSV headers: {e}")))?
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    if h.is_empty() {
                        format!("col_{i}")
                    } else {
                        h.to_string()
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let row = result.map_err(|e| LoaderError::Parse(format!("row {idx}: {e}")))?;

            let mut record = Record::new();
            for (i, field) in row.iter().enumerate() {
                let name = headers
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("col_{i}"));
                record.insert(name, Self::infer_value(field));
            }
            records.push(record);

            if let Some(limit) = options.limit {
                if records.len() >= limit {
                    break;
                }
            }
        }

        tracing::debug!(records = records.len(), "loaded records from CSV");
        Ok(records)
    }
}
