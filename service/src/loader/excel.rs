//! Excel dataset loader
//!
//! Reads `.xlsx`/`.xlsm` workbooks into records: the first row of the
//! target sheet is the header row, every following non-empty row becomes
//! one [`Record`] in sheet order.

use std::io::Cursor;

use atenea_core::{Record, ScalarValue};
use calamine::{Data, Range, Reader, Xlsx};

use super::traits::{DataLoader, LoadOptions, LoaderError, LoaderResult};

/// Options specific to Excel loading
#[derive(Debug, Clone)]
pub struct ExcelOptions {
    /// Target sheet name (None = first sheet)
    pub target_sheet: Option<String>,

    /// Whether the first row contains headers
    pub has_headers: bool,

    /// Maximum rows to load
    pub max_rows: Option<usize>,
}

impl Default for ExcelOptions {
    fn default() -> Self {
        Self {
            target_sheet: None,
            has_headers: true,
            max_rows: None,
        }
    }
}

/// Excel dataset loader
#[derive(Debug, Default)]
pub struct ExcelLoader {
    excel_options: ExcelOptions,
}

impl ExcelLoader {
    /// Create a new Excel loader with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new Excel loader with custom options
    #[must_use]
    pub fn with_options(excel_options: ExcelOptions) -> Self {
        Self { excel_options }
    }

    /// Process a worksheet range into records
    fn process_range(&self, range: &Range<Data>, options: &LoadOptions) -> LoaderResult<Vec<Record>> {
        let mut records = Vec::new();

        let rows: Vec<Vec<Data>> = range.rows().map(<[Data]>::to_vec).collect();
        if rows.is_empty() {
            return Ok(records);
        }

        let headers = Self::extract_headers(&rows, self.excel_options.has_headers);
        let data_start = usize::from(self.excel_options.has_headers);
        let max_rows = self.excel_options.max_rows.unwrap_or(usize::MAX);

        for (idx, row) in rows.iter().enumerate().skip(data_start) {
            if idx - data_start >= max_rows {
                break;
            }

            // Trailing blank rows in a worksheet are not records.
            if row.iter().all(|cell| matches!(cell, Data::Empty)) {
                continue;
            }

            records.push(Self::parse_row(row, &headers, idx)?);

            if let Some(limit) = options.limit {
                if records.len() >= limit {
                    break;
                }
            }
        }

        tracing::debug!(records = records.len(), "loaded records from worksheet");
        Ok(records)
    }

    /// Extract headers from the first row or generate them
    fn extract_headers(rows: &[Vec<Data>], has_headers: bool) -> Vec<String> {
        if has_headers {
            rows[0]
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let name = Self::cell_to_string(cell);
                    let name = name.trim();
                    if name.is_empty() {
                        format!("col_{i}")
                    } else {
                        name.to_string()
                    }
                })
                .collect()
        } else {
            (0..rows[0].len()).map(|i| format!("col_{i}")).collect()
        }
    }

    /// Parse a single row into a Record
    fn parse_row(row: &[Data], headers: &[String], row_idx: usize) -> LoaderResult<Record> {
        let mut record = Record::new();

        for (i, header) in headers.iter().enumerate() {
            let cell = row.get(i).unwrap_or(&Data::Empty);
            let value = Self::convert_cell(cell).map_err(|e| {
                LoaderError::Parse(format!("row {row_idx}, column '{header}': {e}"))
            })?;
            record.insert(header.clone(), value);
        }

        Ok(record)
    }

    /// Convert an Excel cell into a scalar value.
    ///
    /// Workbooks report most integers as floats; zero-fraction floats are
    /// loaded as integers so they render without a trailing `.0`.
    fn convert_cell(cell: &Data) -> LoaderResult<ScalarValue> {
        match cell {
            Data::Empty => Ok(ScalarValue::Null),
            Data::String(s) => Ok(ScalarValue::Text(s.clone())),
            Data::Int(i) => Ok(ScalarValue::Integer(*i)),
            Data::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 {
                    #[allow(clippy::cast_possible_truncation)]
                    Ok(ScalarValue::Integer(*f as i64))
                } else {
                    Ok(ScalarValue::Float(*f))
                }
            }
            Data::Bool(b) => Ok(ScalarValue::Bool(*b)),
            Data::DateTime(dt) => dt.as_datetime().map(ScalarValue::DateTime).ok_or_else(|| {
                LoaderError::Parse(format!("unrepresentable date value: {dt:?}"))
            }),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Ok(ScalarValue::Text(s.clone())),
            Data::Error(err) => Err(LoaderError::Parse(format!("Excel error cell: {err:?}"))),
        }
    }

    /// Convert cell to string representation, for headers
    fn cell_to_string(cell: &Data) -> String {
        match cell {
            Data::String(s) => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => f.to_string(),
            Data::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }
}

impl DataLoader for ExcelLoader {
    fn name(&self) -> &str {
        "excel"
    }

    fn description(&self) -> &str {
        "Loads records from Excel workbooks"
    }

    fn supported_extensions(&self) -> Vec<&str> {
        vec!["xlsx", "xlsm"]
    }

    fn load_bytes(&self, data: &[u8], options: &LoadOptions) -> LoaderResult<Vec<Record>> {
        tracing::debug!(bytes = data.len(), "loading Excel data");

        let cursor = Cursor::new(data);
        let mut workbook: Xlsx<_> = Xlsx::new(cursor)
            .map_err(|e| LoaderError::Parse(format!("Failed to parse Excel data: {e}")))?;

        let sheet_names = workbook.sheet_names();
        let target_sheet = match &self.excel_options.target_sheet {
            Some(name) => name.clone(),
            None => sheet_names.first().cloned().ok_or_else(|| {
                LoaderError::InvalidFormat("workbook contains no sheets".to_string())
            })?,
        };

        let range = workbook.worksheet_range(&target_sheet).map_err(|e| {
            LoaderError::Configuration(format!("cannot read sheet '{target_sheet}': {e}"))
        })?;

        self.process_range(&range, options)
    }
}
