//! Tabular dataset loaders
//!
//! A loader turns spreadsheet bytes into an ordered sequence of
//! [`atenea_core::Record`]s: first row = header = field names, each
//! following row one record, column order preserved.

pub mod csv;
pub mod excel;
pub mod traits;

pub use self::csv::{CsvLoader, CsvOptions};
pub use self::excel::{ExcelLoader, ExcelOptions};
pub use self::traits::{DataLoader, LoadOptions, LoaderError, LoaderResult};
