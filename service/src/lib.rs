//! # ATENEA Service
//!
//! Batch mail-merge document generation: given a tabular dataset and a
//! `.docx` template containing `{{column}}` placeholders, produce one
//! populated document per row, packaged into a single ZIP archive.
//!
//! ## Overview
//!
//! Three layers:
//!
//! - [`loader`]: reads a spreadsheet (`.xlsx` via calamine, `.csv`/`.tsv`
//!   via the csv crate) into an ordered sequence of [`atenea_core::Record`]s.
//! - [`template`]: an in-memory model of the template's WordprocessingML
//!   body (blocks of formatting runs, one level of tables) plus the
//!   substitution engine. Everything the model does not understand is
//!   preserved byte-for-byte.
//! - [`generator`]: the batch orchestrator, one fresh template parse per
//!   record, per-row failure isolation, deterministic `Documento_<n>.docx`
//!   archive entries and a progress callback after every row.
//!
//! ## Quick start
//!
//! ```no_run
//! use atenea_service::generator::{BatchGenerator, BytesTemplateSource, NullObserver};
//! use atenea_service::loader::{DataLoader, ExcelLoader, LoadOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = ExcelLoader::new();
//!     let records = loader.load_file("datos.xlsx".as_ref(), &LoadOptions::default())?;
//!
//!     let template = BytesTemplateSource::new(std::fs::read("plantilla.docx")?);
//!     let output = BatchGenerator::new().generate(&records, &template, &mut NullObserver)?;
//!
//!     std::fs::write("documentos.zip", &output.archive)?;
//!     println!(
//!         "generados: {} / errores: {} / total: {}",
//!         output.report.generated,
//!         output.report.errored(),
//!         output.report.total
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Known limitation
//!
//! A placeholder whose braces are split across two formatting runs is left
//! unresolved by design; see [`template::engine`].

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Command-line interface
pub mod cli;

/// Batch orchestration and archive assembly
pub mod generator;

/// Tabular dataset loaders
pub mod loader;

/// Template document model and substitution engine
pub mod template;

pub use generator::{BatchGenerator, BatchOutput, BytesTemplateSource, TemplateSource};
pub use loader::{CsvLoader, DataLoader, ExcelLoader, LoadOptions};
pub use template::{DocxPackage, TemplateDocument};
