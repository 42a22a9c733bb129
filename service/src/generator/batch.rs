//! The batch orchestrator

use std::io::{Cursor, Write};

use atenea_core::{BatchReport, GenerationConfig, Record, RowFailure};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::traits::{
    BatchOutput, GeneratorError, GeneratorResult, ProgressObserver, ProgressUpdate, TemplateSource,
};
use crate::template::{self, TemplateResult};

/// Generates one populated document per record and packages them into a
/// single ZIP archive.
#[derive(Debug, Clone, Default)]
pub struct BatchGenerator {
    config: GenerationConfig,
}

impl BatchGenerator {
    /// Create a generator with the default configuration
    /// (`Documento_<n>.docx` entries)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator with a custom configuration
    #[must_use]
    pub fn with_config(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// Run the batch: one document per record, in record order.
    ///
    /// Each record gets a fresh template copy from `source`; any failure
    /// while opening, substituting, serializing or archiving one row is
    /// recorded in the report and the batch continues. After every record,
    /// success or failure, `observer` receives a progress update.
    ///
    /// # Errors
    ///
    /// Fatal errors only: an empty record set, an invalid configuration, or
    /// a failure to finalize the archive. Per-row failures never escalate;
    /// the archive and report are returned even when nothing was generated.
    pub fn generate(
        &self,
        records: &[Record],
        source: &dyn TemplateSource,
        observer: &mut dyn ProgressObserver,
    ) -> GeneratorResult<BatchOutput> {
        if records.is_empty() {
            return Err(GeneratorError::EmptyDataset);
        }
        self.config
            .validate()
            .map_err(|e| GeneratorError::Configuration(e.to_string()))?;

        let total = records.len();
        let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
        let entry_options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        let mut generated = 0usize;
        let mut failures = Vec::new();

        tracing::info!(total, "starting batch generation");

        for (index, record) in records.iter().enumerate() {
            let row = index + 1;

            // Steps 1-4 of the per-record cycle; any error here is isolated
            // to this row.
            let outcome = match generate_one(source, record) {
                Ok(bytes) => write_entry(
                    &mut archive,
                    &self.config.entry_name(row),
                    &bytes,
                    entry_options,
                )
                .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match outcome {
                Ok(()) => {
                    generated += 1;
                    tracing::debug!(row, "document generated");
                }
                Err(message) => {
                    tracing::warn!(row, error = %message, "row failed, continuing batch");
                    failures.push(RowFailure { row, message });
                }
            }

            observer.on_progress(ProgressUpdate {
                processed: row,
                total,
                status: format!("Procesando documento {row} de {total}"),
            });
        }

        let archive = archive.finish()?.into_inner();

        tracing::info!(generated, errored = failures.len(), total, "batch finished");

        Ok(BatchOutput {
            archive,
            report: BatchReport {
                generated,
                total,
                failures,
            },
        })
    }
}

/// One record's copy-substitute-serialize cycle.
fn generate_one(source: &dyn TemplateSource, record: &Record) -> TemplateResult<Vec<u8>> {
    let mut package = source.open()?;
    template::apply_record(package.document_mut(), record);
    package.save_to_bytes()
}

fn write_entry(
    archive: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    bytes: &[u8],
    options: SimpleFileOptions,
) -> GeneratorResult<()> {
    archive.start_file(name, options)?;
    archive.write_all(bytes)?;
    Ok(())
}
