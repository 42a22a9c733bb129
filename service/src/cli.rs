//! Command-line interface for batch document generation
//!
//! `atenea <datos.xlsx> <plantilla.docx> -o documentos.zip` loads the
//! dataset, generates one document per row with a live progress bar, writes
//! the ZIP archive and prints the generated/errored/total report.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use atenea_core::GenerationConfig;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use crate::generator::{BatchGenerator, BytesTemplateSource, ProgressUpdate};
use crate::loader::{CsvLoader, CsvOptions, DataLoader, ExcelLoader, ExcelOptions, LoadOptions};
use crate::template::{DocxPackage, find_placeholders};

/// Generate Word documents from a template and a tabular dataset
#[derive(Parser, Debug)]
#[command(name = "atenea", author, version, about, long_about = None)]
pub struct Cli {
    /// Dataset with one row per document (.xlsx, .xlsm, .csv or .tsv)
    data: PathBuf,

    /// Word template containing {{columna}} placeholders
    template: PathBuf,

    /// Output archive path
    #[arg(short, long, default_value = "documentos.zip")]
    output: PathBuf,

    /// Worksheet to read (first sheet when omitted)
    #[arg(long)]
    sheet: Option<String>,

    /// Write the batch report as JSON to this path
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Parse arguments and run the batch.
///
/// # Errors
///
/// Returns an error on unreadable inputs, fatal generation errors, or when
/// no document at all could be generated.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let loader = loader_for(&cli.data, cli.sheet.clone())?;
    let records = loader
        .load_bytes(
            &fs::read(&cli.data)
                .with_context(|| format!("cannot read dataset '{}'", cli.data.display()))?,
            &LoadOptions::default(),
        )
        .with_context(|| format!("cannot load dataset '{}'", cli.data.display()))?;

    let template_bytes = fs::read(&cli.template)
        .with_context(|| format!("cannot read template '{}'", cli.template.display()))?;

    warn_unknown_placeholders(&template_bytes, &records)?;

    let progress = ProgressBar::new(records.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("progress bar template should be valid"),
    );
    let mut observer = |update: ProgressUpdate| {
        progress.set_position(update.processed as u64);
        progress.set_message(update.status);
    };

    let config = GenerationConfig {
        sheet: cli.sheet.clone(),
        ..GenerationConfig::default()
    };
    let source = BytesTemplateSource::new(template_bytes);
    let output = BatchGenerator::with_config(config).generate(&records, &source, &mut observer)?;
    progress.finish_with_message("Proceso completado");

    fs::write(&cli.output, &output.archive)
        .with_context(|| format!("cannot write archive '{}'", cli.output.display()))?;

    let report = &output.report;
    println!();
    println!("{} {}", "Generados:".green().bold(), report.generated);
    println!("{} {}", "Errores:".yellow().bold(), report.errored());
    println!("{} {}", "Total:".bold(), report.total);
    for failure in &report.failures {
        println!("  {} {}", "⚠".yellow(), failure);
    }
    println!("{} {}", "Archivo:".bold(), cli.output.display());

    if let Some(path) = &cli.report_json {
        let json = serde_json::to_string_pretty(report).context("cannot serialize report")?;
        fs::write(path, json)
            .with_context(|| format!("cannot write report '{}'", path.display()))?;
    }

    if report.generated == 0 {
        bail!("no se pudo generar ningún documento");
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Pick a loader from the dataset's file extension.
fn loader_for(path: &Path, sheet: Option<String>) -> anyhow::Result<Box<dyn DataLoader>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" => Ok(Box::new(ExcelLoader::with_options(ExcelOptions {
            target_sheet: sheet,
            ..ExcelOptions::default()
        }))),
        "csv" => Ok(Box::new(CsvLoader::new())),
        "tsv" => Ok(Box::new(CsvLoader::with_options(CsvOptions::tsv()))),
        other => bail!("unsupported dataset format '.{other}'"),
    }
}

/// Warn about template placeholders with no matching dataset column; they
/// will pass through unchanged.
fn warn_unknown_placeholders(
    template_bytes: &[u8],
    records: &[atenea_core::Record],
) -> anyhow::Result<()> {
    let package =
        DocxPackage::from_bytes(template_bytes).context("cannot parse template document")?;
    let placeholders = find_placeholders(package.document());

    if let Some(first) = records.first() {
        for placeholder in &placeholders {
            if first.get(placeholder).is_none() {
                eprintln!(
                    "{} la plantilla usa {{{{{placeholder}}}}} pero el dataset no tiene esa columna",
                    "aviso:".yellow().bold()
                );
            }
        }
    }
    Ok(())
}
