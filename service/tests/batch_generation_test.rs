//! Batch orchestration tests: archive layout, per-row isolation, progress
//! reporting and deterministic output.

mod helpers;

use std::sync::atomic::{AtomicUsize, Ordering};

use atenea_core::GenerationConfig;
use atenea_service::generator::{
    BatchGenerator, BytesTemplateSource, GeneratorError, NullObserver, ProgressUpdate,
    TemplateSource,
};
use atenea_service::template::{DocxPackage, TemplateResult};
use helpers::{block_texts, entry_names, read_entry, record, simple_docx};
use pretty_assertions::assert_eq;

fn sample_records() -> Vec<atenea_core::Record> {
    vec![
        record(&[("nombre", "Ana"), ("cargo", "Ingeniera")]),
        record(&[("nombre", "Luis"), ("cargo", "Analista")]),
        record(&[("nombre", "Marta"), ("cargo", "Directora")]),
    ]
}

/// Template source that hands out corrupt bytes on one specific open call.
struct FlakySource {
    good: Vec<u8>,
    calls: AtomicUsize,
    fail_on_call: usize,
}

impl FlakySource {
    fn new(good: Vec<u8>, fail_on_call: usize) -> Self {
        Self {
            good,
            calls: AtomicUsize::new(0),
            fail_on_call,
        }
    }
}

impl TemplateSource for FlakySource {
    fn open(&self) -> TemplateResult<DocxPackage> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on_call {
            DocxPackage::from_bytes(b"these are not docx bytes")
        } else {
            DocxPackage::from_bytes(&self.good)
        }
    }
}

#[test]
fn batch_produces_one_entry_per_record() {
    let template = simple_docx(&["{{nombre}} - {{cargo}}"]);
    let source = BytesTemplateSource::new(template);

    let output = BatchGenerator::new()
        .generate(&sample_records(), &source, &mut NullObserver)
        .expect("batch succeeds");

    assert_eq!(
        entry_names(&output.archive),
        ["Documento_1.docx", "Documento_2.docx", "Documento_3.docx"]
    );
    assert_eq!(output.report.generated, 3);
    assert_eq!(output.report.total, 3);
    assert_eq!(output.report.errored(), 0);

    let second = read_entry(&output.archive, "Documento_2.docx");
    assert_eq!(block_texts(&second), ["Luis - Analista"]);
}

#[test]
fn entry_names_follow_the_configured_prefix() {
    let template = simple_docx(&["{{nombre}}"]);
    let source = BytesTemplateSource::new(template);
    let config = GenerationConfig {
        entry_prefix: "Certificado".to_string(),
        ..GenerationConfig::default()
    };

    let output = BatchGenerator::with_config(config)
        .generate(&sample_records()[..1], &source, &mut NullObserver)
        .expect("batch succeeds");

    assert_eq!(entry_names(&output.archive), ["Certificado_1.docx"]);
}

#[test]
fn one_bad_row_does_not_stop_the_batch() {
    let template = simple_docx(&["{{nombre}}"]);
    let source = FlakySource::new(template, 2);

    let output = BatchGenerator::new()
        .generate(&sample_records(), &source, &mut NullObserver)
        .expect("batch survives row failures");

    // Entry names track the row number, so row 2 is simply absent.
    assert_eq!(
        entry_names(&output.archive),
        ["Documento_1.docx", "Documento_3.docx"]
    );
    assert_eq!(output.report.generated, 2);
    assert_eq!(output.report.total, 3);
    assert_eq!(output.report.errored(), 1);
    assert_eq!(output.report.failures[0].row, 2);
}

#[test]
fn all_rows_failing_still_returns_archive_and_report() {
    let source = BytesTemplateSource::new(b"these are not docx bytes".to_vec());

    let output = BatchGenerator::new()
        .generate(&sample_records(), &source, &mut NullObserver)
        .expect("per-row failures never escalate");

    assert!(entry_names(&output.archive).is_empty());
    assert_eq!(output.report.generated, 0);
    assert_eq!(output.report.total, 3);
    assert_eq!(output.report.errored(), 3);
}

#[test]
fn empty_dataset_fails_before_any_progress() {
    let template = simple_docx(&["{{nombre}}"]);
    let source = BytesTemplateSource::new(template);

    let mut updates: Vec<ProgressUpdate> = Vec::new();
    let mut observer = |update: ProgressUpdate| updates.push(update);

    let err = BatchGenerator::new()
        .generate(&[], &source, &mut observer)
        .expect_err("empty dataset is fatal");

    assert!(matches!(err, GeneratorError::EmptyDataset));
    assert!(updates.is_empty());
}

#[test]
fn progress_fires_after_every_record_including_failures() {
    let template = simple_docx(&["{{nombre}}"]);
    let source = FlakySource::new(template, 2);

    let mut updates: Vec<ProgressUpdate> = Vec::new();
    let mut observer = |update: ProgressUpdate| updates.push(update);

    BatchGenerator::new()
        .generate(&sample_records(), &source, &mut observer)
        .expect("batch survives row failures");

    let processed: Vec<usize> = updates.iter().map(|u| u.processed).collect();
    assert_eq!(processed, [1, 2, 3]);
    assert!(updates.iter().all(|u| u.total == 3));
    assert_eq!(updates[1].status, "Procesando documento 2 de 3");
    let last = updates.last().expect("at least one update");
    assert!((last.fraction() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn generation_is_byte_deterministic() {
    let template = simple_docx(&["{{nombre}} - {{cargo}}"]);
    let source = BytesTemplateSource::new(template);
    let records = sample_records();
    let generator = BatchGenerator::new();

    let first = generator
        .generate(&records, &source, &mut NullObserver)
        .expect("first run");
    let second = generator
        .generate(&records, &source, &mut NullObserver)
        .expect("second run");

    assert_eq!(first.archive, second.archive);
}
