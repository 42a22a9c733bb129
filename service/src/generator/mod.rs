//! Batch orchestration and archive assembly
//!
//! The orchestrator walks the records in order, re-opens the template for
//! every record (no shared mutable template state between rows), runs the
//! substitution engine, and streams each populated document into a single
//! ZIP archive. Per-row failures are collected and never abort the batch.

pub mod batch;
pub mod traits;

pub use batch::BatchGenerator;
pub use traits::{
    BatchOutput, BytesTemplateSource, GeneratorError, GeneratorResult, NullObserver,
    ProgressObserver, ProgressUpdate, TemplateSource,
};
