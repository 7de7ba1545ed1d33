//! Core library for Czech invoice anomaly detection.
//!
//! This crate provides:
//! - PDF text extraction for generated invoice documents
//! - Czech invoice field extraction (číslo faktury, variabilní symbol,
//!   dates, amounts, supplier/customer blocks)
//! - Batch-scoped feature engineering against pretrained artifacts
//! - Anomaly classification via a pretrained ONNX model

pub mod batch;
pub mod classify;
pub mod error;
pub mod export;
pub mod features;
pub mod invoice;
pub mod models;
pub mod pdf;
pub mod pipeline;

pub use batch::{process_batch, process_paths, process_source, BatchFailure, BatchOutcome, PdfSource};
pub use classify::{partition_alerts, AnomalyClassifier, AnomalyType, ClassifiedRow};
pub use error::{FindocError, Result};
pub use export::{export_classified, export_records, write_classified_csv, write_records_csv};
pub use features::{
    engineer_features, ArtifactStore, DiskArtifactStore, EncoderSet, FeatureRow, FeatureTable,
    Scaler, FEATURE_COLUMNS,
};
pub use invoice::{normalize_record, parse_invoice_text, RawFieldSet};
pub use models::config::{ArtifactConfig, FindocConfig};
pub use models::record::{InvoiceRecord, TransactionType, SENTINEL_ORGANIZATION};
pub use pdf::{PdfExtractor, TextExtractor};
pub use pipeline::{classify_records, run_pipeline, run_pipeline_from_paths, Artifacts, PipelineOutput};

/// Re-export inference types.
pub use findoc_inference::{InferenceBackend, InputTensor, OutputTensor, TractBackend};
