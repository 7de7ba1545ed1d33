//! End-to-end pipeline: PDF bytes in, classified invoice table out.

use std::path::Path;

use tracing::info;

use crate::batch::{self, BatchFailure, PdfSource};
use crate::classify::{AnomalyClassifier, ClassifiedRow};
use crate::error::Result;
use crate::features::{engineer_features, ArtifactStore, EncoderSet, Scaler};
use crate::models::record::InvoiceRecord;

/// The three pretrained artifacts loaded and ready for a batch.
pub struct Artifacts {
    pub scaler: Scaler,
    pub encoders: EncoderSet,
    pub classifier: AnomalyClassifier,
}

impl Artifacts {
    /// Load all artifacts from a store. Any missing or malformed
    /// artifact fails the load as a whole.
    pub fn load(store: &dyn ArtifactStore) -> Result<Self> {
        Ok(Self {
            scaler: store.load_scaler()?,
            encoders: store.load_encoders()?,
            classifier: AnomalyClassifier::new(store.load_classifier()?),
        })
    }
}

/// Final pipeline result: classified rows plus the files skipped during
/// batch assembly.
#[derive(Debug)]
pub struct PipelineOutput {
    pub rows: Vec<ClassifiedRow>,
    pub failures: Vec<BatchFailure>,
}

/// Engineer features for already-normalized records and classify them.
pub fn classify_records(
    records: &[InvoiceRecord],
    artifacts: &Artifacts,
) -> Result<Vec<ClassifiedRow>> {
    let table = engineer_features(records, &artifacts.encoders, &artifacts.scaler)?;
    artifacts.classifier.classify(&table)
}

/// Run the whole pipeline over in-memory PDF sources.
///
/// Per-file extraction failures are collected, not fatal; feature or
/// classification failures abort, since they invalidate the whole batch.
pub fn run_pipeline<I>(sources: I, artifacts: &Artifacts) -> Result<PipelineOutput>
where
    I: IntoIterator<Item = PdfSource>,
{
    let outcome = batch::process_batch(sources);
    info!(
        "batch assembled: {} records, {} skipped",
        outcome.records.len(),
        outcome.failures.len()
    );

    let rows = classify_records(&outcome.records, artifacts)?;
    Ok(PipelineOutput {
        rows,
        failures: outcome.failures,
    })
}

/// Run the whole pipeline over PDF files on disk.
pub fn run_pipeline_from_paths<P: AsRef<Path>>(
    paths: &[P],
    artifacts: &Artifacts,
) -> Result<PipelineOutput> {
    let outcome = batch::process_paths(paths);
    info!(
        "batch assembled: {} records, {} skipped",
        outcome.records.len(),
        outcome.failures.len()
    );

    let rows = classify_records(&outcome.records, artifacts)?;
    Ok(PipelineOutput {
        rows,
        failures: outcome.failures,
    })
}
