//! Batch assembly: many PDFs in, one record table out.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::invoice::{normalize_record, parse_invoice_text};
use crate::models::record::InvoiceRecord;
use crate::pdf::PdfExtractor;

/// A named PDF byte stream handed to the pipeline.
#[derive(Debug, Clone)]
pub struct PdfSource {
    pub name: String,
    pub data: Vec<u8>,
}

impl PdfSource {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// One skipped file: its name and a description of what went wrong.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    pub name: String,
    pub error: String,
}

/// Result of assembling a batch: successfully parsed records in input
/// order, plus the per-file failure list.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<InvoiceRecord>,
    pub failures: Vec<BatchFailure>,
}

/// Extract, parse, and normalize a single PDF.
pub fn process_source(data: &[u8]) -> Result<InvoiceRecord> {
    let text = PdfExtractor::extract_from_bytes(data)?;
    let fields = parse_invoice_text(&text);
    let record = normalize_record(&fields)?;
    Ok(record)
}

/// Run the per-file pipeline over an ordered sequence of sources.
///
/// A failure at any stage skips that file and records a warning keyed by
/// its name; one bad PDF never aborts the batch. Record order matches
/// input order.
pub fn process_batch<I>(sources: I) -> BatchOutcome
where
    I: IntoIterator<Item = PdfSource>,
{
    assemble(sources, |data| Ok(PdfExtractor::extract_from_bytes(data)?))
}

/// Batch assembly over an arbitrary text-extraction step.
fn assemble<I, F>(sources: I, extract: F) -> BatchOutcome
where
    I: IntoIterator<Item = PdfSource>,
    F: Fn(&[u8]) -> Result<String>,
{
    let mut outcome = BatchOutcome::default();

    for source in sources {
        let result = extract(&source.data).and_then(|text| {
            let fields = parse_invoice_text(&text);
            Ok(normalize_record(&fields)?)
        });

        match result {
            Ok(record) => {
                debug!("processed {}", source.name);
                outcome.records.push(record);
            }
            Err(e) => {
                warn!("skipping {}: {}", source.name, e);
                outcome.failures.push(BatchFailure {
                    name: source.name,
                    error: e.to_string(),
                });
            }
        }
    }

    debug!(
        "batch assembled: {} records, {} failures",
        outcome.records.len(),
        outcome.failures.len()
    );

    outcome
}

/// Read PDFs from disk and assemble them; unreadable files land on the
/// failure list like any other per-file error.
pub fn process_paths<P: AsRef<Path>>(paths: &[P]) -> BatchOutcome {
    let mut read_failures = Vec::new();
    let mut readable = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match fs::read(path) {
            Ok(data) => readable.push(PdfSource::new(name, data)),
            Err(e) => {
                warn!("skipping {}: {}", path.display(), e);
                read_failures.push(BatchFailure {
                    name,
                    error: e.to_string(),
                });
            }
        }
    }

    let mut outcome = process_batch(readable);
    outcome.failures.splice(0..0, read_failures);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::RawFieldSet;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_corrupt_pdf_is_skipped_not_fatal() {
        let sources = vec![
            PdfSource::new("bad.pdf", b"definitely not a pdf".to_vec()),
        ];
        let outcome = process_batch(sources);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].name, "bad.pdf");
    }

    #[test]
    fn test_partial_failure_names_the_bad_file() {
        let sources = vec![
            PdfSource::new("a.pdf", b"junk".to_vec()),
            PdfSource::new("b.pdf", b"junk".to_vec()),
            PdfSource::new("c.pdf", b"junk".to_vec()),
        ];
        let outcome = process_batch(sources);
        let names: Vec<&str> = outcome.failures.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn test_interleaved_failure_preserves_order() {
        use crate::error::PdfError;

        let invoice = |id: &str| format!("Číslo faktury: {}\n", id).into_bytes();
        let sources = vec![
            PdfSource::new("a.pdf", invoice("2024001")),
            PdfSource::new("b.pdf", b"unreadable".to_vec()),
            PdfSource::new("c.pdf", invoice("2024003")),
        ];

        let outcome = assemble(sources, |data| {
            if data == b"unreadable" {
                Err(PdfError::Parse("damaged xref".to_string()).into())
            } else {
                Ok(String::from_utf8_lossy(data).into_owned())
            }
        });

        let ids: Vec<&str> = outcome.records.iter().map(|r| r.invoice_id.as_str()).collect();
        assert_eq!(ids, vec!["2024001", "2024003"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].name, "b.pdf");
    }

    #[test]
    fn test_empty_batch() {
        let outcome = process_batch(Vec::new());
        assert!(outcome.records.is_empty());
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_normalize_stage_reachable_from_parser_output() {
        // text-level pipeline without a real PDF: parser + normalizer
        let fields = RawFieldSet::default();
        assert!(normalize_record(&fields).is_ok());
    }
}
