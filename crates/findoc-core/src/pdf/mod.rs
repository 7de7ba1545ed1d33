//! PDF text extraction.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text extraction.
///
/// Failures propagate to the per-file caller so the batch assembler can
/// skip the document and continue.
pub trait TextExtractor {
    /// Load a PDF from raw bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Number of pages in the loaded document.
    fn page_count(&self) -> u32;

    /// Extract the full text of the document, pages concatenated.
    fn extract_text(&self) -> Result<String>;
}
