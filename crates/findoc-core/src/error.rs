//! Error types for the findoc-core library.

use thiserror::Error;

/// Main error type for the findoc library.
#[derive(Error, Debug)]
pub enum FindocError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Record normalization error.
    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Feature engineering error.
    #[error("feature error: {0}")]
    Feature(#[from] FeatureError),

    /// Pretrained artifact error.
    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Inference error from the inference layer.
    #[error("inference error: {0}")]
    Inference(#[from] findoc_inference::InferenceError),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
///
/// All of these are recovered per file by the batch assembler.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised while turning a parsed field set into an invoice record.
///
/// Missing optional fields never raise; only structurally malformed values
/// that cannot be defaulted do. Recovered per file by the batch assembler.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// A field value violated a structural assumption.
    #[error("malformed value for {field}: {value}")]
    MalformedField { field: String, value: String },
}

/// Errors from the feature engineering and classification stage.
#[derive(Error, Debug)]
pub enum FeatureError {
    /// An encoder received an out-of-vocabulary value despite the
    /// majority-value fallback. Indicates a data-contract violation, not
    /// a recoverable condition.
    #[error("encoder for '{column}' received out-of-vocabulary value '{value}'")]
    EncodingViolation { column: String, value: String },

    /// The classifier produced a class id outside the fixed label table.
    #[error("classifier produced unknown class id {0}")]
    UnknownClass(i64),

    /// No rows survived numeric coercion.
    #[error("no classifiable rows in the batch")]
    EmptyTable,
}

/// Errors loading or applying pretrained artifacts.
///
/// Fatal for the classification step as a whole; the extracted record
/// table remains usable.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Artifact file missing or unreadable.
    #[error("failed to load {artifact}: {reason}")]
    Load { artifact: String, reason: String },

    /// Artifact does not match the fixed feature-vector contract.
    #[error("{artifact} shape mismatch: expected {expected} columns, got {actual}")]
    ShapeMismatch {
        artifact: String,
        expected: usize,
        actual: usize,
    },
}

/// Result type for the findoc library.
pub type Result<T> = std::result::Result<T, FindocError>;
