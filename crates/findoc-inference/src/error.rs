//! Error types for classifier inference.

use thiserror::Error;

/// Errors from loading or running the exported anomaly classifier.
#[derive(Error, Debug)]
pub enum InferenceError {
    /// Failed to read or parse the ONNX model file.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Could not pin the classifier input to a concrete shape. Models
    /// exported with a dynamic batch axis must have the feature-vector
    /// shape fixed before planning.
    #[error("failed to pin input shape {shape:?}: {reason}")]
    ShapePin { shape: Vec<usize>, reason: String },

    /// Failed to type, optimize, or finalize the runnable plan.
    #[error("failed to build inference plan: {0}")]
    PlanBuild(String),

    /// Invalid input tensor shape or type.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Inference execution failed.
    #[error("inference failed: {0}")]
    InferenceFailed(String),

    /// Output tensor extraction failed.
    #[error("failed to extract output: {0}")]
    OutputExtraction(String),

    /// I/O error when loading model files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_pin_error_names_the_shape() {
        let err = InferenceError::ShapePin {
            shape: vec![1, 16],
            reason: "dimension mismatch".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("[1, 16]"));
        assert!(message.contains("dimension mismatch"));
    }
}
