//! ONNX inference abstraction layer for findoc.
//!
//! The anomaly classifier is trained elsewhere and exported to ONNX; this
//! crate loads that artifact and runs it on tabular feature vectors. The
//! `InferenceBackend` trait keeps the core decoupled from the concrete
//! runtime (currently `tract`, which is pure Rust).

mod backend;
mod error;
mod tensor;

pub use backend::InferenceBackend;
pub use backend::tract::TractBackend;
pub use error::InferenceError;
pub use tensor::{InputTensor, OutputTensor, TensorType};

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
