//! Inference backend implementations.

pub mod tract;

use crate::{InputTensor, OutputTensor, Result};

/// Trait for ONNX inference backends.
///
/// Abstracts over runtime implementations so the classification core only
/// sees named tensors in and named tensors out. Implementations must be
/// deterministic: the same input always yields the same output.
pub trait InferenceBackend: Send + Sync {
    /// Run inference with the given inputs.
    ///
    /// # Arguments
    /// * `inputs` - Named input tensors
    ///
    /// # Returns
    /// Named output tensors from the model
    fn run(&self, inputs: &[(&str, InputTensor)]) -> Result<Vec<(String, OutputTensor)>>;

    /// Get the input names expected by the model.
    fn input_names(&self) -> &[String];

    /// Get the output names produced by the model.
    fn output_names(&self) -> &[String];
}
