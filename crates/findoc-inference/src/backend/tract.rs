//! Tract backend for pure-Rust ONNX inference.

use std::path::Path;

use ndarray::ArrayD;
use tract_onnx::prelude::*;
use tracing::debug;

use crate::error::InferenceError;
use crate::tensor::{InputTensor, OutputTensor};
use crate::{InferenceBackend, Result};

/// Default input shape for the anomaly classifier: one row of 16 features.
pub const CLASSIFIER_INPUT_SHAPE: [usize; 2] = [1, 16];

/// Backend using Tract for ONNX inference.
pub struct TractBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl TractBackend {
    /// Load a classifier model from a file path with the default
    /// single-row feature-vector input shape.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_file_with_shape(path, &CLASSIFIER_INPUT_SHAPE)
    }

    /// Load a model from a file path with a specified input shape.
    ///
    /// Tract requires concrete dimensions, so models exported with a
    /// dynamic batch axis get the shape pinned here.
    pub fn from_file_with_shape<P: AsRef<Path>>(path: P, input_shape: &[usize]) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading ONNX model with Tract from: {}", path.display());

        let mut model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| InferenceError::ModelLoad(e.to_string()))?;

        model
            .set_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), input_shape))
            .map_err(|e| InferenceError::ShapePin {
                shape: input_shape.to_vec(),
                reason: e.to_string(),
            })?;

        let model = model
            .into_typed()
            .map_err(|e| InferenceError::PlanBuild(format!("typing: {}", e)))?
            .into_optimized()
            .map_err(|e| InferenceError::PlanBuild(format!("optimizing: {}", e)))?
            .into_runnable()
            .map_err(|e| InferenceError::PlanBuild(format!("finalizing: {}", e)))?;

        // Gradient-boosting exporters name these "label" and "probabilities".
        let input_names = vec!["input".to_string()];
        let output_names = vec!["label".to_string(), "probabilities".to_string()];

        Ok(Self {
            model,
            input_names,
            output_names,
        })
    }

    fn convert_input(&self, tensor: &InputTensor) -> Result<TValue> {
        match tensor {
            InputTensor::Float32(arr) => {
                let shape: TVec<usize> = arr.shape().iter().cloned().collect();
                let data: Vec<f32> = arr.iter().cloned().collect();
                let tract_tensor = tract_ndarray::ArrayD::from_shape_vec(
                    tract_ndarray::IxDyn(shape.as_slice()),
                    data,
                )
                .map_err(|e| InferenceError::InvalidInput(e.to_string()))?;
                Ok(tract_tensor.into_tvalue())
            }
            InputTensor::Float64(arr) => {
                let shape: TVec<usize> = arr.shape().iter().cloned().collect();
                let data: Vec<f64> = arr.iter().cloned().collect();
                let tract_tensor = tract_ndarray::ArrayD::from_shape_vec(
                    tract_ndarray::IxDyn(shape.as_slice()),
                    data,
                )
                .map_err(|e| InferenceError::InvalidInput(e.to_string()))?;
                Ok(tract_tensor.into_tvalue())
            }
            InputTensor::Int64(arr) => {
                let shape: TVec<usize> = arr.shape().iter().cloned().collect();
                let data: Vec<i64> = arr.iter().cloned().collect();
                let tract_tensor = tract_ndarray::ArrayD::from_shape_vec(
                    tract_ndarray::IxDyn(shape.as_slice()),
                    data,
                )
                .map_err(|e| InferenceError::InvalidInput(e.to_string()))?;
                Ok(tract_tensor.into_tvalue())
            }
        }
    }
}

impl InferenceBackend for TractBackend {
    fn run(&self, inputs: &[(&str, InputTensor)]) -> Result<Vec<(String, OutputTensor)>> {
        let tract_inputs: TVec<TValue> = inputs
            .iter()
            .map(|(_, tensor)| self.convert_input(tensor))
            .collect::<Result<TVec<_>>>()?;

        let outputs = self
            .model
            .run(tract_inputs)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let mut results = Vec::with_capacity(outputs.len());

        for (idx, output) in outputs.iter().enumerate() {
            let name = self
                .output_names
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("output_{}", idx));

            let tensor = if let Ok(arr) = output.to_array_view::<f32>() {
                let shape: Vec<usize> = arr.shape().to_vec();
                let data: Vec<f32> = arr.iter().cloned().collect();
                let arr = ArrayD::from_shape_vec(ndarray::IxDyn(&shape), data)
                    .map_err(|e| InferenceError::OutputExtraction(e.to_string()))?;
                OutputTensor::Float32(arr)
            } else if let Ok(arr) = output.to_array_view::<i64>() {
                let shape: Vec<usize> = arr.shape().to_vec();
                let data: Vec<i64> = arr.iter().cloned().collect();
                let arr = ArrayD::from_shape_vec(ndarray::IxDyn(&shape), data)
                    .map_err(|e| InferenceError::OutputExtraction(e.to_string()))?;
                OutputTensor::Int64(arr)
            } else if let Ok(arr) = output.to_array_view::<f64>() {
                let shape: Vec<usize> = arr.shape().to_vec();
                let data: Vec<f64> = arr.iter().cloned().collect();
                let arr = ArrayD::from_shape_vec(ndarray::IxDyn(&shape), data)
                    .map_err(|e| InferenceError::OutputExtraction(e.to_string()))?;
                OutputTensor::Float64(arr)
            } else {
                return Err(InferenceError::OutputExtraction(format!(
                    "unsupported output type for '{}'",
                    name
                )));
            };

            results.push((name, tensor));
        }

        Ok(results)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file_is_a_load_error() {
        let result = TractBackend::from_file("no/such/model.onnx");
        assert!(matches!(result, Err(InferenceError::ModelLoad(_))));
    }
}
