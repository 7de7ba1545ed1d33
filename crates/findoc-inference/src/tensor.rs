//! Tensor types for inference input/output.
//!
//! Classifier models exported from gradient-boosting libraries take a
//! float feature matrix and produce an integer label tensor plus a float
//! probability tensor, so only those data types are modelled here.

use ndarray::{ArrayD, IxDyn};

/// Supported tensor data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorType {
    Float32,
    Float64,
    Int64,
}

/// Input tensor for inference.
#[derive(Debug, Clone)]
pub enum InputTensor {
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
    Int64(ArrayD<i64>),
}

impl InputTensor {
    /// Get the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        match self {
            InputTensor::Float32(arr) => arr.shape(),
            InputTensor::Float64(arr) => arr.shape(),
            InputTensor::Int64(arr) => arr.shape(),
        }
    }

    /// Get the data type of the tensor.
    pub fn dtype(&self) -> TensorType {
        match self {
            InputTensor::Float32(_) => TensorType::Float32,
            InputTensor::Float64(_) => TensorType::Float64,
            InputTensor::Int64(_) => TensorType::Int64,
        }
    }

    /// Create a Float32 tensor from raw data and shape.
    ///
    /// Returns `None` when the data length does not match the shape.
    pub fn from_f32(data: Vec<f32>, shape: &[usize]) -> Option<Self> {
        ArrayD::from_shape_vec(IxDyn(shape), data)
            .ok()
            .map(InputTensor::Float32)
    }
}

/// Output tensor from inference.
#[derive(Debug, Clone)]
pub enum OutputTensor {
    Float32(ArrayD<f32>),
    Float64(ArrayD<f64>),
    Int64(ArrayD<i64>),
}

impl OutputTensor {
    /// Get the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        match self {
            OutputTensor::Float32(arr) => arr.shape(),
            OutputTensor::Float64(arr) => arr.shape(),
            OutputTensor::Int64(arr) => arr.shape(),
        }
    }

    /// Get the data type of the tensor.
    pub fn dtype(&self) -> TensorType {
        match self {
            OutputTensor::Float32(_) => TensorType::Float32,
            OutputTensor::Float64(_) => TensorType::Float64,
            OutputTensor::Int64(_) => TensorType::Int64,
        }
    }

    /// Try to get the inner Float32 array.
    pub fn as_f32(&self) -> Option<&ArrayD<f32>> {
        match self {
            OutputTensor::Float32(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get the inner Int64 array.
    pub fn as_i64(&self) -> Option<&ArrayD<i64>> {
        match self {
            OutputTensor::Int64(arr) => Some(arr),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_f32_shape_check() {
        let ok = InputTensor::from_f32(vec![0.0; 16], &[1, 16]);
        assert!(ok.is_some());
        assert_eq!(ok.unwrap().shape(), &[1, 16]);

        let bad = InputTensor::from_f32(vec![0.0; 15], &[1, 16]);
        assert!(bad.is_none());
    }
}
