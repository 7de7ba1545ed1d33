//! Pretrained artifact adapters: scaler, label encoders, classifier.
//!
//! The artifacts are fitted elsewhere and exported to portable formats
//! (JSON for the scaler and encoders, ONNX for the classifier). They are
//! loaded once per pipeline invocation and never refit here.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use findoc_inference::{InferenceBackend, TractBackend};

use crate::error::{ArtifactError, FeatureError};
use crate::features::FEATURE_COLUMNS;
use crate::models::config::ArtifactConfig;

/// Pretrained standardization scaler over the fixed 16-column feature
/// vector: `(x - mean) / scale` per column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub columns: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    /// Load the scaler from its JSON export and validate its shape
    /// against the feature-vector contract.
    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        let content = fs::read_to_string(path).map_err(|e| ArtifactError::Load {
            artifact: "scaler".to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;
        let scaler: Scaler =
            serde_json::from_str(&content).map_err(|e| ArtifactError::Load {
                artifact: "scaler".to_string(),
                reason: e.to_string(),
            })?;
        scaler.validate()?;
        debug!("loaded scaler for {} columns", scaler.columns.len());
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        for (name, len) in [("mean", self.mean.len()), ("scale", self.scale.len())] {
            if len != self.columns.len() {
                return Err(ArtifactError::Load {
                    artifact: "scaler".to_string(),
                    reason: format!("{} has {} entries for {} columns", name, len, self.columns.len()),
                });
            }
        }
        if self.columns.len() != FEATURE_COLUMNS.len() {
            return Err(ArtifactError::ShapeMismatch {
                artifact: "scaler".to_string(),
                expected: FEATURE_COLUMNS.len(),
                actual: self.columns.len(),
            });
        }
        if self.scale.iter().any(|&s| s == 0.0) {
            return Err(ArtifactError::Load {
                artifact: "scaler".to_string(),
                reason: "degenerate zero scale entry".to_string(),
            });
        }
        Ok(())
    }

    /// Standardize one feature vector with the pretrained statistics.
    pub fn transform(&self, row: &[f64; 16]) -> [f32; 16] {
        let mut scaled = [0.0f32; 16];
        for (i, value) in row.iter().enumerate() {
            scaled[i] = ((value - self.mean[i]) / self.scale[i]) as f32;
        }
        scaled
    }
}

/// Pretrained label encoder: a finite string vocabulary mapped to dense
/// integers by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    /// Whether the value is in the training vocabulary.
    pub fn contains(&self, value: &str) -> bool {
        self.classes.iter().any(|c| c == value)
    }

    /// Map a known value to its integer code. Out-of-vocabulary values
    /// error; callers must apply the majority-value fallback first.
    pub fn transform(&self, column: &str, value: &str) -> Result<i64, FeatureError> {
        self.classes
            .iter()
            .position(|c| c == value)
            .map(|p| p as i64)
            .ok_or_else(|| FeatureError::EncodingViolation {
                column: column.to_string(),
                value: value.to_string(),
            })
    }
}

/// The per-column set of pretrained label encoders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncoderSet {
    encoders: BTreeMap<String, LabelEncoder>,
}

impl EncoderSet {
    /// Load the encoder set from its JSON export.
    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        let content = fs::read_to_string(path).map_err(|e| ArtifactError::Load {
            artifact: "label encoders".to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;
        let set: EncoderSet =
            serde_json::from_str(&content).map_err(|e| ArtifactError::Load {
                artifact: "label encoders".to_string(),
                reason: e.to_string(),
            })?;
        debug!("loaded {} label encoders", set.encoders.len());
        Ok(set)
    }

    /// Build an encoder set from column/vocabulary pairs.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: Into<String>,
    {
        Self {
            encoders: columns
                .into_iter()
                .map(|(name, classes)| (name.into(), LabelEncoder { classes }))
                .collect(),
        }
    }

    /// Encoder for a categorical column, if the artifact carries one.
    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.get(column)
    }
}

/// Provider of the three pretrained artifacts. The classifier comes back
/// as an opaque inference backend honoring the predict/predict-proba
/// contract.
pub trait ArtifactStore {
    fn load_scaler(&self) -> Result<Scaler, ArtifactError>;
    fn load_encoders(&self) -> Result<EncoderSet, ArtifactError>;
    fn load_classifier(&self) -> Result<Box<dyn InferenceBackend>, ArtifactError>;
}

/// Artifact store reading from configured file paths.
pub struct DiskArtifactStore {
    config: ArtifactConfig,
}

impl DiskArtifactStore {
    pub fn new(config: ArtifactConfig) -> Self {
        Self { config }
    }
}

impl ArtifactStore for DiskArtifactStore {
    fn load_scaler(&self) -> Result<Scaler, ArtifactError> {
        Scaler::from_file(&self.config.scaler_path())
    }

    fn load_encoders(&self) -> Result<EncoderSet, ArtifactError> {
        EncoderSet::from_file(&self.config.encoders_path())
    }

    fn load_classifier(&self) -> Result<Box<dyn InferenceBackend>, ArtifactError> {
        let path = self.config.classifier_path();
        let backend = TractBackend::from_file(&path).map_err(|e| ArtifactError::Load {
            artifact: "classifier".to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;
        Ok(Box::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn identity_scaler() -> Scaler {
        Scaler {
            columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            mean: vec![0.0; 16],
            scale: vec![1.0; 16],
        }
    }

    #[test]
    fn test_scaler_transform() {
        let mut scaler = identity_scaler();
        scaler.mean[0] = 100.0;
        scaler.scale[0] = 50.0;

        let mut row = [0.0f64; 16];
        row[0] = 200.0;
        let scaled = scaler.transform(&row);
        assert_eq!(scaled[0], 2.0);
        assert_eq!(scaled[1], 0.0);
    }

    #[test]
    fn test_scaler_shape_validation() {
        let mut scaler = identity_scaler();
        scaler.columns.pop();
        scaler.mean.pop();
        scaler.scale.pop();
        assert!(matches!(
            scaler.validate(),
            Err(ArtifactError::ShapeMismatch { expected: 16, actual: 15, .. })
        ));
    }

    #[test]
    fn test_scaler_rejects_zero_scale() {
        let mut scaler = identity_scaler();
        scaler.scale[3] = 0.0;
        assert!(matches!(scaler.validate(), Err(ArtifactError::Load { .. })));
    }

    #[test]
    fn test_label_encoder_transform() {
        let encoder = LabelEncoder {
            classes: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(encoder.transform("col", "B").unwrap(), 1);
        assert!(matches!(
            encoder.transform("col", "C"),
            Err(FeatureError::EncodingViolation { .. })
        ));
    }

    #[test]
    fn test_encoder_set_json_roundtrip() {
        let set = EncoderSet::from_columns([(
            "supplier_name",
            vec!["Acme".to_string(), "FinDoc AI".to_string()],
        )]);
        let json = serde_json::to_string(&set).unwrap();
        let loaded: EncoderSet = serde_json::from_str(&json).unwrap();
        assert_eq!(
            loaded.get("supplier_name").unwrap().transform("supplier_name", "Acme").unwrap(),
            0
        );
        assert!(loaded.get("note").is_none());
    }
}
