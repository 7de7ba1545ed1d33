//! Configuration structures for the findoc pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the findoc pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FindocConfig {
    /// Pretrained artifact locations.
    pub artifacts: ArtifactConfig,
}

impl Default for FindocConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactConfig::default(),
        }
    }
}

/// File locations of the pretrained scaler, label encoders, and classifier.
///
/// The artifacts are opaque: trained and exported elsewhere, loaded once
/// per pipeline invocation and treated as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Directory containing artifact files.
    pub artifact_dir: PathBuf,

    /// Feature scaler file name (JSON export of the fitted scaler).
    pub scaler: String,

    /// Label encoder set file name (JSON export of the fitted encoders).
    pub encoders: String,

    /// Anomaly classifier file name (ONNX export).
    pub classifier: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("artifacts"),
            scaler: "scaler.json".to_string(),
            encoders: "label_encoders.json".to_string(),
            classifier: "anomaly_classifier.onnx".to_string(),
        }
    }
}

impl ArtifactConfig {
    /// Full path to the scaler artifact.
    pub fn scaler_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.scaler)
    }

    /// Full path to the encoder set artifact.
    pub fn encoders_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.encoders)
    }

    /// Full path to the classifier artifact.
    pub fn classifier_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.classifier)
    }
}

impl FindocConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
