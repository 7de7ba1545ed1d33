//! Anomaly classification of engineered feature rows.
//!
//! The classifier is a pretrained multiclass model exported to ONNX. It
//! was fitted on single-row batches, so inference runs row by row over
//! the scaled feature matrix.

use tracing::debug;

use findoc_inference::{InferenceBackend, InferenceError, InputTensor};

use crate::error::{FeatureError, Result};
use crate::features::{FeatureRow, FeatureTable};

/// The fixed label table of the pretrained classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyType {
    /// High total amount combined with a short payment window.
    HighAmountShortDue,
    /// Line items inconsistent with the invoice dates.
    ItemDateMismatch,
    /// Nothing suspicious.
    NoAnomaly,
    /// Item count far from the entity's usual volume.
    UnusualItemCount,
    /// Service description outside the entity's usual categories.
    UnusualService,
}

impl AnomalyType {
    /// Map a raw classifier class id to its anomaly type. Ids outside the
    /// label table are a model-contract violation.
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(AnomalyType::HighAmountShortDue),
            1 => Ok(AnomalyType::ItemDateMismatch),
            2 => Ok(AnomalyType::NoAnomaly),
            3 => Ok(AnomalyType::UnusualItemCount),
            4 => Ok(AnomalyType::UnusualService),
            other => Err(FeatureError::UnknownClass(other).into()),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            AnomalyType::HighAmountShortDue => 0,
            AnomalyType::ItemDateMismatch => 1,
            AnomalyType::NoAnomaly => 2,
            AnomalyType::UnusualItemCount => 3,
            AnomalyType::UnusualService => 4,
        }
    }

    /// Human-readable label for reports and CSV export.
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyType::HighAmountShortDue => "High amount with short due period",
            AnomalyType::ItemDateMismatch => "Items inconsistent with dates",
            AnomalyType::NoAnomaly => "No anomaly",
            AnomalyType::UnusualItemCount => "Unusual item count",
            AnomalyType::UnusualService => "Unusual service",
        }
    }

    /// Whether the class counts as an alert.
    pub fn is_anomaly(&self) -> bool {
        !matches!(self, AnomalyType::NoAnomaly)
    }
}

/// One classified row: the feature row plus the model verdict.
#[derive(Debug, Clone)]
pub struct ClassifiedRow {
    pub feature: FeatureRow,
    pub anomaly_code: i64,
    /// Probability the model assigned to the predicted class.
    pub anomaly_confidence: f32,
    pub anomaly_type: AnomalyType,
}

/// Row-by-row anomaly classifier over a loaded inference backend.
pub struct AnomalyClassifier {
    backend: Box<dyn InferenceBackend>,
}

impl AnomalyClassifier {
    pub fn new(backend: Box<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    /// Classify every row of an engineered feature table. Row order is
    /// preserved; any inference failure aborts the whole step.
    pub fn classify(&self, table: &FeatureTable) -> Result<Vec<ClassifiedRow>> {
        let mut classified = Vec::with_capacity(table.rows.len());

        for (row, vector) in table.rows.iter().zip(&table.matrix) {
            let (code, confidence) = self.predict_row(vector)?;
            classified.push(ClassifiedRow {
                feature: row.clone(),
                anomaly_code: code,
                anomaly_confidence: confidence,
                anomaly_type: AnomalyType::from_code(code)?,
            });
        }

        debug!(
            "classified {} rows, {} flagged",
            classified.len(),
            classified.iter().filter(|r| r.anomaly_type.is_anomaly()).count()
        );
        Ok(classified)
    }

    /// Run the model on one scaled feature vector and return the
    /// predicted class id with its probability.
    ///
    /// The label comes from the model's integer output when present;
    /// otherwise it is the argmax of the probability tensor. Confidence
    /// is the highest class probability, or 1.0 for models exported
    /// without one.
    pub fn predict_row(&self, vector: &[f32; 16]) -> Result<(i64, f32)> {
        let input_name = self
            .backend
            .input_names()
            .first()
            .map(|s| s.as_str())
            .unwrap_or("input");

        let tensor = InputTensor::from_f32(vector.to_vec(), &[1, vector.len()])
            .ok_or_else(|| {
                InferenceError::InvalidInput("feature vector shape".to_string())
            })?;

        let outputs = self.backend.run(&[(input_name, tensor)])?;

        let mut label: Option<i64> = None;
        let mut confidence: Option<f32> = None;

        for (_, output) in &outputs {
            if label.is_none() {
                if let Some(arr) = output.as_i64() {
                    label = arr.iter().next().copied();
                    continue;
                }
            }
            if confidence.is_none() {
                if let Some(arr) = output.as_f32() {
                    confidence = arr.iter().cloned().fold(None, |max, p| {
                        Some(max.map_or(p, |m: f32| m.max(p)))
                    });
                    if label.is_none() {
                        label = argmax(arr.iter().cloned());
                    }
                }
            }
        }

        let code = label.ok_or_else(|| {
            InferenceError::OutputExtraction("no label output".to_string())
        })?;
        Ok((code, confidence.unwrap_or(1.0)))
    }
}

/// Split classified rows into flagged anomalies and clean rows.
pub fn partition_alerts(rows: Vec<ClassifiedRow>) -> (Vec<ClassifiedRow>, Vec<ClassifiedRow>) {
    rows.into_iter().partition(|r| r.anomaly_type.is_anomaly())
}

fn argmax<I: Iterator<Item = f32>>(values: I) -> Option<i64> {
    values
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{EncodedColumns, EntityTier};
    use crate::models::record::{InvoiceRecord, TransactionType};
    use findoc_inference::OutputTensor;
    use ndarray::ArrayD;
    use pretty_assertions::assert_eq;

    struct FixedBackend {
        label: Option<i64>,
        probabilities: Vec<f32>,
        input_names: Vec<String>,
        output_names: Vec<String>,
    }

    impl FixedBackend {
        fn new(label: Option<i64>, probabilities: Vec<f32>) -> Self {
            Self {
                label,
                probabilities,
                input_names: vec!["input".to_string()],
                output_names: vec!["label".to_string(), "probabilities".to_string()],
            }
        }
    }

    impl InferenceBackend for FixedBackend {
        fn run(
            &self,
            _inputs: &[(&str, InputTensor)],
        ) -> findoc_inference::Result<Vec<(String, OutputTensor)>> {
            let mut outputs = Vec::new();
            if let Some(label) = self.label {
                let arr = ArrayD::from_shape_vec(ndarray::IxDyn(&[1]), vec![label]).unwrap();
                outputs.push(("label".to_string(), OutputTensor::Int64(arr)));
            }
            let probs = ArrayD::from_shape_vec(
                ndarray::IxDyn(&[1, self.probabilities.len()]),
                self.probabilities.clone(),
            )
            .unwrap();
            outputs.push(("probabilities".to_string(), OutputTensor::Float32(probs)));
            Ok(outputs)
        }

        fn input_names(&self) -> &[String] {
            &self.input_names
        }

        fn output_names(&self) -> &[String] {
            &self.output_names
        }
    }

    fn feature_row() -> FeatureRow {
        FeatureRow {
            record: InvoiceRecord {
                invoice_id: "2024001".to_string(),
                variable_symbol: String::new(),
                supplier_name: "Acme".to_string(),
                supplier_ico: String::new(),
                supplier_dic: String::new(),
                supplier_account: String::new(),
                customer_name: "Gama".to_string(),
                customer_ico: String::new(),
                customer_dic: String::new(),
                invoice_date: None,
                due_date: None,
                items_count: 1,
                category: String::new(),
                transaction_type: TransactionType::Expense,
                total_amount: "100.00".to_string(),
                is_month_end: false,
                note: String::new(),
            },
            total_amount: 100.0,
            avg_item_value: 100.0,
            supplier_category: EntityTier::Active,
            customer_category: EntityTier::Active,
            days_to_due: Some(14),
            customer_mean: 100.0,
            customer_std: None,
            supplier_mean: 100.0,
            supplier_std: None,
            encoded: EncodedColumns::default(),
        }
    }

    fn table_of(n: usize) -> FeatureTable {
        FeatureTable {
            rows: vec![feature_row(); n],
            matrix: vec![[0.0f32; 16]; n],
        }
    }

    #[test]
    fn test_label_output_wins_over_argmax() {
        let backend = FixedBackend::new(Some(3), vec![0.9, 0.05, 0.03, 0.01, 0.01]);
        let classifier = AnomalyClassifier::new(Box::new(backend));
        let rows = classifier.classify(&table_of(1)).unwrap();

        assert_eq!(rows[0].anomaly_code, 3);
        assert_eq!(rows[0].anomaly_type, AnomalyType::UnusualItemCount);
        assert_eq!(rows[0].anomaly_confidence, 0.9);
    }

    #[test]
    fn test_argmax_fallback_without_label_output() {
        let backend = FixedBackend::new(None, vec![0.1, 0.2, 0.6, 0.05, 0.05]);
        let classifier = AnomalyClassifier::new(Box::new(backend));
        let rows = classifier.classify(&table_of(1)).unwrap();

        assert_eq!(rows[0].anomaly_code, 2);
        assert_eq!(rows[0].anomaly_type, AnomalyType::NoAnomaly);
    }

    #[test]
    fn test_unknown_class_id_is_fatal() {
        let backend = FixedBackend::new(Some(7), vec![1.0]);
        let classifier = AnomalyClassifier::new(Box::new(backend));
        assert!(classifier.classify(&table_of(1)).is_err());
    }

    #[test]
    fn test_partition_filters_no_anomaly() {
        let backend = FixedBackend::new(Some(2), vec![0.1, 0.1, 0.8, 0.0, 0.0]);
        let classifier = AnomalyClassifier::new(Box::new(backend));
        let rows = classifier.classify(&table_of(3)).unwrap();

        let (flagged, clean) = partition_alerts(rows);
        assert!(flagged.is_empty());
        assert_eq!(clean.len(), 3);
    }

    #[test]
    fn test_repeated_classification_is_deterministic() {
        let backend = FixedBackend::new(Some(0), vec![0.7, 0.1, 0.1, 0.05, 0.05]);
        let classifier = AnomalyClassifier::new(Box::new(backend));
        let table = table_of(1);

        let first = classifier.classify(&table).unwrap();
        let second = classifier.classify(&table).unwrap();
        assert_eq!(first[0].anomaly_code, second[0].anomaly_code);
        assert_eq!(first[0].anomaly_confidence, second[0].anomaly_confidence);
    }

    #[test]
    fn test_code_label_round_trip() {
        for code in 0..=4 {
            let anomaly = AnomalyType::from_code(code).unwrap();
            assert_eq!(anomaly.code(), code);
        }
        assert!(AnomalyType::from_code(5).is_err());
        assert!(!AnomalyType::from_code(2).unwrap().is_anomaly());
        assert!(AnomalyType::from_code(0).unwrap().is_anomaly());
    }
}
