//! Batch-scoped feature engineering for the anomaly classifier.

pub mod artifacts;
mod engineer;

pub use artifacts::{ArtifactStore, DiskArtifactStore, EncoderSet, LabelEncoder, Scaler};
pub use engineer::{engineer_features, FeatureTable};

use serde::{Deserialize, Serialize};

use crate::models::record::InvoiceRecord;

/// Fixed feature-vector layout consumed by the scaler and classifier.
pub const FEATURE_COLUMNS: [&str; 16] = [
    "total_amount",
    "is_month_end",
    "items_count",
    "avg_item_value",
    "days_to_due",
    "customer_mean",
    "customer_std",
    "supplier_mean",
    "supplier_std",
    "supplier_name_encoded",
    "customer_name_encoded",
    "category_encoded",
    "transaction_type_encoded",
    "note_encoded",
    "supplier_category_encoded",
    "customer_category_encoded",
];

/// Categorical columns with a pretrained label encoder each.
pub const CATEGORICAL_COLUMNS: [&str; 7] = [
    "supplier_name",
    "customer_name",
    "category",
    "transaction_type",
    "note",
    "supplier_category",
    "customer_category",
];

/// Occurrence-count threshold above which a supplier is tiered Top.
pub const SUPPLIER_TOP_THRESHOLD: usize = 3000;

/// Occurrence-count threshold above which a customer is tiered Top.
pub const CUSTOMER_TOP_THRESHOLD: usize = 4500;

/// Which side of the invoice an entity tier describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRole {
    Supplier,
    Customer,
}

/// Frequency-based entity tier, computed within the current batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityTier {
    /// The sentinel organization itself.
    Special,
    /// Occurrence frequency above the role's threshold.
    Top,
    /// Everyone else.
    Active,
}

impl EntityTier {
    /// Label string as the pretrained encoders saw it during training.
    pub fn label(&self, role: EntityRole) -> &'static str {
        match (self, role) {
            (EntityTier::Special, _) => "Special",
            (EntityTier::Top, EntityRole::Supplier) => "Top Supplier",
            (EntityTier::Top, EntityRole::Customer) => "Top Customer",
            (EntityTier::Active, EntityRole::Supplier) => "Active Supplier",
            (EntityTier::Active, EntityRole::Customer) => "Active Customer",
        }
    }
}

/// Encoded values of the seven categorical columns. `None` only when the
/// pretrained encoder set lacks that column; the vector assembly
/// zero-fills it and warns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedColumns {
    pub supplier_name: Option<i64>,
    pub customer_name: Option<i64>,
    pub category: Option<i64>,
    pub transaction_type: Option<i64>,
    pub note: Option<i64>,
    pub supplier_category: Option<i64>,
    pub customer_category: Option<i64>,
}

/// One model-ready row: the source record plus every derived feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRow {
    pub record: InvoiceRecord,

    /// Coerced numeric total.
    pub total_amount: f64,
    /// Mean line-item value, 2 decimal places.
    pub avg_item_value: f64,

    pub supplier_category: EntityTier,
    pub customer_category: EntityTier,

    /// Whole days between issue and due date; negative means already
    /// overdue at issuance and is never clamped. `None` when either date
    /// is missing.
    pub days_to_due: Option<i64>,

    /// Batch-scoped per-entity statistics of the total amount.
    pub customer_mean: f64,
    /// Sample standard deviation; `None` for singleton groups.
    pub customer_std: Option<f64>,
    pub supplier_mean: f64,
    pub supplier_std: Option<f64>,

    pub encoded: EncodedColumns,
}
