//! The feature derivation steps, each a pure transform over the whole
//! batch table.
//!
//! Frequency tiers, per-entity statistics, and the encoding fallback are
//! all defined relative to the current batch, so engineering runs only
//! after the full batch is assembled and can never be streamed row by
//! row.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::artifacts::{EncoderSet, Scaler};
use super::{
    EncodedColumns, EntityRole, EntityTier, FeatureRow, CATEGORICAL_COLUMNS,
    CUSTOMER_TOP_THRESHOLD, SUPPLIER_TOP_THRESHOLD,
};
use crate::error::{FeatureError, Result};
use crate::models::record::{InvoiceRecord, SENTINEL_ORGANIZATION};

/// Model-ready batch: one feature row per surviving record plus the
/// scaled 16-column matrix in the same order.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub rows: Vec<FeatureRow>,
    pub matrix: Vec<[f32; 16]>,
}

/// Derive, encode, and scale features for a batch of records.
///
/// Rows whose total amount is unparsable or whose item count is zero are
/// silently dropped (logged, not surfaced as errors). Everything else
/// follows the fixed derivation order; the result keeps the input order
/// of the surviving rows.
pub fn engineer_features(
    records: &[InvoiceRecord],
    encoders: &EncoderSet,
    scaler: &Scaler,
) -> Result<FeatureTable> {
    // Numeric coercion, silent row filter
    let mut kept: Vec<(InvoiceRecord, f64)> = Vec::with_capacity(records.len());
    for record in records {
        let amount = Decimal::from_str(&record.total_amount)
            .ok()
            .and_then(|d| d.to_f64());
        match amount {
            Some(amount) if record.items_count > 0 => kept.push((record.clone(), amount)),
            _ => {}
        }
    }

    let dropped = records.len() - kept.len();
    if dropped > 0 {
        warn!("dropped {} rows with unparsable amount or zero items", dropped);
    }
    if kept.is_empty() {
        return Err(FeatureError::EmptyTable.into());
    }

    // Batch-scoped occurrence frequencies and amount statistics
    let supplier_stats = group_stats(&kept, |r| &r.supplier_name);
    let customer_stats = group_stats(&kept, |r| &r.customer_name);

    let mut rows: Vec<FeatureRow> = kept
        .iter()
        .map(|(record, amount)| {
            let supplier = supplier_stats
                .get(record.supplier_name.as_str())
                .copied()
                .unwrap_or_default();
            let customer = customer_stats
                .get(record.customer_name.as_str())
                .copied()
                .unwrap_or_default();

            let days_to_due = match (record.due_date, record.invoice_date) {
                (Some(due), Some(issued)) => {
                    Some(due.signed_duration_since(issued).num_days())
                }
                _ => None,
            };

            FeatureRow {
                avg_item_value: round2(amount / f64::from(record.items_count)),
                total_amount: *amount,
                supplier_category: tier(
                    &record.supplier_name,
                    supplier.count,
                    SUPPLIER_TOP_THRESHOLD,
                ),
                customer_category: tier(
                    &record.customer_name,
                    customer.count,
                    CUSTOMER_TOP_THRESHOLD,
                ),
                days_to_due,
                customer_mean: round2(customer.mean),
                customer_std: customer.std.map(round2),
                supplier_mean: round2(supplier.mean),
                supplier_std: supplier.std.map(round2),
                encoded: EncodedColumns::default(),
                record: record.clone(),
            }
        })
        .collect();

    encode_columns(&mut rows, encoders)?;

    let matrix = rows
        .iter()
        .map(|row| scaler.transform(&assemble_vector(row)))
        .collect();

    debug!("engineered {} feature rows", rows.len());
    Ok(FeatureTable { rows, matrix })
}

/// Frequency tier for one entity within the batch.
fn tier(name: &str, count: usize, threshold: usize) -> EntityTier {
    if name == SENTINEL_ORGANIZATION {
        EntityTier::Special
    } else if count > threshold {
        EntityTier::Top
    } else {
        EntityTier::Active
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct GroupStats {
    count: usize,
    mean: f64,
    /// Sample standard deviation; `None` for singleton groups.
    std: Option<f64>,
}

fn group_stats<'a, F>(
    kept: &'a [(InvoiceRecord, f64)],
    key: F,
) -> HashMap<&'a str, GroupStats>
where
    F: Fn(&'a InvoiceRecord) -> &'a String,
{
    let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
    for (record, amount) in kept {
        groups.entry(key(record).as_str()).or_default().push(*amount);
    }

    groups
        .into_iter()
        .map(|(name, amounts)| {
            let count = amounts.len();
            let mean = amounts.iter().sum::<f64>() / count as f64;
            let std = if count > 1 {
                let variance = amounts
                    .iter()
                    .map(|a| (a - mean).powi(2))
                    .sum::<f64>()
                    / (count - 1) as f64;
                Some(variance.sqrt())
            } else {
                None
            };
            (name, GroupStats { count, mean, std })
        })
        .collect()
}

/// Label-encode every categorical column with the unseen-value fallback.
///
/// Values outside an encoder's vocabulary are replaced by the column's
/// most frequent value in the current batch before encoding, so the
/// encoder never sees an out-of-vocabulary value. This deliberately
/// misattributes novel entities to the majority class; the behavior is
/// part of the model contract and must not be "fixed" here. A column
/// with no encoder in the artifact stays unencoded and is zero-filled
/// later with a warning.
fn encode_columns(rows: &mut [FeatureRow], encoders: &EncoderSet) -> Result<()> {
    for column in CATEGORICAL_COLUMNS {
        let values: Vec<String> = rows.iter().map(|row| column_value(row, column)).collect();

        let encoder = match encoders.get(column) {
            Some(encoder) => encoder,
            None => {
                warn!("no pretrained encoder for column '{}'; zero-filling", column);
                continue;
            }
        };

        let majority = majority_value(&values);

        for (row, value) in rows.iter_mut().zip(&values) {
            let effective = if encoder.contains(value) {
                value.as_str()
            } else {
                majority.as_str()
            };
            let code = encoder.transform(column, effective)?;
            set_encoded(row, column, code);
        }
    }
    Ok(())
}

/// Most frequent value in the batch column; ties break toward the value
/// seen first, keeping the fallback deterministic.
fn majority_value(values: &[String]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value.as_str()).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for value in values {
        let count = counts[value.as_str()];
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((value.as_str(), count)),
        }
    }

    best.map(|(v, _)| v.to_string()).unwrap_or_default()
}

fn column_value(row: &FeatureRow, column: &str) -> String {
    match column {
        "supplier_name" => row.record.supplier_name.clone(),
        "customer_name" => row.record.customer_name.clone(),
        "category" => row.record.category.clone(),
        "transaction_type" => row.record.transaction_type.as_str().to_string(),
        "note" => row.record.note.clone(),
        "supplier_category" => row.supplier_category.label(EntityRole::Supplier).to_string(),
        "customer_category" => row.customer_category.label(EntityRole::Customer).to_string(),
        _ => String::new(),
    }
}

fn set_encoded(row: &mut FeatureRow, column: &str, code: i64) {
    let slot = match column {
        "supplier_name" => &mut row.encoded.supplier_name,
        "customer_name" => &mut row.encoded.customer_name,
        "category" => &mut row.encoded.category,
        "transaction_type" => &mut row.encoded.transaction_type,
        "note" => &mut row.encoded.note,
        "supplier_category" => &mut row.encoded.supplier_category,
        "customer_category" => &mut row.encoded.customer_category,
        _ => return,
    };
    *slot = Some(code);
}

/// Assemble the fixed 16-column vector. Undefined values (missing dates,
/// singleton stds, unencoded columns) are zero-filled to protect the
/// scaler/classifier shape contract.
fn assemble_vector(row: &FeatureRow) -> [f64; 16] {
    let enc = |v: Option<i64>| v.unwrap_or(0) as f64;
    [
        row.total_amount,
        if row.record.is_month_end { 1.0 } else { 0.0 },
        f64::from(row.record.items_count),
        row.avg_item_value,
        row.days_to_due.unwrap_or(0) as f64,
        row.customer_mean,
        row.customer_std.unwrap_or(0.0),
        row.supplier_mean,
        row.supplier_std.unwrap_or(0.0),
        enc(row.encoded.supplier_name),
        enc(row.encoded.customer_name),
        enc(row.encoded.category),
        enc(row.encoded.transaction_type),
        enc(row.encoded.note),
        enc(row.encoded.supplier_category),
        enc(row.encoded.customer_category),
    ]
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COLUMNS;
    use crate::models::record::TransactionType;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(supplier: &str, customer: &str, total: &str, items: u32) -> InvoiceRecord {
        InvoiceRecord {
            invoice_id: "1".to_string(),
            variable_symbol: String::new(),
            supplier_name: supplier.to_string(),
            supplier_ico: String::new(),
            supplier_dic: String::new(),
            supplier_account: String::new(),
            customer_name: customer.to_string(),
            customer_ico: String::new(),
            customer_dic: String::new(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 2, 28),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 13),
            items_count: items,
            category: "služby".to_string(),
            transaction_type: TransactionType::Expense,
            total_amount: total.to_string(),
            is_month_end: true,
            note: "služby".to_string(),
        }
    }

    fn identity_scaler() -> Scaler {
        Scaler {
            columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            mean: vec![0.0; 16],
            scale: vec![1.0; 16],
        }
    }

    fn full_encoders() -> EncoderSet {
        EncoderSet::from_columns([
            ("supplier_name", vec!["Acme".into(), "Beta".into(), "FinDoc AI".into()]),
            ("customer_name", vec!["Gama".into(), "Delta".into()]),
            ("category", vec!["služby".into()]),
            ("transaction_type", vec!["Expense".into(), "Income".into()]),
            ("note", vec!["služby".into()]),
            (
                "supplier_category",
                vec!["Active Supplier".into(), "Special".into(), "Top Supplier".into()],
            ),
            (
                "customer_category",
                vec!["Active Customer".into(), "Special".into(), "Top Customer".into()],
            ),
        ])
    }

    #[test]
    fn test_unparsable_amount_and_zero_items_are_dropped() {
        let records = vec![
            record("Acme", "Gama", "100.00", 1),
            record("Acme", "Gama", "", 1),
            record("Acme", "Gama", "100.00", 0),
        ];
        let table =
            engineer_features(&records, &full_encoders(), &identity_scaler()).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_empty_table_after_coercion_errors() {
        let records = vec![record("Acme", "Gama", "", 0)];
        let result = engineer_features(&records, &full_encoders(), &identity_scaler());
        assert!(result.is_err());
    }

    #[test]
    fn test_avg_item_value_rounding() {
        let records = vec![record("Acme", "Gama", "100.00", 3)];
        let table =
            engineer_features(&records, &full_encoders(), &identity_scaler()).unwrap();
        assert_eq!(table.rows[0].avg_item_value, 33.33);
    }

    #[test]
    fn test_days_to_due_negative_not_clamped() {
        let mut overdue = record("Acme", "Gama", "100.00", 1);
        overdue.invoice_date = NaiveDate::from_ymd_opt(2024, 3, 20);
        overdue.due_date = NaiveDate::from_ymd_opt(2024, 3, 10);
        let table = engineer_features(&[overdue], &full_encoders(), &identity_scaler())
            .unwrap();
        assert_eq!(table.rows[0].days_to_due, Some(-10));
    }

    #[test]
    fn test_frequency_tiering() {
        let mut records = vec![record("Beta", "Gama", "100.00", 1)];
        for _ in 0..3001 {
            records.push(record("Acme", "Gama", "100.00", 1));
        }
        let table =
            engineer_features(&records, &full_encoders(), &identity_scaler()).unwrap();

        assert_eq!(table.rows[0].supplier_category, EntityTier::Active);
        assert_eq!(table.rows[1].supplier_category, EntityTier::Top);
        // 3002 < customer threshold of 4500
        assert_eq!(table.rows[0].customer_category, EntityTier::Active);
    }

    #[test]
    fn test_sentinel_entity_is_special_regardless_of_frequency() {
        let records = vec![record("FinDoc AI", "Gama", "100.00", 1)];
        let table =
            engineer_features(&records, &full_encoders(), &identity_scaler()).unwrap();
        assert_eq!(table.rows[0].supplier_category, EntityTier::Special);
    }

    #[test]
    fn test_singleton_group_std_is_none() {
        let records = vec![
            record("Acme", "Gama", "100.00", 1),
            record("Beta", "Gama", "200.00", 1),
        ];
        let table =
            engineer_features(&records, &full_encoders(), &identity_scaler()).unwrap();

        assert_eq!(table.rows[0].supplier_std, None);
        // customer group has two members: sample std of {100, 200}
        assert_eq!(table.rows[0].customer_std, Some(70.71));
        assert_eq!(table.rows[0].customer_mean, 150.0);
    }

    #[test]
    fn test_unseen_category_falls_back_to_majority() {
        let mut records = Vec::new();
        for _ in 0..9 {
            records.push(record("Acme", "Gama", "100.00", 1));
        }
        records.push(record("Neznámá firma", "Gama", "100.00", 1));

        let table =
            engineer_features(&records, &full_encoders(), &identity_scaler()).unwrap();

        let acme_code = table.rows[0].encoded.supplier_name.unwrap();
        assert_eq!(table.rows[9].encoded.supplier_name, Some(acme_code));
    }

    #[test]
    fn test_missing_encoder_zero_fills_column() {
        let encoders = EncoderSet::from_columns([(
            "supplier_name",
            vec!["Acme".to_string()],
        )]);
        let records = vec![record("Acme", "Gama", "100.00", 1)];
        let table = engineer_features(&records, &encoders, &identity_scaler()).unwrap();

        assert_eq!(table.rows[0].encoded.customer_name, None);
        // customer_name_encoded is column 10 of the vector
        assert_eq!(table.matrix[0][10], 0.0);
    }

    #[test]
    fn test_vector_layout() {
        let records = vec![record("Acme", "Gama", "100.00", 2)];
        let table =
            engineer_features(&records, &full_encoders(), &identity_scaler()).unwrap();
        let v = table.matrix[0];

        assert_eq!(v[0], 100.0); // total_amount
        assert_eq!(v[1], 1.0); // is_month_end
        assert_eq!(v[2], 2.0); // items_count
        assert_eq!(v[3], 50.0); // avg_item_value
        assert_eq!(v[4], 14.0); // days_to_due
    }

    #[test]
    fn test_order_preserved() {
        let records = vec![
            record("Acme", "Gama", "1.00", 1),
            record("Beta", "Delta", "2.00", 1),
        ];
        let table =
            engineer_features(&records, &full_encoders(), &identity_scaler()).unwrap();
        assert_eq!(table.rows[0].record.supplier_name, "Acme");
        assert_eq!(table.rows[1].record.supplier_name, "Beta");
    }
}
