//! CSV export of record tables and classification results.
//!
//! Files are written as UTF-8 with a byte-order mark so spreadsheet
//! applications pick up the Czech diacritics without an import dialog.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;

use crate::classify::ClassifiedRow;
use crate::error::Result;
use crate::models::record::InvoiceRecord;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

const RECORD_HEADER: [&str; 17] = [
    "invoice_id",
    "variable_symbol",
    "supplier_name",
    "supplier_ico",
    "supplier_dic",
    "supplier_account",
    "customer_name",
    "customer_ico",
    "customer_dic",
    "invoice_date",
    "due_date",
    "items_count",
    "category",
    "transaction_type",
    "total_amount",
    "is_month_end",
    "note",
];

const CLASSIFIED_EXTRA_HEADER: [&str; 11] = [
    "avg_item_value",
    "days_to_due",
    "supplier_category",
    "customer_category",
    "supplier_mean",
    "supplier_std",
    "customer_mean",
    "customer_std",
    "anomaly_code",
    "anomaly_type",
    "anomaly_confidence",
];

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn record_cells(record: &InvoiceRecord) -> Vec<String> {
    vec![
        record.invoice_id.clone(),
        record.variable_symbol.clone(),
        record.supplier_name.clone(),
        record.supplier_ico.clone(),
        record.supplier_dic.clone(),
        record.supplier_account.clone(),
        record.customer_name.clone(),
        record.customer_ico.clone(),
        record.customer_dic.clone(),
        date_cell(record.invoice_date),
        date_cell(record.due_date),
        record.items_count.to_string(),
        record.category.clone(),
        record.transaction_type.as_str().to_string(),
        record.total_amount.clone(),
        record.is_month_end.to_string(),
        record.note.clone(),
    ]
}

/// Write the parsed record table as CSV.
pub fn write_records_csv<W: Write>(mut writer: W, records: &[InvoiceRecord]) -> Result<()> {
    writer.write_all(UTF8_BOM)?;
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(RECORD_HEADER)?;
    for record in records {
        csv.write_record(record_cells(record))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write classification results as CSV: every record column followed by
/// the derived features and the model verdict.
pub fn write_classified_csv<W: Write>(mut writer: W, rows: &[ClassifiedRow]) -> Result<()> {
    writer.write_all(UTF8_BOM)?;
    let mut csv = csv::Writer::from_writer(writer);

    let header: Vec<&str> = RECORD_HEADER
        .iter()
        .chain(CLASSIFIED_EXTRA_HEADER.iter())
        .copied()
        .collect();
    csv.write_record(header)?;

    for row in rows {
        let mut cells = record_cells(&row.feature.record);
        cells.extend([
            format!("{:.2}", row.feature.avg_item_value),
            row.feature
                .days_to_due
                .map(|d| d.to_string())
                .unwrap_or_default(),
            row.feature
                .supplier_category
                .label(crate::features::EntityRole::Supplier)
                .to_string(),
            row.feature
                .customer_category
                .label(crate::features::EntityRole::Customer)
                .to_string(),
            format!("{:.2}", row.feature.supplier_mean),
            row.feature
                .supplier_std
                .map(|s| format!("{:.2}", s))
                .unwrap_or_default(),
            format!("{:.2}", row.feature.customer_mean),
            row.feature
                .customer_std
                .map(|s| format!("{:.2}", s))
                .unwrap_or_default(),
            row.anomaly_code.to_string(),
            row.anomaly_type.label().to_string(),
            format!("{:.4}", row.anomaly_confidence),
        ]);
        csv.write_record(cells)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the record table to a file path.
pub fn export_records<P: AsRef<Path>>(path: P, records: &[InvoiceRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_records_csv(file, records)?;
    debug!("exported {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write classification results to a file path.
pub fn export_classified<P: AsRef<Path>>(path: P, rows: &[ClassifiedRow]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_classified_csv(file, rows)?;
    debug!("exported {} classified rows to {}", rows.len(), path.display());
    Ok(())
}
