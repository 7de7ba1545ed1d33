//! Invoice record model produced by the normalizer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Organization name that marks an invoice as income rather than expense,
/// and as the Special entity tier during feature engineering.
pub const SENTINEL_ORGANIZATION: &str = "FinDoc AI";

/// Direction of the transaction from the organization's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// The sentinel organization is the supplier.
    Income,
    /// Anyone else issued the invoice.
    Expense,
}

impl TransactionType {
    /// Stable string form, used for CSV export and label encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

/// One row of the processing table: a single parsed and normalized invoice.
///
/// Optional textual fields default to the empty string; dates are `None`
/// when absent or unparsable. Exactly one record per successfully parsed
/// PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice number as printed on the document.
    pub invoice_id: String,
    /// Czech payment-reference code.
    pub variable_symbol: String,

    pub supplier_name: String,
    pub supplier_ico: String,
    pub supplier_dic: String,
    pub supplier_account: String,

    pub customer_name: String,
    pub customer_ico: String,
    pub customer_dic: String,

    /// Issue date.
    pub invoice_date: Option<NaiveDate>,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,

    /// Number of parsed line items.
    pub items_count: u32,

    /// Free-text label taken from the note field.
    pub category: String,

    pub transaction_type: TransactionType,

    /// Monetary total as a normalized numeric string ("50000.00");
    /// numeric parsing happens downstream in feature engineering.
    pub total_amount: String,

    /// True when the issue date falls on the last day of its month or the
    /// two days before it.
    pub is_month_end: bool,

    /// Raw free-text note.
    pub note: String,
}
