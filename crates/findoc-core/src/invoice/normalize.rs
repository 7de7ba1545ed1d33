//! Conversion of a raw field set into one typed invoice record.

use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::trace;

use super::RawFieldSet;
use crate::error::NormalizeError;
use crate::models::record::{InvoiceRecord, TransactionType, SENTINEL_ORGANIZATION};

/// Build a single [`InvoiceRecord`] from a parsed field set.
///
/// Takes the first element of every multi-valued field; only `items`
/// contributes through its length. Missing fields default to the empty
/// string, unparsable dates become `None` rather than errors.
pub fn normalize_record(raw: &RawFieldSet) -> Result<InvoiceRecord, NormalizeError> {
    let invoice_date = raw.invoice_date.first().and_then(|s| parse_czech_date(s));
    let due_date = raw.due_date.first().and_then(|s| parse_czech_date(s));

    let note = first(&raw.note);
    let total_amount = raw
        .total_amount
        .first()
        .map(|s| normalize_amount(s))
        .unwrap_or_default();

    // Income iff the sentinel organization appears among the parsed
    // supplier names
    let transaction_type = if raw
        .supplier_name
        .iter()
        .any(|name| name == SENTINEL_ORGANIZATION)
    {
        TransactionType::Income
    } else {
        TransactionType::Expense
    };

    let record = InvoiceRecord {
        invoice_id: first(&raw.invoice_id),
        variable_symbol: first(&raw.variable_symbol),
        supplier_name: first(&raw.supplier_name),
        supplier_ico: first(&raw.supplier_ico),
        supplier_dic: first(&raw.supplier_dic),
        supplier_account: first(&raw.supplier_account),
        customer_name: first(&raw.customer_name),
        customer_ico: first(&raw.customer_ico),
        customer_dic: first(&raw.customer_dic),
        invoice_date,
        due_date,
        items_count: raw.items.len() as u32,
        category: note.trim().to_string(),
        transaction_type,
        total_amount,
        is_month_end: invoice_date.map(is_month_end).unwrap_or(false),
        note,
    };

    trace!(
        "normalized invoice '{}' ({} items)",
        record.invoice_id, record.items_count
    );

    Ok(record)
}

fn first(values: &[String]) -> String {
    values.first().cloned().unwrap_or_default()
}

/// Parse a Czech-format date (`D.M.YYYY` or `DD.MM.YYYY`).
pub fn parse_czech_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d.%m.%Y").ok()
}

/// Normalize a Czech amount string to a parseable numeric string:
/// thousands spaces removed, decimal comma turned into a dot.
pub fn normalize_amount(value: &str) -> String {
    value.replace([' ', '\u{00a0}'], "").replace(',', ".")
}

/// True when the date falls on the last day of its month or within the
/// two calendar days before it.
pub fn is_month_end(date: NaiveDate) -> bool {
    let last_day = date
        .with_day(1)
        .and_then(|d| d.checked_add_months(Months::new(1)))
        .and_then(|d| d.pred_opt());

    match last_day {
        Some(last) => last
            .checked_sub_days(Days::new(2))
            .map(|threshold| date >= threshold)
            .unwrap_or(false),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw_with(supplier: &str, total: &str) -> RawFieldSet {
        RawFieldSet {
            invoice_id: vec!["2024001".to_string()],
            supplier_name: vec![supplier.to_string()],
            total_amount: vec![total.to_string()],
            invoice_date: vec!["28.2.2024".to_string()],
            due_date: vec!["13.3.2024".to_string()],
            note: vec!["konzultační služby".to_string()],
            ..RawFieldSet::default()
        }
    }

    #[test]
    fn test_normalize_basic_record() {
        let raw = raw_with("Novák Consulting s.r.o.", "50000,00");
        let record = normalize_record(&raw).unwrap();

        assert_eq!(record.invoice_id, "2024001");
        assert_eq!(record.total_amount, "50000.00");
        assert_eq!(record.transaction_type, TransactionType::Expense);
        assert_eq!(
            record.invoice_date,
            NaiveDate::from_ymd_opt(2024, 2, 28)
        );
        assert_eq!(record.category, "konzultační služby");
        // 28 Feb is month-end in a non-leap year
        assert!(record.is_month_end);
    }

    #[test]
    fn test_sentinel_supplier_is_income() {
        let raw = raw_with(SENTINEL_ORGANIZATION, "1000,00");
        let record = normalize_record(&raw).unwrap();
        assert_eq!(record.transaction_type, TransactionType::Income);
    }

    #[test]
    fn test_missing_fields_default() {
        let record = normalize_record(&RawFieldSet::default()).unwrap();
        assert_eq!(record.invoice_id, "");
        assert_eq!(record.total_amount, "");
        assert_eq!(record.invoice_date, None);
        assert_eq!(record.items_count, 0);
        assert!(!record.is_month_end);
    }

    #[test]
    fn test_unparsable_date_becomes_none() {
        let mut raw = raw_with("Firma", "100,00");
        raw.invoice_date = vec!["31.13.2024".to_string()];
        let record = normalize_record(&raw).unwrap();
        assert_eq!(record.invoice_date, None);
        assert!(!record.is_month_end);
    }

    #[test]
    fn test_amount_normalization_round_trip() {
        assert_eq!(normalize_amount("1 234,56"), "1234.56");
        assert!("1234.56".parse::<f64>().is_ok());
    }

    #[test]
    fn test_month_end_boundary_31_day_month() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        assert!(!is_month_end(day(28)));
        assert!(is_month_end(day(29)));
        assert!(is_month_end(day(30)));
        assert!(is_month_end(day(31)));
    }

    #[test]
    fn test_month_end_february_leap_and_non_leap() {
        // 2023 is not a leap year: 26..=28 qualify
        assert!(is_month_end(NaiveDate::from_ymd_opt(2023, 2, 26).unwrap()));
        assert!(!is_month_end(NaiveDate::from_ymd_opt(2023, 2, 25).unwrap()));
        // 2024 is: 27..=29 qualify
        assert!(is_month_end(NaiveDate::from_ymd_opt(2024, 2, 27).unwrap()));
        assert!(!is_month_end(NaiveDate::from_ymd_opt(2024, 2, 26).unwrap()));
    }
}
