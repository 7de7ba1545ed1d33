//! Regex patterns for the Czech invoice layout.
//!
//! The grammar is tied to one invoice template: labeled scalar fields,
//! a supplier/customer block each, an item span bounded by the note line
//! and the total line, and amounts in Czech format ("50 000,00 CZK").

use lazy_static::lazy_static;
use regex::Regex;

/// Currency marker that closes amounts and identifies item lines.
pub const CURRENCY_MARKER: &str = "CZK";

lazy_static! {
    // Labeled scalar fields
    pub static ref INVOICE_ID: Regex = Regex::new(
        r"Číslo faktury:\s*(\d+)"
    ).unwrap();

    pub static ref VARIABLE_SYMBOL: Regex = Regex::new(
        r"Variabilní symbol:\s*(\d+)"
    ).unwrap();

    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"Datum vystavení:\s*(\d{1,2}\.\d{1,2}\.\d{4})"
    ).unwrap();

    pub static ref DUE_DATE: Regex = Regex::new(
        r"Datum splatnosti:\s*(\d{1,2}\.\d{1,2}\.\d{4})"
    ).unwrap();

    // Note line, doubling as the invoice category
    pub static ref NOTE: Regex = Regex::new(
        r"Faktura za:\s*(.+)"
    ).unwrap();

    // Item span: everything between the note line and the total line
    pub static ref ITEMS_SPAN: Regex = Regex::new(
        r"(?s)Faktura za:.+?\n(.+?)Celkem:"
    ).unwrap();

    // Item lines are split into description/amount on runs of 2+ spaces
    pub static ref ITEM_COLUMN_SPLIT: Regex = Regex::new(
        r"\s{2,}"
    ).unwrap();

    // Party blocks: supplier runs until the customer label or a blank
    // line, customer until the variable-symbol label or a blank line
    pub static ref SUPPLIER_BLOCK: Regex = Regex::new(
        r"(?s)Dodavatel:(.+?)(?:Odběratel:|\n\n)"
    ).unwrap();

    pub static ref CUSTOMER_BLOCK: Regex = Regex::new(
        r"(?s)Odběratel:(.+?)(?:Variabilní symbol:|\n\n)"
    ).unwrap();

    // First non-blank line of a party block is the entity name
    pub static ref BLOCK_NAME: Regex = Regex::new(
        r"^\s*(.+?)\n"
    ).unwrap();

    pub static ref ICO: Regex = Regex::new(
        r"IČO:\s*(\d+)"
    ).unwrap();

    pub static ref DIC: Regex = Regex::new(
        r"DIČ:\s*(CZ\d+)"
    ).unwrap();

    pub static ref ACCOUNT: Regex = Regex::new(
        r"Č\. účtu:\s*([A-Z0-9/]+)"
    ).unwrap();

    // Total amount, digits with thousands spaces and a decimal comma
    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"Celkem:\s*([\d\s.,]+)\s*CZK"
    ).unwrap();
}
