//! Invoice field extraction: parsing grammar and record normalization.

mod normalize;
mod parser;
pub mod rules;

pub use normalize::{is_month_end, normalize_amount, normalize_record, parse_czech_date};
pub use parser::parse_invoice_text;
pub use rules::{ParsedItem, CURRENCY_MARKER};

/// Output of the field parser: every field is an ordered sequence of
/// matched strings, never a single scalar, with absent fields empty.
/// Consumed immediately by the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFieldSet {
    pub invoice_id: Vec<String>,
    pub variable_symbol: Vec<String>,
    pub invoice_date: Vec<String>,
    pub due_date: Vec<String>,
    pub note: Vec<String>,
    pub items: Vec<ParsedItem>,
    pub supplier_name: Vec<String>,
    pub supplier_ico: Vec<String>,
    pub supplier_dic: Vec<String>,
    pub supplier_account: Vec<String>,
    pub customer_name: Vec<String>,
    pub customer_ico: Vec<String>,
    pub customer_dic: Vec<String>,
    pub total_amount: Vec<String>,
}
