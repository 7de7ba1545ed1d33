//! Supplier and customer block extraction.

use regex::Regex;

use super::patterns::{ACCOUNT, BLOCK_NAME, CUSTOMER_BLOCK, DIC, ICO, SUPPLIER_BLOCK};

/// Fields extracted from one party block. Each field keeps every match in
/// order; absent fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyFields {
    pub name: Vec<String>,
    pub ico: Vec<String>,
    pub dic: Vec<String>,
    pub account: Vec<String>,
}

/// Extract supplier identity from the block between the "Dodavatel:"
/// label and the customer label or a blank line.
pub fn extract_supplier(text: &str) -> PartyFields {
    block_of(text, &SUPPLIER_BLOCK)
        .map(|block| extract_fields(block, true))
        .unwrap_or_default()
}

/// Extract customer identity from the block between the "Odběratel:"
/// label and the variable-symbol label or a blank line.
pub fn extract_customer(text: &str) -> PartyFields {
    block_of(text, &CUSTOMER_BLOCK)
        .map(|block| extract_fields(block, false))
        .unwrap_or_default()
}

fn block_of<'t>(text: &'t str, pattern: &Regex) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn extract_fields(block: &str, with_account: bool) -> PartyFields {
    let mut fields = PartyFields::default();

    // Entity name is the first non-blank line of the block
    if let Some(caps) = BLOCK_NAME.captures(block) {
        if let Some(name) = caps.get(1) {
            fields.name.push(name.as_str().trim().to_string());
        }
    }

    fields.ico = all_captures(block, &ICO);
    fields.dic = all_captures(block, &DIC);
    if with_account {
        fields.account = all_captures(block, &ACCOUNT);
    }

    fields
}

fn all_captures(text: &str, pattern: &Regex) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INVOICE: &str = "Dodavatel:\n\
        Novák Consulting s.r.o.\n\
        IČO: 12345678\n\
        DIČ: CZ12345678\n\
        Č. účtu: 123456789/0100\n\
        Odběratel:\n\
        FinDoc AI\n\
        IČO: 87654321\n\
        DIČ: CZ87654321\n\
        Variabilní symbol: 20240042\n";

    #[test]
    fn test_extract_supplier() {
        let supplier = extract_supplier(INVOICE);
        assert_eq!(supplier.name, vec!["Novák Consulting s.r.o."]);
        assert_eq!(supplier.ico, vec!["12345678"]);
        assert_eq!(supplier.dic, vec!["CZ12345678"]);
        assert_eq!(supplier.account, vec!["123456789/0100"]);
    }

    #[test]
    fn test_extract_customer() {
        let customer = extract_customer(INVOICE);
        assert_eq!(customer.name, vec!["FinDoc AI"]);
        assert_eq!(customer.ico, vec!["87654321"]);
        assert_eq!(customer.dic, vec!["CZ87654321"]);
        assert!(customer.account.is_empty());
    }

    #[test]
    fn test_block_bounded_by_blank_line() {
        let text = "Dodavatel:\n\
            Acme s.r.o.\n\
            IČO: 11111111\n\
            \n\
            IČO: 99999999\n";
        let supplier = extract_supplier(text);
        assert_eq!(supplier.ico, vec!["11111111"]);
    }

    #[test]
    fn test_missing_blocks_yield_empty_fields() {
        let fields = extract_supplier("no party labels here\n");
        assert_eq!(fields, PartyFields::default());
    }
}
