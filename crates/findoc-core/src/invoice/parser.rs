//! Pure text-to-field-set parser for the Czech invoice layout.

use tracing::debug;

use super::rules::{extract_customer, extract_items, extract_supplier, labeled_rules};
use super::RawFieldSet;

/// Apply the full extraction grammar to invoice text.
///
/// Pure function: the same text always yields the same field set. Every
/// rule reads the same immutable input; a rule with no match contributes
/// an empty sequence rather than an error.
pub fn parse_invoice_text(text: &str) -> RawFieldSet {
    let mut fields = RawFieldSet::default();

    for rule in labeled_rules() {
        let values = rule.apply(text);
        match rule.field {
            "invoice_id" => fields.invoice_id = values,
            "variable_symbol" => fields.variable_symbol = values,
            "invoice_date" => fields.invoice_date = values,
            "due_date" => fields.due_date = values,
            "note" => fields.note = values,
            "total_amount" => fields.total_amount = values,
            other => debug!("unmapped extraction rule '{}'", other),
        }
    }

    fields.items = extract_items(text);

    let supplier = extract_supplier(text);
    fields.supplier_name = supplier.name;
    fields.supplier_ico = supplier.ico;
    fields.supplier_dic = supplier.dic;
    fields.supplier_account = supplier.account;

    let customer = extract_customer(text);
    fields.customer_name = customer.name;
    fields.customer_ico = customer.ico;
    fields.customer_dic = customer.dic;

    debug!(
        "parsed invoice text: {} items, supplier '{}'",
        fields.items.len(),
        fields.supplier_name.first().map(String::as_str).unwrap_or("")
    );

    fields
}
