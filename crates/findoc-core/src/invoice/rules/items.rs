//! Line item extraction from the bounded item span.

use serde::{Deserialize, Serialize};

use super::patterns::{CURRENCY_MARKER, ITEMS_SPAN, ITEM_COLUMN_SPLIT};

/// One invoice line item: free-text description and an amount string that
/// always ends with the currency marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedItem {
    pub description: String,
    pub amount: String,
}

/// Extract line items from the span between the note line and the total
/// line. If that marker pair is absent the whole step is skipped and no
/// items are returned.
///
/// Within the span, each non-empty line containing the currency marker is
/// split on runs of 2+ spaces into description and amount columns.
pub fn extract_items(text: &str) -> Vec<ParsedItem> {
    let span = match ITEMS_SPAN.captures(text) {
        Some(caps) => match caps.get(1) {
            Some(m) => m.as_str(),
            None => return Vec::new(),
        },
        None => return Vec::new(),
    };

    let mut items = Vec::new();

    for line in span.lines() {
        let line = line.trim();
        if line.is_empty() || !line.contains(CURRENCY_MARKER) {
            continue;
        }

        let parts: Vec<&str> = ITEM_COLUMN_SPLIT.split(line).collect();
        if parts.len() < 2 {
            continue;
        }

        let mut amount = parts[parts.len() - 1].replace(' ', "");
        if !amount.ends_with(CURRENCY_MARKER) {
            amount.push_str(CURRENCY_MARKER);
        }

        let description = parts[..parts.len() - 1].join(" ").trim().to_string();

        items.push(ParsedItem {
            description,
            amount,
        });
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const INVOICE: &str = "Faktura za: konzultační služby\n\
        Analýza systému        12 000,00 CZK\n\
        Implementace           38 000,00 CZK\n\
        Celkem: 50 000,00 CZK\n";

    #[test]
    fn test_extract_items() {
        let items = extract_items(INVOICE);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "Analýza systému");
        assert_eq!(items[0].amount, "12000,00CZK");
        assert_eq!(items[1].description, "Implementace");
        assert_eq!(items[1].amount, "38000,00CZK");
    }

    #[test]
    fn test_missing_markers_yield_no_items() {
        assert!(extract_items("Analýza systému    12 000,00 CZK\n").is_empty());
        assert!(extract_items("Faktura za: služby\nbez celkové částky\n").is_empty());
    }

    #[test]
    fn test_lines_without_currency_are_skipped() {
        let text = "Faktura za: služby\n\
            poznámka bez částky\n\
            Položka        1 000,00 CZK\n\
            Celkem: 1 000,00 CZK\n";
        let items = extract_items(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Položka");
    }

    #[test]
    fn test_amount_marker_appended_when_split_off() {
        // Column split can separate the amount from its currency marker;
        // the marker is re-attached so amounts stay uniform.
        let text = "Faktura za: služby\n\
            Položka        1 000,00    CZK\n\
            Celkem: 1 000,00 CZK\n";
        let items = extract_items(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].amount, "CZK");
    }
}
