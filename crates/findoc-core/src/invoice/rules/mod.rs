//! Rule-based field extraction for the Czech invoice layout.

pub mod items;
pub mod parties;
pub mod patterns;

pub use items::{extract_items, ParsedItem};
pub use parties::{extract_customer, extract_supplier, PartyFields};
pub use patterns::CURRENCY_MARKER;

use regex::Regex;

/// How many matches a labeled rule collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Every match in the document, in order.
    All,
    /// Only the first match.
    First,
}

/// A declarative extraction rule: field name, pattern, match arity, and a
/// post-processing step applied to each captured value.
///
/// Rules are independent: all read the same immutable input and none
/// depends on another's result, so application order does not matter.
pub struct LabeledRule {
    pub field: &'static str,
    pub pattern: &'static Regex,
    pub arity: Arity,
    pub post: fn(&str) -> String,
}

impl LabeledRule {
    /// Apply the rule to the text, returning all post-processed captures.
    ///
    /// A rule that finds nothing yields an empty vector; absence of a
    /// field is not a parse failure.
    pub fn apply(&self, text: &str) -> Vec<String> {
        let captures = self
            .pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| (self.post)(m.as_str()));

        match self.arity {
            Arity::All => captures.collect(),
            Arity::First => captures.take(1).collect(),
        }
    }
}

fn keep(value: &str) -> String {
    value.to_string()
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

fn despaced(value: &str) -> String {
    value.replace(' ', "")
}

/// The labeled-field grammar. Party blocks and item extraction have their
/// own span-bounded rules in [`parties`] and [`items`].
pub fn labeled_rules() -> [LabeledRule; 6] {
    [
        LabeledRule {
            field: "invoice_id",
            pattern: &patterns::INVOICE_ID,
            arity: Arity::All,
            post: keep,
        },
        LabeledRule {
            field: "variable_symbol",
            pattern: &patterns::VARIABLE_SYMBOL,
            arity: Arity::All,
            post: keep,
        },
        LabeledRule {
            field: "invoice_date",
            pattern: &patterns::INVOICE_DATE,
            arity: Arity::All,
            post: keep,
        },
        LabeledRule {
            field: "due_date",
            pattern: &patterns::DUE_DATE,
            arity: Arity::All,
            post: keep,
        },
        LabeledRule {
            field: "note",
            pattern: &patterns::NOTE,
            arity: Arity::First,
            post: trimmed,
        },
        LabeledRule {
            field: "total_amount",
            pattern: &patterns::TOTAL_AMOUNT,
            arity: Arity::First,
            post: despaced,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labeled_rule_no_match_is_empty() {
        for rule in labeled_rules() {
            assert_eq!(rule.apply("nothing relevant here"), Vec::<String>::new());
        }
    }

    #[test]
    fn test_first_arity_takes_one() {
        let text = "Faktura za: konzultace\nFaktura za: školení\n";
        let rule = labeled_rules()
            .into_iter()
            .find(|r| r.field == "note")
            .unwrap();
        assert_eq!(rule.apply(text), vec!["konzultace".to_string()]);
    }

    #[test]
    fn test_total_amount_strips_spaces() {
        let rule = labeled_rules()
            .into_iter()
            .find(|r| r.field == "total_amount")
            .unwrap();
        assert_eq!(rule.apply("Celkem: 50 000,00 CZK"), vec!["50000,00"]);
    }
}
