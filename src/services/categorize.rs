//! Keyword categorization
//!
//! Rules are scanned in store order and the first rule with a keyword
//! contained in the lowercased description wins. A stored "Uncategorized"
//! entry is the fallback itself and is never matched against.

use crate::models::category::is_reserved_name;
use crate::models::{CategorizedTransaction, CategoryRule, Transaction, UNCATEGORIZED};

/// Name of the first rule matching `description`, or "Uncategorized"
pub fn categorize_description<'r>(description: &str, rules: &'r [CategoryRule]) -> &'r str {
    let lower = description.to_lowercase();
    rules
        .iter()
        .filter(|rule| !is_reserved_name(&rule.name))
        .find(|rule| rule.matches_lowercase(&lower))
        .map(|rule| rule.name.as_str())
        .unwrap_or(UNCATEGORIZED)
}

/// Assign every transaction to exactly one category
pub fn categorize(transactions: &[Transaction], rules: &[CategoryRule]) -> Vec<CategorizedTransaction> {
    transactions
        .iter()
        .map(|txn| {
            let category = categorize_description(&txn.description, rules);
            CategorizedTransaction::new(txn.clone(), category)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;

    fn txn(row: usize, description: &str, cents: i64) -> Transaction {
        Transaction::from_signed(
            row,
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            description,
            Money::from_cents(cents),
        )
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let groceries_first = vec![
            CategoryRule::new("Groceries", ["mart"]),
            CategoryRule::new("Shopping", ["walmart"]),
        ];
        assert_eq!(
            categorize_description("WALMART SUPERCENTER", &groceries_first),
            "Groceries"
        );

        let shopping_first = vec![
            CategoryRule::new("Shopping", ["walmart"]),
            CategoryRule::new("Groceries", ["mart"]),
        ];
        assert_eq!(
            categorize_description("WALMART SUPERCENTER", &shopping_first),
            "Shopping"
        );
    }

    #[test]
    fn test_no_match_is_uncategorized() {
        let rules = vec![CategoryRule::new("Dining", ["swiggy"])];
        assert_eq!(categorize_description("PAYCHECK", &rules), UNCATEGORIZED);
        assert_eq!(categorize_description("anything", &[]), UNCATEGORIZED);
    }

    #[test]
    fn test_empty_keyword_list_never_matches() {
        let rules = vec![
            CategoryRule::new("Uncategorized", Vec::<String>::new()),
            CategoryRule::new("Misc", Vec::<String>::new()),
        ];
        assert_eq!(categorize_description("anything", &rules), UNCATEGORIZED);
    }

    #[test]
    fn test_stored_uncategorized_keywords_ignored() {
        let rules = vec![
            CategoryRule::new("Uncategorized", ["mart"]),
            CategoryRule::new("Groceries", ["walmart"]),
        ];
        assert_eq!(
            categorize_description("WALMART SUPERCENTER", &rules),
            "Groceries"
        );
        assert_eq!(categorize_description("KMART", &rules), UNCATEGORIZED);
    }

    #[test]
    fn test_categorize_keeps_order_and_count() {
        let rules = vec![CategoryRule::new("Groceries", ["walmart"])];
        let transactions = vec![
            txn(1, "WALMART #123", -5230),
            txn(2, "PAYCHECK", 200000),
            txn(3, "walmart.com", -1000),
        ];

        let categorized = categorize(&transactions, &rules);
        let categories: Vec<_> = categorized.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec!["Groceries", "Uncategorized", "Groceries"]);
        assert_eq!(categorized[1].transaction, transactions[1]);
    }

    #[test]
    fn test_categorize_is_deterministic() {
        let rules = vec![
            CategoryRule::new("Dining", ["swiggy", "zomato"]),
            CategoryRule::new("Travel", ["uber", "ola"]),
        ];
        let transactions = vec![
            txn(1, "UBER TRIP", -300),
            txn(2, "ZOMATO ORDER", -450),
            txn(3, "COLA STORE", -90),
        ];

        assert_eq!(categorize(&transactions, &rules), categorize(&transactions, &rules));
    }
}
