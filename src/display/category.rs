//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::CategoryRule;

#[derive(Tabled)]
struct CategoryTableRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Keywords")]
    keywords: String,
}

/// Rules as a table in match order
pub fn format_category_list(rules: &[CategoryRule]) -> String {
    if rules.is_empty() {
        return "No categories found.\n\nAdd one with 'spendlens category add <NAME> -k <KEYWORD>'."
            .to_string();
    }

    let rows = rules.iter().enumerate().map(|(idx, rule)| CategoryTableRow {
        position: idx + 1,
        name: rule.name.clone(),
        keywords: if rule.keywords.is_empty() {
            "(none)".to_string()
        } else {
            rule.keywords.join(", ")
        },
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Format one rule
pub fn format_category_details(rule: &CategoryRule) -> String {
    let mut output = format!("Category: {}\n", rule.name);
    if rule.keywords.is_empty() {
        output.push_str("  Keywords: (none)\n");
    } else {
        output.push_str("  Keywords:\n");
        for keyword in &rule.keywords {
            output.push_str(&format!("    - {}\n", keyword));
        }
    }
    output
}
