//! Category keyword rules
//!
//! A category is a user-defined label with a set of keywords. A transaction
//! belongs to the first category whose keywords appear anywhere in its
//! description (case-insensitive).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category assigned when no rule matches
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Maximum length of a category name
const MAX_NAME_LEN: usize = 50;

/// A category and the keywords that select it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Unique category name
    pub name: String,

    /// Lowercase substring patterns, in the order the user entered them
    pub keywords: Vec<String>,
}

impl CategoryRule {
    /// Create a rule, normalising its keywords
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name: String = name.into();
        Self {
            name: name.trim().to_string(),
            keywords: normalize_keywords(keywords),
        }
    }

    /// Whether any keyword occurs in an already-lowercased description
    pub fn matches_lowercase(&self, description_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| description_lower.contains(keyword.as_str()))
    }

    /// Whether this rule matches a description (case-insensitive)
    pub fn matches(&self, description: &str) -> bool {
        self.matches_lowercase(&description.to_lowercase())
    }

    /// Whether a keyword (after normalisation) is already present
    pub fn has_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        self.keywords.iter().any(|k| *k == keyword)
    }

    /// Case-insensitive name comparison
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }

    /// Validate the rule
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        validate_name(&self.name)
    }
}

impl fmt::Display for CategoryRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Trim, lowercase, drop empties and duplicates (first occurrence wins)
pub fn normalize_keywords<I, S>(keywords: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for keyword in keywords {
        let keyword = keyword.as_ref().trim().to_lowercase();
        if !keyword.is_empty() && !normalized.contains(&keyword) {
            normalized.push(keyword);
        }
    }
    normalized
}

/// Whether a name is the reserved fallback category
pub fn is_reserved_name(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(UNCATEGORIZED)
}

/// Validate a category name for creation
pub fn validate_name(name: &str) -> Result<(), CategoryValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CategoryValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CategoryValidationError::NameTooLong(name.chars().count()));
    }
    Ok(())
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    ReservedName,
    EmptyKeyword,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Category name too long ({} chars, max {})",
                len, MAX_NAME_LEN
            ),
            Self::ReservedName => write!(f, "'{}' is reserved", UNCATEGORIZED),
            Self::EmptyKeyword => write!(f, "Keyword cannot be empty"),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_keywords() {
        let rule = CategoryRule::new(" Groceries ", ["Walmart", " KROGER", "walmart", ""]);
        assert_eq!(rule.name, "Groceries");
        assert_eq!(rule.keywords, vec!["walmart", "kroger"]);
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let rule = CategoryRule::new("Groceries", ["mart"]);
        assert!(rule.matches("WALMART SUPERCENTER"));
        assert!(rule.matches("k-mart #123"));
        assert!(!rule.matches("PAYROLL DEPOSIT"));
    }

    #[test]
    fn test_empty_rule_never_matches() {
        let rule = CategoryRule::new(UNCATEGORIZED, Vec::<String>::new());
        assert!(!rule.matches("anything"));
    }

    #[test]
    fn test_has_keyword() {
        let rule = CategoryRule::new("Dining", ["swiggy"]);
        assert!(rule.has_keyword(" SWIGGY "));
        assert!(!rule.has_keyword("zomato"));
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  "), Err(CategoryValidationError::EmptyName));
        assert!(matches!(
            validate_name(&"x".repeat(51)),
            Err(CategoryValidationError::NameTooLong(51))
        ));
        assert!(validate_name("Rent").is_ok());
    }

    #[test]
    fn test_reserved_name() {
        assert!(is_reserved_name("uncategorized"));
        assert!(is_reserved_name(" Uncategorized"));
        assert!(!is_reserved_name("Groceries"));
    }
}
