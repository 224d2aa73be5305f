//! Category rule repository for JSON storage
//!
//! Manages loading and saving keyword rules to categories.json. The file is
//! a JSON object mapping category name to its keyword list; object order is
//! rule order, which decides ties during categorization.

use std::fmt;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SpendError;
use crate::models::category::{is_reserved_name, normalize_keywords};
use crate::models::{CategoryRule, UNCATEGORIZED};

use super::file_io::{read_json, write_json_atomic};
use super::store_write_error;

/// On-disk shape of categories.json, order preserving
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryData(pub Vec<CategoryRule>);

impl Serialize for CategoryData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for rule in &self.0 {
            map.serialize_entry(&rule.name, &rule.keywords)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CategoryDataVisitor;

        impl<'de> Visitor<'de> for CategoryDataVisitor {
            type Value = CategoryData;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category name to keyword list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut rules: Vec<CategoryRule> = Vec::new();
                while let Some((name, keywords)) = access.next_entry::<String, Vec<String>>()? {
                    if rules.iter().any(|r| r.name_matches(&name)) {
                        tracing::warn!(category = %name, "ignoring duplicate category in store file");
                        continue;
                    }
                    rules.push(CategoryRule::new(name, keywords));
                }
                Ok(CategoryData(rules))
            }
        }

        deserializer.deserialize_map(CategoryDataVisitor)
    }
}

/// Repository for category rule persistence
pub struct CategoryRepository {
    path: PathBuf,
    rules: RwLock<Vec<CategoryRule>>,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            rules: RwLock::new(Vec::new()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load rules from disk, replacing the in-memory state
    pub fn load(&self) -> Result<(), SpendError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut rules = self
            .rules
            .write()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        *rules = file_data.0;
        tracing::debug!(count = rules.len(), path = %self.path.display(), "loaded category rules");
        Ok(())
    }

    /// Overwrite the file with the current in-memory rules
    ///
    /// On failure the in-memory rules are untouched so the caller can retry.
    pub fn save(&self) -> Result<(), SpendError> {
        let rules = self
            .rules
            .read()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = CategoryData(rules.clone());
        write_json_atomic(&self.path, &file_data).map_err(|e| store_write_error("category", e))
    }

    /// All rules in match order
    pub fn list_categories(&self) -> Result<Vec<CategoryRule>, SpendError> {
        let rules = self
            .rules
            .read()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(rules.clone())
    }

    /// Get a rule by name (case-insensitive)
    pub fn get(&self, name: &str) -> Result<Option<CategoryRule>, SpendError> {
        let rules = self
            .rules
            .read()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(rules.iter().find(|r| r.name_matches(name)).cloned())
    }

    /// Append a new category at the end of the match order
    pub fn add_category<I, S>(&self, name: &str, keywords: I) -> Result<CategoryRule, SpendError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rule = CategoryRule::new(name, keywords);
        rule.validate()
            .map_err(|e| SpendError::Validation(e.to_string()))?;
        if is_reserved_name(&rule.name) {
            return Err(SpendError::Validation(format!(
                "'{}' is assigned automatically and cannot be created",
                rule.name
            )));
        }

        let mut rules = self
            .rules
            .write()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if rules.iter().any(|r| r.name_matches(&rule.name)) {
            return Err(SpendError::duplicate_category(&rule.name));
        }

        rules.push(rule.clone());
        Ok(rule)
    }

    /// Replace the full keyword set of a category
    ///
    /// Returns the rule before and after the change.
    pub fn update_keywords<I, S>(
        &self,
        name: &str,
        keywords: I,
    ) -> Result<(CategoryRule, CategoryRule), SpendError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = normalize_keywords(keywords);
        self.modify(name, |rule| {
            rule.keywords = keywords;
            Ok(())
        })
    }

    /// Append one keyword to a category
    pub fn add_keyword(
        &self,
        name: &str,
        keyword: &str,
    ) -> Result<(CategoryRule, CategoryRule), SpendError> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return Err(SpendError::Validation("Keyword cannot be empty".into()));
        }

        self.modify(name, |rule| {
            if rule.has_keyword(&keyword) {
                return Err(SpendError::Duplicate {
                    entity_type: "Keyword",
                    identifier: format!("{} in {}", keyword, rule.name),
                });
            }
            rule.keywords.push(keyword);
            Ok(())
        })
    }

    /// Remove one keyword from a category
    pub fn remove_keyword(
        &self,
        name: &str,
        keyword: &str,
    ) -> Result<(CategoryRule, CategoryRule), SpendError> {
        let keyword = keyword.trim().to_lowercase();

        self.modify(name, |rule| {
            let before = rule.keywords.len();
            rule.keywords.retain(|k| *k != keyword);
            if rule.keywords.len() == before {
                return Err(SpendError::NotFound {
                    entity_type: "Keyword",
                    identifier: format!("{} in {}", keyword, rule.name),
                });
            }
            Ok(())
        })
    }

    /// Remove a category; its budgets are left in place
    pub fn remove_category(&self, name: &str) -> Result<CategoryRule, SpendError> {
        let mut rules = self
            .rules
            .write()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let index = rules
            .iter()
            .position(|r| r.name_matches(name))
            .ok_or_else(|| SpendError::category_not_found(name))?;

        Ok(rules.remove(index))
    }

    /// Count categories
    pub fn count(&self) -> Result<usize, SpendError> {
        let rules = self
            .rules
            .read()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(rules.len())
    }

    /// Apply an edit to one rule in place; the rule is unchanged if `edit` fails
    fn modify<F>(&self, name: &str, edit: F) -> Result<(CategoryRule, CategoryRule), SpendError>
    where
        F: FnOnce(&mut CategoryRule) -> Result<(), SpendError>,
    {
        if is_reserved_name(name) {
            return Err(SpendError::Validation(format!(
                "'{}' is assigned automatically and its keywords cannot be edited",
                UNCATEGORIZED
            )));
        }

        let mut rules = self
            .rules
            .write()
            .map_err(|e| SpendError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let rule = rules
            .iter_mut()
            .find(|r| r.name_matches(name))
            .ok_or_else(|| SpendError::category_not_found(name))?;

        let before = rule.clone();
        let mut updated = rule.clone();
        edit(&mut updated)?;
        *rule = updated.clone();

        Ok((before, updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        let repo = CategoryRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_category("Rent", ["landlord"]).unwrap();
        repo.add_category("Groceries", ["mart"]).unwrap();
        repo.add_category("Dining", ["walmart cafe"]).unwrap();

        let names: Vec<_> = repo
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Rent", "Groceries", "Dining"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_category("Groceries", ["mart"]).unwrap();

        let err = repo.add_category("groceries", ["kroger"]).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_reserved_and_empty_names_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        assert!(repo
            .add_category("Uncategorized", ["x"])
            .unwrap_err()
            .is_validation());
        assert!(repo
            .add_category("  ", ["x"])
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_update_keywords_replaces_set() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_category("Groceries", ["mart", "kroger"]).unwrap();

        let (before, after) = repo.update_keywords("GROCERIES", ["Aldi"]).unwrap();
        assert_eq!(before.keywords, vec!["mart", "kroger"]);
        assert_eq!(after.keywords, vec!["aldi"]);
        assert_eq!(repo.get("groceries").unwrap().unwrap().keywords, vec!["aldi"]);
    }

    #[test]
    fn test_add_and_remove_keyword() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_category("Dining", ["swiggy"]).unwrap();

        repo.add_keyword("Dining", " Zomato ").unwrap();
        assert_eq!(
            repo.get("Dining").unwrap().unwrap().keywords,
            vec!["swiggy", "zomato"]
        );

        assert!(repo.add_keyword("Dining", "ZOMATO").unwrap_err().is_duplicate());
        assert!(repo.add_keyword("Dining", " ").unwrap_err().is_validation());

        repo.remove_keyword("Dining", "swiggy").unwrap();
        assert_eq!(repo.get("Dining").unwrap().unwrap().keywords, vec!["zomato"]);
        assert!(repo.remove_keyword("Dining", "swiggy").unwrap_err().is_not_found());
    }

    #[test]
    fn test_remove_category() {
        let (_temp_dir, repo) = create_test_repo();
        repo.add_category("Travel", ["uber"]).unwrap();

        let removed = repo.remove_category("travel").unwrap();
        assert_eq!(removed.name, "Travel");
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.remove_category("Travel").unwrap_err().is_not_found());
    }

    #[test]
    fn test_edit_missing_category() {
        let (_temp_dir, repo) = create_test_repo();
        assert!(repo.update_keywords("Nope", ["x"]).unwrap_err().is_not_found());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let (temp_dir, repo) = create_test_repo();
        repo.add_category("Groceries", ["walmart", "kroger"]).unwrap();
        repo.add_category("Dining", ["swiggy"]).unwrap();
        repo.add_category("Misc", Vec::<String>::new()).unwrap();
        repo.save().unwrap();

        let repo2 = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo2.load().unwrap();

        assert_eq!(repo2.list_categories().unwrap(), repo.list_categories().unwrap());
    }

    #[test]
    fn test_file_format_is_ordered_map() {
        let (temp_dir, repo) = create_test_repo();
        repo.add_category("Zeta", ["z"]).unwrap();
        repo.add_category("Alpha", ["a"]).unwrap();
        repo.save().unwrap();

        let contents = std::fs::read_to_string(temp_dir.path().join("categories.json")).unwrap();
        let zeta = contents.find("Zeta").unwrap();
        let alpha = contents.find("Alpha").unwrap();
        assert!(zeta < alpha);

        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["Zeta"], serde_json::json!(["z"]));
    }

    #[test]
    fn test_loads_hand_written_file() {
        let (temp_dir, repo) = create_test_repo();
        std::fs::write(
            temp_dir.path().join("categories.json"),
            r#"{"Uncategorized": [], "Food": ["Swiggy", "Zomato"], "food": ["dup"]}"#,
        )
        .unwrap();

        repo.load().unwrap();
        let rules = repo.list_categories().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name, "Uncategorized");
        assert_eq!(rules[1].keywords, vec!["swiggy", "zomato"]);
    }

    #[test]
    fn test_stored_uncategorized_keywords_not_editable() {
        let (temp_dir, repo) = create_test_repo();
        std::fs::write(
            temp_dir.path().join("categories.json"),
            r#"{"Uncategorized": [], "Groceries": ["walmart"]}"#,
        )
        .unwrap();
        repo.load().unwrap();

        assert!(repo.add_keyword("Uncategorized", "mart").unwrap_err().is_validation());
        assert!(repo
            .update_keywords("uncategorized", ["mart"])
            .unwrap_err()
            .is_validation());
        assert!(repo
            .remove_keyword("Uncategorized", "mart")
            .unwrap_err()
            .is_validation());

        let stored = repo.get("Uncategorized").unwrap().unwrap();
        assert!(stored.keywords.is_empty());

        repo.remove_category("Uncategorized").unwrap();
        assert_eq!(repo.count().unwrap(), 1);
    }
}
