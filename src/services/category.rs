//! Category service
//!
//! Edits to category keyword rules. Every successful edit is written to
//! categories.json immediately and recorded in the audit log.

use crate::audit::EntityType;
use crate::error::SpendResult;
use crate::models::CategoryRule;
use crate::storage::Storage;

/// Service for category rule management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All rules in match order
    pub fn list_categories(&self) -> SpendResult<Vec<CategoryRule>> {
        self.storage.categories.list_categories()
    }

    /// Get a rule by name (case-insensitive)
    pub fn get_category(&self, name: &str) -> SpendResult<Option<CategoryRule>> {
        self.storage.categories.get(name)
    }

    /// Create a category at the end of the match order
    pub fn add_category<I, S>(&self, name: &str, keywords: I) -> SpendResult<CategoryRule>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rule = self.storage.categories.add_category(name, keywords)?;
        self.storage.categories.save()?;

        self.storage
            .log_create(EntityType::Category, rule.name.clone(), &rule)?;
        tracing::info!(category = %rule.name, keywords = rule.keywords.len(), "added category");

        Ok(rule)
    }

    /// Replace the keyword set of a category
    pub fn update_keywords<I, S>(&self, name: &str, keywords: I) -> SpendResult<CategoryRule>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (before, after) = self.storage.categories.update_keywords(name, keywords)?;
        self.finish_update(before, after)
    }

    /// Add one keyword to a category
    pub fn add_keyword(&self, name: &str, keyword: &str) -> SpendResult<CategoryRule> {
        let (before, after) = self.storage.categories.add_keyword(name, keyword)?;
        self.finish_update(before, after)
    }

    /// Remove one keyword from a category
    pub fn remove_keyword(&self, name: &str, keyword: &str) -> SpendResult<CategoryRule> {
        let (before, after) = self.storage.categories.remove_keyword(name, keyword)?;
        self.finish_update(before, after)
    }

    /// Delete a category
    ///
    /// Budgets recorded under the name are kept.
    pub fn remove_category(&self, name: &str) -> SpendResult<CategoryRule> {
        let removed = self.storage.categories.remove_category(name)?;
        self.storage.categories.save()?;

        self.storage
            .log_delete(EntityType::Category, removed.name.clone(), &removed)?;
        tracing::info!(category = %removed.name, "removed category");

        Ok(removed)
    }

    fn finish_update(&self, before: CategoryRule, after: CategoryRule) -> SpendResult<CategoryRule> {
        self.storage.categories.save()?;

        let diff = keyword_diff(&before.keywords, &after.keywords);
        self.storage.log_update(
            EntityType::Category,
            after.name.clone(),
            &before,
            &after,
            diff,
        )?;
        tracing::info!(category = %after.name, keywords = after.keywords.len(), "updated category");

        Ok(after)
    }
}

/// Summarise a keyword change as "keywords: +added -removed"
fn keyword_diff(before: &[String], after: &[String]) -> Option<String> {
    let added = after.iter().filter(|k| !before.contains(k)).map(|k| format!("+{}", k));
    let removed = before.iter().filter(|k| !after.contains(k)).map(|k| format!("-{}", k));
    let changes: Vec<String> = added.chain(removed).collect();

    if changes.is_empty() {
        None
    } else {
        Some(format!("keywords: {}", changes.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::SpendPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SpendPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_add_category_persists_immediately() {
        let (temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.add_category("Groceries", ["Walmart", "kroger"]).unwrap();

        let contents =
            std::fs::read_to_string(temp_dir.path().join("data").join("categories.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["Groceries"], serde_json::json!(["walmart", "kroger"]));
    }

    #[test]
    fn test_duplicate_add_is_rejected_without_write() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.add_category("Dining", ["swiggy"]).unwrap();
        let err = service.add_category("DINING", ["zomato"]).unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(service.list_categories().unwrap().len(), 1);
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_keyword_edits_are_audited() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.add_category("Dining", ["swiggy"]).unwrap();
        service.add_keyword("Dining", "zomato").unwrap();
        service.remove_keyword("dining", "swiggy").unwrap();
        let rule = service.update_keywords("Dining", ["eatfit"]).unwrap();
        assert_eq!(rule.keywords, vec!["eatfit"]);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[1].operation, Operation::Update);
        assert_eq!(entries[1].diff_summary.as_deref(), Some("keywords: +zomato"));
        assert_eq!(entries[2].diff_summary.as_deref(), Some("keywords: -swiggy"));
        assert_eq!(
            entries[3].diff_summary.as_deref(),
            Some("keywords: +eatfit -zomato")
        );
    }

    #[test]
    fn test_remove_category_round_trip() {
        let (temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.add_category("Travel", ["uber"]).unwrap();
        service.add_category("Rent", ["landlord"]).unwrap();
        let removed = service.remove_category("travel").unwrap();
        assert_eq!(removed.name, "Travel");

        let paths = SpendPaths::with_base_dir(temp_dir.path().to_path_buf());
        let reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();

        let names: Vec<_> = CategoryService::new(&reopened)
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Rent"]);
    }

    #[test]
    fn test_keyword_diff() {
        let before = vec!["a".to_string(), "b".to_string()];
        let after = vec!["b".to_string(), "c".to_string()];
        assert_eq!(keyword_diff(&before, &after), Some("keywords: +c -a".into()));
        assert_eq!(keyword_diff(&before, &before), None);
    }
}
