use serde::{Deserialize, Serialize};

/// An expense category. The set of categories is fixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

const CATEGORIES: [(&str, &str); 5] = [
    ("food", "Food"),
    ("transport", "Transport"),
    ("utilities", "Utilities"),
    ("entertainment", "Entertainment"),
    ("other", "Other"),
];

pub fn categories() -> Vec<Category> {
    CATEGORIES
        .iter()
        .map(|(id, name)| Category::new(*id, *name))
        .collect()
}

pub fn find_category(id: &str) -> Option<Category> {
    CATEGORIES
        .iter()
        .find(|(cid, _)| *cid == id)
        .map(|(id, name)| Category::new(*id, *name))
}

/// Display name for a category id, falling back to the raw id for
/// categories that are not part of the fixed set.
pub fn category_name(id: &str) -> String {
    find_category(id)
        .map(|c| c.name)
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_fixed() {
        let ids: Vec<String> = categories().into_iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            vec!["food", "transport", "utilities", "entertainment", "other"]
        );
    }

    #[test]
    fn test_find_category_is_exact() {
        assert_eq!(find_category("food").map(|c| c.name), Some("Food".into()));
        assert!(find_category("Food").is_none());
        assert!(find_category("rent").is_none());
    }

    #[test]
    fn test_category_name_fallback() {
        assert_eq!(category_name("utilities"), "Utilities");
        assert_eq!(category_name("legacy"), "legacy");
    }
}
