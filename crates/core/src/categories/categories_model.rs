//! Spending category list.

use serde_json::Value;

use crate::constants::DEFAULT_CATEGORIES;

/// Coerces a stored category list. Entries are trimmed; blanks and
/// case-insensitive duplicates are dropped, first occurrence wins. An empty
/// or missing list falls back to the seeded defaults.
pub(crate) fn sanitize_categories(records: &[Value]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for record in records {
        if let Some(raw) = record.as_str() {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !contains_category(&categories, trimmed) {
                categories.push(trimmed.to_string());
            }
        }
    }
    if categories.is_empty() {
        return default_categories();
    }
    categories
}

pub(crate) fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

pub(crate) fn contains_category(categories: &[String], candidate: &str) -> bool {
    categories
        .iter()
        .any(|c| c.eq_ignore_ascii_case(candidate.trim()))
}
