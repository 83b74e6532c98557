//! Category list service.

use std::sync::Arc;

use log::debug;

use crate::errors::{Result, ValidationError};
use crate::store::EntityRepository;

use super::categories_model::contains_category;

/// Manages the user-extensible spending category list. The list is
/// append-only and de-duplicated case-insensitively.
pub struct CategoryService {
    repository: Arc<EntityRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<EntityRepository>) -> Self {
        CategoryService { repository }
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.repository.get_categories()
    }

    /// Appends a category. Blank input is rejected; an existing category
    /// (compared case-insensitively, trimmed) is a no-op.
    pub fn add(&self, name: &str) -> Result<Vec<String>> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField("category".to_string()).into());
        }
        let mut categories = self.repository.get_categories()?;
        if contains_category(&categories, trimmed) {
            return Ok(categories);
        }
        categories.push(trimmed.to_string());
        self.repository.set_categories(&categories)?;
        debug!("added category '{trimmed}'");
        Ok(categories)
    }
}
