//! Category labels available in a project.

use std::path::PathBuf;

use crate::error::{LedgerError, Result};
use crate::naming::normalize_name;
use crate::paths::ProjectLayout;
use crate::store::{self, StoreError};

pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "Model",
    "Shading",
    "Rig",
    "Layout",
    "Animation",
    "Render",
    "Other",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    path: PathBuf,
    categories: Vec<String>,
}

impl CategoryRegistry {
    /// Read the registry; a missing file yields [`DEFAULT_CATEGORIES`].
    pub fn load(layout: &ProjectLayout) -> Result<Self> {
        let path = layout.categories_file();
        let categories = match store::load::<Vec<String>>(&path) {
            Ok(categories) => categories,
            Err(StoreError::NotFound { .. }) => {
                DEFAULT_CATEGORIES.map(String::from).into()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, categories })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn require(&self, category: &str) -> Result<()> {
        if self.contains(category) {
            Ok(())
        } else {
            Err(LedgerError::UnknownCategory(category.to_string()))
        }
    }

    pub fn add(&mut self, category: &str) -> Result<()> {
        let category = normalize_name(category)?;
        if self
            .categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&category))
        {
            return Err(LedgerError::AlreadyExists {
                what: "category",
                name: category,
            });
        }
        self.categories.push(category.clone());
        self.save()?;
        tracing::info!(%category, "added category");
        Ok(())
    }

    /// Drop a label. Scenes filed under it stay on disk untouched.
    pub fn remove(&mut self, category: &str) -> Result<()> {
        let pos = self
            .categories
            .iter()
            .position(|c| c == category)
            .ok_or_else(|| LedgerError::UnknownCategory(category.to_string()))?;
        self.categories.remove(pos);
        self.save()?;
        tracing::info!(%category, "removed category");
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            store::ensure_directory(parent)?;
        }
        store::save(&self.categories, &self.path)?;
        Ok(())
    }
}
