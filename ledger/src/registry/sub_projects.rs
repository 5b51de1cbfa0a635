//! Sub-project index: a JSON array whose position 0 is a sentinel meaning
//! "no sub-project". Shared by every category of a project.

use std::path::{Path, PathBuf};

use crate::error::{LedgerError, Result};
use crate::naming::normalize_name;
use crate::paths::ProjectLayout;
use crate::store::{self, StoreError};

/// Value stored at index 0.
pub const NO_SUB_PROJECT: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubProjectIndex {
    path: PathBuf,
    names: Vec<String>,
}

impl SubProjectIndex {
    /// Build from raw names; an empty list gets the sentinel.
    pub fn from_names(path: impl Into<PathBuf>, mut names: Vec<String>) -> Self {
        if names.is_empty() {
            names.push(NO_SUB_PROJECT.to_string());
        }
        Self {
            path: path.into(),
            names,
        }
    }

    /// Read the index; a missing file is an index holding only the sentinel.
    pub fn load(layout: &ProjectLayout) -> Result<Self> {
        let path = layout.sub_project_index_file();
        match store::load::<Vec<String>>(&path) {
            Ok(names) => Ok(Self::from_names(path, names)),
            Err(StoreError::NotFound { .. }) => Ok(Self::from_names(path, Vec::new())),
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`load`](Self::load) but writes the default file when absent.
    pub fn load_or_init(layout: &ProjectLayout) -> Result<Self> {
        let index = Self::load(layout)?;
        if !index.path.exists() {
            index.save()?;
        }
        Ok(index)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries including the sentinel.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Real sub-projects, sentinel excluded.
    pub fn sub_projects(&self) -> &[String] {
        &self.names[1..]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.sub_projects()
            .iter()
            .position(|n| n == name)
            .map(|pos| pos + 1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Map an index to a sub-project name; 0 means none.
    pub fn resolve(&self, index: usize) -> Result<Option<&str>> {
        match index {
            0 => Ok(None),
            i => self
                .names
                .get(i)
                .map(|n| Some(n.as_str()))
                .ok_or_else(|| LedgerError::UnknownSubProject(format!("#{i}"))),
        }
    }

    /// Fail with `UnknownSubProject` unless `name` is absent or registered.
    pub fn require(&self, name: Option<&str>) -> Result<()> {
        match name {
            Some(name) if !self.contains(name) => {
                Err(LedgerError::UnknownSubProject(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Append a sub-project and persist. Returns its index.
    pub fn create(&mut self, name: &str) -> Result<usize> {
        let name = normalize_name(name)?;
        if name.eq_ignore_ascii_case(NO_SUB_PROJECT) {
            return Err(LedgerError::InvalidName { name });
        }
        if self.contains(&name) {
            return Err(LedgerError::AlreadyExists {
                what: "sub-project",
                name,
            });
        }
        self.names.push(name.clone());
        if let Err(e) = self.save() {
            self.names.pop();
            return Err(e);
        }
        let index = self.names.len() - 1;
        tracing::info!(sub_project = %name, index, "created sub-project");
        Ok(index)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            store::ensure_directory(parent)?;
        }
        store::save(&self.names, &self.path)?;
        Ok(())
    }
}
