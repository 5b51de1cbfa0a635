//! Display name → initials. Initials are what ends up in version file names.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, Result};
use crate::naming::normalize_name;
use crate::store::{self, StoreError};

const DEFAULT_USER: (&str, &str) = ("Generic", "gn");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistry {
    path: PathBuf,
    users: BTreeMap<String, String>,
}

impl UserRegistry {
    /// Read the registry; a missing file holds only the generic user.
    pub fn load(path: &Path) -> Result<Self> {
        let users = match store::load::<BTreeMap<String, String>>(path) {
            Ok(users) => users,
            Err(StoreError::NotFound { .. }) => BTreeMap::from([(
                DEFAULT_USER.0.to_string(),
                DEFAULT_USER.1.to_string(),
            )]),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: path.to_path_buf(),
            users,
        })
    }

    pub fn users(&self) -> impl Iterator<Item = (&str, &str)> {
        self.users.iter().map(|(n, i)| (n.as_str(), i.as_str()))
    }

    pub fn initials_for(&self, name: &str) -> Option<&str> {
        self.users.get(name).map(String::as_str)
    }

    /// Accept either a display name or registered initials.
    pub fn resolve_initials(&self, who: &str) -> Result<String> {
        if let Some(initials) = self.initials_for(who) {
            return Ok(initials.to_string());
        }
        if self.users.values().any(|i| i == who) {
            return Ok(who.to_string());
        }
        Err(LedgerError::UnknownUser(who.to_string()))
    }

    pub fn add(&mut self, name: &str, initials: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidName {
                name: name.to_string(),
            });
        }
        let initials = normalize_name(initials)?;
        if self.users.contains_key(name) {
            return Err(LedgerError::AlreadyExists {
                what: "user",
                name: name.to_string(),
            });
        }
        self.users.insert(name.to_string(), initials.clone());
        self.save()?;
        tracing::info!(user = %name, %initials, "added user");
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        if self.users.remove(name).is_none() {
            return Err(LedgerError::UnknownUser(name.to_string()));
        }
        self.save()?;
        tracing::info!(user = %name, "removed user");
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            store::ensure_directory(parent)?;
        }
        store::save(&self.users, &self.path)?;
        Ok(())
    }
}
