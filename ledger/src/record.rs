//! Scene record model.
//!
//! A [`SceneRecord`] is one base scene: where its version files live, who
//! created it, its ordered version list, and which version the reference
//! copy mirrors. Version numbers are 1-based positions in `versions`; no
//! separate id is stored.

use std::path::{Path, PathBuf};

use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LedgerError, Result};
use crate::store;

/// One saved snapshot of a scene.
///
/// On disk this is a positional array, `[file, notes, author]` for legacy
/// entries and `[file, notes, author, host]` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    pub file: PathBuf,
    pub notes: String,
    /// Author initials.
    pub author: String,
    pub host: Option<String>,
}

impl VersionEntry {
    pub fn new(
        file: impl Into<PathBuf>,
        notes: impl Into<String>,
        author: impl Into<String>,
        host: Option<String>,
    ) -> Self {
        Self {
            file: file.into(),
            notes: notes.into(),
            author: author.into(),
            host,
        }
    }
}

impl Serialize for VersionEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = if self.host.is_some() { 4 } else { 3 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.file)?;
        seq.serialize_element(&self.notes)?;
        seq.serialize_element(&self.author)?;
        if let Some(host) = &self.host {
            seq.serialize_element(host)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for VersionEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let parts = Vec::<String>::deserialize(deserializer)?;
        let len = parts.len();
        let mut parts = parts.into_iter();
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(file), Some(notes), Some(author), host) if len <= 4 => Ok(VersionEntry {
                file: PathBuf::from(file),
                notes,
                author,
                host,
            }),
            _ => Err(D::Error::invalid_length(len, &"a version entry of 3 or 4 strings")),
        }
    }
}

/// The persisted description of one base scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SceneRecord {
    pub name: String,
    /// Directory holding the version files and the reference copy.
    pub path: PathBuf,
    pub category: String,
    pub creator: String,
    pub creator_host: String,
    pub reference_file: Option<PathBuf>,
    pub referenced_version: Option<usize>,
    pub versions: Vec<VersionEntry>,
}

impl SceneRecord {
    /// A record holding exactly one version and no reference.
    pub fn create_new(
        name: impl Into<String>,
        category: impl Into<String>,
        path: impl Into<PathBuf>,
        creator: impl Into<String>,
        creator_host: impl Into<String>,
        first: VersionEntry,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            category: category.into(),
            creator: creator.into(),
            creator_host: creator_host.into(),
            reference_file: None,
            referenced_version: None,
            versions: vec![first],
        }
    }

    /// Append at the end; returns the new version number.
    pub fn append_version(&mut self, entry: VersionEntry) -> usize {
        self.versions.push(entry);
        self.versions.len()
    }

    /// Point the reference at `version`. Last writer wins; no merge.
    pub fn set_reference(&mut self, version: usize, reference_file: PathBuf) -> Result<()> {
        self.version(version)?;
        self.reference_file = Some(reference_file);
        self.referenced_version = Some(version);
        Ok(())
    }

    /// 1-based lookup.
    pub fn version(&self, version: usize) -> Result<&VersionEntry> {
        version
            .checked_sub(1)
            .and_then(|idx| self.versions.get(idx))
            .ok_or(LedgerError::OutOfRange {
                requested: version,
                available: self.versions.len(),
            })
    }

    /// File for the 0-based `index`, or the latest version when `None`.
    pub fn scene_file(&self, index: Option<usize>) -> Result<&Path> {
        let idx = index.unwrap_or_else(|| self.versions.len().saturating_sub(1));
        self.versions
            .get(idx)
            .map(|entry| entry.file.as_path())
            .ok_or(LedgerError::OutOfRange {
                requested: idx,
                available: self.versions.len(),
            })
    }

    pub fn reference(&self) -> Result<&Path> {
        self.reference_file
            .as_deref()
            .ok_or_else(|| LedgerError::NoReferenceSet {
                name: self.name.clone(),
            })
    }

    pub fn latest_version(&self) -> usize {
        self.versions.len()
    }

    /// Entry the reference copy claims to mirror, if any.
    pub fn referenced_entry(&self) -> Option<&VersionEntry> {
        self.referenced_version.and_then(|v| self.version(v).ok())
    }

    /// Load a metadata file. A record that parses but breaks an invariant is
    /// reported as corrupted as well.
    pub fn load(path: &Path) -> Result<Self> {
        let record: SceneRecord = store::load(path)?;
        record
            .validate()
            .map_err(|reason| LedgerError::Corrupted {
                path: path.to_path_buf(),
                reason,
            })?;
        Ok(record)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        store::save(self, path)?;
        Ok(())
    }

    /// Check the structural invariants a persisted record must satisfy.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.versions.is_empty() {
            return Err("record has no versions".to_string());
        }
        if let Some(version) = self.referenced_version
            && (version == 0 || version > self.versions.len())
        {
            return Err(format!(
                "ReferencedVersion {version} outside 1..={}",
                self.versions.len()
            ));
        }
        Ok(())
    }
}
