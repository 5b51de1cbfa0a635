//! Per-directory scene enumeration.
//!
//! Each (category, sub-project) pair owns one metadata directory; listing it
//! reads exactly that directory and never descends into nested ones.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{LedgerError, Result};
use crate::paths::{METADATA_EXTENSION, ProjectLayout};

/// Metadata files directly under the directory for `category`/`sub_project`.
/// A directory that does not exist yet holds no scenes.
pub fn scan_scenes(
    layout: &ProjectLayout,
    category: &str,
    sub_project: Option<&str>,
) -> Result<BTreeSet<PathBuf>> {
    let dir = layout.metadata_dir(category, sub_project);
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "no metadata directory, nothing to scan");
        return Ok(BTreeSet::new());
    }

    let mut found = BTreeSet::new();
    for entry in WalkDir::new(&dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = entry.map_err(|e| LedgerError::ReadFailed {
            path: dir.clone(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(METADATA_EXTENSION) {
            continue;
        }
        found.insert(path.to_path_buf());
    }

    tracing::debug!(dir = %dir.display(), count = found.len(), "scanned scenes");
    Ok(found)
}

/// Scene name encoded in a metadata file name.
pub fn scene_name(metadata_file: &Path) -> Option<&str> {
    metadata_file.file_stem().and_then(|s| s.to_str())
}
