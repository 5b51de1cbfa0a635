//! Reference health checks.
//!
//! The shallow check only asks whether the reference copy exists. The deep
//! check compares it byte for byte against the version it claims to mirror,
//! which reads both files in full and is therefore opt-in.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, Result};
use crate::index::{scan_scenes, scene_name};
use crate::paths::ProjectLayout;
use crate::record::SceneRecord;

const COMPARE_CHUNK: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceStatus {
    /// Reference present (shallow) or identical to its version (deep).
    Ok,
    /// Both files exist but their contents differ.
    Drifted,
    /// The reference file, or under a deep check the referenced version file,
    /// is absent.
    Missing,
    NoReference,
    /// The metadata itself could not be read as a scene record.
    Corrupted,
    /// A survey could not read the files it had to compare.
    Unreadable,
}

impl ReferenceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceStatus::Ok => "ok",
            ReferenceStatus::Drifted => "drifted",
            ReferenceStatus::Missing => "missing",
            ReferenceStatus::NoReference => "no-reference",
            ReferenceStatus::Corrupted => "corrupted",
            ReferenceStatus::Unreadable => "unreadable",
        }
    }
}

impl fmt::Display for ReferenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the reference of an already loaded record.
pub fn check_reference(record: &SceneRecord, deep: bool) -> Result<ReferenceStatus> {
    let Some(reference) = record.reference_file.as_deref() else {
        return Ok(ReferenceStatus::NoReference);
    };

    if !deep {
        return Ok(if reference.is_file() {
            ReferenceStatus::Ok
        } else {
            ReferenceStatus::Missing
        });
    }

    let Some(entry) = record.referenced_entry() else {
        return Ok(ReferenceStatus::Missing);
    };
    match same_contents(reference, &entry.file) {
        Ok(true) => Ok(ReferenceStatus::Ok),
        Ok(false) => Ok(ReferenceStatus::Drifted),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ReferenceStatus::Missing),
        Err(source) => Err(LedgerError::ReadFailed {
            path: reference.to_path_buf(),
            source,
        }),
    }
}

/// Load `metadata_file` and classify it. A record that fails to parse is
/// `Corrupted` regardless of its reference.
pub fn check_metadata(metadata_file: &Path, deep: bool) -> Result<ReferenceStatus> {
    match SceneRecord::load(metadata_file) {
        Ok(record) => check_reference(&record, deep),
        Err(LedgerError::Corrupted { .. }) => Ok(ReferenceStatus::Corrupted),
        Err(e) => Err(e),
    }
}

fn same_contents(a: &Path, b: &Path) -> io::Result<bool> {
    let (fa, fb) = (File::open(a)?, File::open(b)?);
    if fa.metadata()?.len() != fb.metadata()?.len() {
        return Ok(false);
    }

    let mut ra = BufReader::with_capacity(COMPARE_CHUNK, fa);
    let mut rb = BufReader::with_capacity(COMPARE_CHUNK, fb);
    loop {
        let buf_a = ra.fill_buf()?;
        let buf_b = rb.fill_buf()?;
        if buf_a.is_empty() && buf_b.is_empty() {
            return Ok(true);
        }
        let n = buf_a.len().min(buf_b.len());
        if n == 0 || buf_a[..n] != buf_b[..n] {
            return Ok(false);
        }
        ra.consume(n);
        rb.consume(n);
    }
}

/// One row of a survey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneStatus {
    pub name: String,
    pub metadata_file: PathBuf,
    /// Version count, unknown for corrupted records.
    pub versions: Option<usize>,
    pub referenced_version: Option<usize>,
    pub status: ReferenceStatus,
}

/// Check every scene of one (category, sub-project) directory, ordered by
/// scene name. Corrupted records and failed comparisons are reported in
/// place instead of aborting.
pub fn survey(
    layout: &ProjectLayout,
    category: &str,
    sub_project: Option<&str>,
    deep: bool,
) -> Result<Vec<SceneStatus>> {
    let mut rows = Vec::new();
    for metadata_file in scan_scenes(layout, category, sub_project)? {
        let name = scene_name(&metadata_file).unwrap_or_default().to_string();
        let row = match SceneRecord::load(&metadata_file) {
            Ok(record) => {
                let status = check_reference(&record, deep).unwrap_or_else(|e| {
                    tracing::warn!(path = %metadata_file.display(), error = %e, "reference check failed");
                    ReferenceStatus::Unreadable
                });
                SceneStatus {
                    versions: Some(record.latest_version()),
                    referenced_version: record.referenced_version,
                    status,
                    name,
                    metadata_file,
                }
            }
            Err(LedgerError::Corrupted { reason, .. }) => {
                tracing::warn!(path = %metadata_file.display(), %reason, "corrupted scene metadata");
                SceneStatus {
                    name,
                    metadata_file,
                    versions: None,
                    referenced_version: None,
                    status: ReferenceStatus::Corrupted,
                }
            }
            Err(LedgerError::NotFound { path }) => {
                tracing::debug!(path = %path.display(), "metadata vanished during survey");
                continue;
            }
            Err(e) => return Err(e),
        };
        rows.push(row);
    }
    rows.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(rows)
}
