//! Version and reference engine.
//!
//! Every operation is a short blocking protocol: resolve paths, load the
//! record, ask the host for content, mutate, persist. Nothing is cached
//! between calls; registries and records are re-read each time so that other
//! workstations' writes are picked up. Concurrent writers race at the
//! granularity of one metadata file and the last one wins.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::LedgerConfig;
use crate::consistency::{self, ReferenceStatus, SceneStatus};
use crate::error::{LedgerError, Result};
use crate::host::ContentHost;
use crate::identity::{IdentityStrategy, PathIdentity, SceneId};
use crate::index;
use crate::naming::{normalize_name, version_label};
use crate::paths::{ProjectLayout, SceneFileNaming};
use crate::record::{SceneRecord, VersionEntry};
use crate::registry::{CategoryRegistry, SubProjectIndex, UserRegistry};
use crate::store;

/// Arguments of [`Ledger::save_new_scene`].
#[derive(Debug, Clone)]
pub struct NewScene<'a> {
    pub category: &'a str,
    /// Registered display name or initials.
    pub user: &'a str,
    pub shot_name: &'a str,
    pub sub_project: Option<&'a str>,
    pub make_reference: bool,
    pub notes: &'a str,
}

/// Outcome of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedScene {
    pub id: SceneId,
    pub version: usize,
    pub scene_file: PathBuf,
    pub metadata_file: PathBuf,
    /// Set when this save also promoted the reference.
    pub reference_file: Option<PathBuf>,
}

/// One version as shown in an info listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub version: usize,
    pub label: String,
    pub file: PathBuf,
    pub notes: String,
    pub author: String,
    pub host: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneInfo {
    pub id: SceneId,
    pub creator: String,
    pub creator_host: String,
    pub reference_file: Option<PathBuf>,
    pub referenced_version: Option<usize>,
    /// Version a viewer should preselect: the referenced one, else the latest.
    pub selected_version: usize,
    pub versions: Vec<VersionInfo>,
}

pub struct Ledger<H: ContentHost> {
    layout: ProjectLayout,
    config: LedgerConfig,
    naming: SceneFileNaming,
    host: H,
}

impl<H: ContentHost> Ledger<H> {
    /// Bind a project. A relative root is resolved against the current
    /// directory here, so every path written to metadata is absolute.
    pub fn open(project_root: impl Into<PathBuf>, config: LedgerConfig, host: H) -> Result<Self> {
        config.validate()?;
        let project_root = project_root.into();
        let root = std::path::absolute(&project_root).map_err(|source| {
            LedgerError::ReadFailed {
                path: project_root.clone(),
                source,
            }
        })?;
        let layout = ProjectLayout::new(root);
        tracing::debug!(root = %layout.root().display(), "opened project");
        Ok(Self {
            naming: config.naming(),
            layout,
            config,
            host,
        })
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Create the project skeleton and the default sub-project index.
    pub fn init_project(&self) -> Result<()> {
        store::ensure_directory(&self.layout.metadata_root())?;
        store::ensure_directory(&self.layout.scenes_root())?;
        SubProjectIndex::load_or_init(&self.layout)?;
        tracing::info!(root = %self.layout.root().display(), "initialized project");
        Ok(())
    }

    pub fn sub_projects(&self) -> Result<SubProjectIndex> {
        SubProjectIndex::load(&self.layout)
    }

    pub fn categories(&self) -> Result<CategoryRegistry> {
        CategoryRegistry::load(&self.layout)
    }

    pub fn users(&self) -> Result<UserRegistry> {
        UserRegistry::load(&self.config.users_file(&self.layout))
    }

    pub fn metadata_file(&self, id: &SceneId) -> PathBuf {
        self.layout.metadata_file(id)
    }

    pub fn load_record(&self, id: &SceneId) -> Result<SceneRecord> {
        SceneRecord::load(&self.layout.metadata_file(id))
    }

    /// Recover the scene a content file belongs to from where it sits.
    pub fn identify(&self, content_path: &Path) -> Result<SceneId> {
        let sub_projects = self.sub_projects()?;
        let content_path =
            std::path::absolute(content_path).map_err(|_| LedgerError::NotTracked {
                path: content_path.to_path_buf(),
                reason: "path cannot be made absolute".to_string(),
            })?;
        PathIdentity::new(self.layout.scenes_root()).identify(&content_path, &sub_projects)
    }

    /// Create a base scene with its first version.
    ///
    /// Inputs are validated before anything touches the disk. Directory,
    /// content and copy failures abort before the metadata is written.
    pub fn save_new_scene(&self, request: NewScene<'_>) -> Result<SavedScene> {
        let shot_name = normalize_name(request.shot_name)?;
        self.categories()?.require(request.category)?;
        self.sub_projects()?.require(request.sub_project)?;
        let initials = self.users()?.resolve_initials(request.user)?;

        let id = SceneId::new(
            request.category,
            request.sub_project.map(str::to_string),
            shot_name,
        );
        let metadata_file = self.layout.metadata_file(&id);
        if metadata_file.exists() {
            return Err(LedgerError::AlreadyExists {
                what: "scene",
                name: id.to_string(),
            });
        }

        self.layout.ensure_scene_dirs(&id)?;
        let shot_dir = self.layout.shot_dir(&id);
        let scene_file = self
            .naming
            .version_file(&shot_dir, &id.name, &id.category, &initials, 1);
        self.materialize(&scene_file)?;

        let host = self.host.host_identity();
        let first_host = self
            .config
            .record_host_on_first_version
            .then(|| host.clone());
        let mut record = SceneRecord::create_new(
            &id.name,
            &id.category,
            &shot_dir,
            &initials,
            host,
            VersionEntry::new(&scene_file, request.notes, &initials, first_host),
        );

        let reference_file = if request.make_reference {
            Some(self.promote_or_discard(&mut record, 1, &scene_file)?)
        } else {
            None
        };

        record.save(&metadata_file)?;
        tracing::info!(
            scene = %id,
            user = %initials,
            os_user = %self.host.user_identity(),
            reference = request.make_reference,
            "created base scene"
        );

        Ok(SavedScene {
            id,
            version: 1,
            scene_file,
            metadata_file,
            reference_file,
        })
    }

    /// Append a version to an existing scene.
    pub fn save_version(
        &self,
        id: &SceneId,
        user: &str,
        make_reference: bool,
        notes: &str,
    ) -> Result<SavedScene> {
        let initials = self.users()?.resolve_initials(user)?;
        let metadata_file = self.layout.metadata_file(id);
        let mut record = SceneRecord::load(&metadata_file)?;

        let version = record.latest_version() + 1;
        let scene_file = self.naming.version_file(
            &record.path,
            &record.name,
            &record.category,
            &initials,
            version,
        );
        self.materialize(&scene_file)?;

        let appended = record.append_version(VersionEntry::new(
            &scene_file,
            notes,
            &initials,
            Some(self.host.host_identity()),
        ));
        debug_assert_eq!(appended, version);

        let reference_file = if make_reference {
            Some(self.promote_or_discard(&mut record, version, &scene_file)?)
        } else {
            None
        };

        record.save(&metadata_file)?;
        tracing::info!(scene = %id, version, user = %initials, reference = make_reference, "saved version");

        Ok(SavedScene {
            id: id.clone(),
            version,
            scene_file,
            metadata_file,
            reference_file,
        })
    }

    /// [`save_version`](Self::save_version) for the scene that owns
    /// `content_path`.
    pub fn save_version_at(
        &self,
        content_path: &Path,
        user: &str,
        make_reference: bool,
        notes: &str,
    ) -> Result<SavedScene> {
        let id = self.identify(content_path)?;
        match self.save_version(&id, user, make_reference, notes) {
            Err(LedgerError::NotFound { .. }) => Err(LedgerError::NotTracked {
                path: content_path.to_path_buf(),
                reason: format!("no metadata for {id}"),
            }),
            other => other,
        }
    }

    /// Promote an existing version to be the reference. Returns the
    /// reference file path.
    pub fn make_reference(&self, id: &SceneId, version: usize) -> Result<PathBuf> {
        let metadata_file = self.layout.metadata_file(id);
        let mut record = SceneRecord::load(&metadata_file)?;
        let reference = self.promote(&mut record, version)?;
        record.save(&metadata_file)?;
        tracing::info!(scene = %id, version, "promoted reference");
        Ok(reference)
    }

    /// Open a version through the host. `version` is a 0-based position;
    /// `None` opens the latest.
    pub fn load_scene(&self, id: &SceneId, version: Option<usize>, force: bool) -> Result<PathBuf> {
        let record = self.load_record(id)?;
        let file = record.scene_file(version)?.to_path_buf();
        self.open_file(&file, force)?;
        Ok(file)
    }

    pub fn load_reference(&self, id: &SceneId) -> Result<PathBuf> {
        let record = self.load_record(id)?;
        let file = record.reference()?.to_path_buf();
        self.open_file(&file, false)?;
        Ok(file)
    }

    pub fn scene_info(&self, id: &SceneId) -> Result<SceneInfo> {
        let record = self.load_record(id)?;
        let versions = record
            .versions
            .iter()
            .enumerate()
            .map(|(idx, entry)| VersionInfo {
                version: idx + 1,
                label: version_label(idx + 1, self.naming.padding),
                file: entry.file.clone(),
                notes: entry.notes.clone(),
                author: entry.author.clone(),
                host: entry.host.clone(),
            })
            .collect();
        Ok(SceneInfo {
            id: id.clone(),
            selected_version: record
                .referenced_version
                .unwrap_or_else(|| record.latest_version()),
            creator: record.creator,
            creator_host: record.creator_host,
            reference_file: record.reference_file,
            referenced_version: record.referenced_version,
            versions,
        })
    }

    pub fn scan_scenes(&self, category: &str, sub_project: Option<&str>) -> Result<BTreeSet<PathBuf>> {
        self.sub_projects()?.require(sub_project)?;
        index::scan_scenes(&self.layout, category, sub_project)
    }

    pub fn check_reference(&self, id: &SceneId, deep: bool) -> Result<ReferenceStatus> {
        consistency::check_metadata(&self.layout.metadata_file(id), deep)
    }

    pub fn survey(
        &self,
        category: &str,
        sub_project: Option<&str>,
        deep: bool,
    ) -> Result<Vec<SceneStatus>> {
        self.sub_projects()?.require(sub_project)?;
        consistency::survey(&self.layout, category, sub_project, deep)
    }

    /// Copy `version`'s file over the reference path and point the record at
    /// it. The record is only mutated after the copy succeeded.
    fn promote(&self, record: &mut SceneRecord, version: usize) -> Result<PathBuf> {
        let source = record.version(version)?.file.clone();
        let reference = self
            .naming
            .reference_file(&record.path, &record.name, &record.category);
        self.host
            .copy_file(&source, &reference)
            .map_err(|e| LedgerError::CopyFailed {
                from: source.clone(),
                to: reference.clone(),
                source: e,
            })?;
        record.set_reference(version, reference.clone())?;
        Ok(reference)
    }

    /// Promote a version written by this save. If the copy fails the
    /// version has no metadata entry yet, so its file is removed to keep the
    /// number free for the next save.
    fn promote_or_discard(
        &self,
        record: &mut SceneRecord,
        version: usize,
        scene_file: &Path,
    ) -> Result<PathBuf> {
        self.promote(record, version).inspect_err(|_| {
            if let Err(e) = std::fs::remove_file(scene_file) {
                tracing::warn!(
                    path = %scene_file.display(),
                    error = %e,
                    "failed to remove unrecorded version file"
                );
            }
        })
    }

    fn materialize(&self, target: &Path) -> Result<()> {
        self.host
            .materialize(target)
            .map_err(|source| LedgerError::Materialize {
                path: target.to_path_buf(),
                source,
            })
    }

    fn open_file(&self, file: &Path, force: bool) -> Result<()> {
        self.host.open(file, force).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LedgerError::NotFound {
                    path: file.to_path_buf(),
                }
            } else {
                LedgerError::ReadFailed {
                    path: file.to_path_buf(),
                    source,
                }
            }
        })
    }
}
