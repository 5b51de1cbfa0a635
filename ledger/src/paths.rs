//! Deterministic mapping from logical identity to filesystem paths.
//!
//! ```text
//! <project>/data/json/subPdata.json                          sub-project index
//! <project>/data/json/categories.json                        category registry
//! <project>/data/json/<Category>[/<SubProject>]/<Name>.json  scene metadata
//! <project>/scenes/<Category>[/<SubProject>]/<Name>/
//!     <Name>_<Category>_<initials>_v001.<ext>                version files
//!     <Name>_<Category>_forReference.<ext>                   reference copy
//! ```
//!
//! Nothing here touches the filesystem except [`ProjectLayout::ensure_scene_dirs`].

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::identity::SceneId;
use crate::store;

pub const DATA_DIR: &str = "data";
pub const METADATA_DIR: &str = "json";
pub const SCENES_DIR: &str = "scenes";
pub const METADATA_EXTENSION: &str = "json";
pub const SUB_PROJECT_INDEX_FILE: &str = "subPdata.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const USERS_FILE: &str = "users.json";
pub const REFERENCE_SUFFIX: &str = "forReference";

/// Filesystem layout of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<project>/data/json`
    pub fn metadata_root(&self) -> PathBuf {
        self.root.join(DATA_DIR).join(METADATA_DIR)
    }

    /// `<project>/scenes`
    pub fn scenes_root(&self) -> PathBuf {
        self.root.join(SCENES_DIR)
    }

    pub fn sub_project_index_file(&self) -> PathBuf {
        self.metadata_root().join(SUB_PROJECT_INDEX_FILE)
    }

    pub fn categories_file(&self) -> PathBuf {
        self.metadata_root().join(CATEGORIES_FILE)
    }

    pub fn users_file(&self) -> PathBuf {
        self.metadata_root().join(USERS_FILE)
    }

    pub fn metadata_dir(&self, category: &str, sub_project: Option<&str>) -> PathBuf {
        nest(self.metadata_root().join(category), sub_project)
    }

    pub fn scenes_dir(&self, category: &str, sub_project: Option<&str>) -> PathBuf {
        nest(self.scenes_root().join(category), sub_project)
    }

    /// `<metaDir>/<name>.json`
    pub fn metadata_file(&self, id: &SceneId) -> PathBuf {
        self.metadata_dir(&id.category, id.sub_project.as_deref())
            .join(format!("{}.{METADATA_EXTENSION}", id.name))
    }

    /// Directory holding a scene's version files and reference copy.
    pub fn shot_dir(&self, id: &SceneId) -> PathBuf {
        self.scenes_dir(&id.category, id.sub_project.as_deref())
            .join(&id.name)
    }

    /// Create the metadata and shot directories for `id`.
    pub fn ensure_scene_dirs(&self, id: &SceneId) -> Result<()> {
        let meta_dir = self.metadata_dir(&id.category, id.sub_project.as_deref());
        tracing::debug!(dir = %meta_dir.display(), "ensuring metadata directory");
        store::ensure_directory(&meta_dir)?;
        let shot_dir = self.shot_dir(id);
        tracing::debug!(dir = %shot_dir.display(), "ensuring shot directory");
        store::ensure_directory(&shot_dir)?;
        Ok(())
    }
}

fn nest(base: PathBuf, sub_project: Option<&str>) -> PathBuf {
    match sub_project {
        Some(sub) => base.join(sub),
        None => base,
    }
}

/// How content file names are spelled: zero-pad width and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneFileNaming {
    pub padding: usize,
    pub extension: String,
}

impl Default for SceneFileNaming {
    fn default() -> Self {
        Self {
            padding: 3,
            extension: "mb".to_string(),
        }
    }
}

impl SceneFileNaming {
    /// `<shot>_<category>_<initials>_v<NNN>.<ext>`
    pub fn version_file_name(
        &self,
        shot: &str,
        category: &str,
        initials: &str,
        version: usize,
    ) -> String {
        format!(
            "{shot}_{category}_{initials}_{}.{}",
            crate::naming::version_label(version, self.padding),
            self.extension
        )
    }

    pub fn version_file(
        &self,
        shot_dir: &Path,
        shot: &str,
        category: &str,
        initials: &str,
        version: usize,
    ) -> PathBuf {
        shot_dir.join(self.version_file_name(shot, category, initials, version))
    }

    /// `<shot>_<category>_forReference.<ext>`; independent of version because
    /// the reference is overwritten in place.
    pub fn reference_file_name(&self, shot: &str, category: &str) -> String {
        format!("{shot}_{category}_{REFERENCE_SUFFIX}.{}", self.extension)
    }

    pub fn reference_file(&self, shot_dir: &Path, shot: &str, category: &str) -> PathBuf {
        shot_dir.join(self.reference_file_name(shot, category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn layout() -> ProjectLayout {
        ProjectLayout::new("/proj")
    }

    #[test]
    fn roots() {
        assert_eq!(layout().metadata_root(), PathBuf::from("/proj/data/json"));
        assert_eq!(layout().scenes_root(), PathBuf::from("/proj/scenes"));
        assert_eq!(
            layout().sub_project_index_file(),
            PathBuf::from("/proj/data/json/subPdata.json")
        );
    }

    #[test]
    fn metadata_file_with_and_without_sub_project() {
        let plain = SceneId::new("Animation", None, "ShotA");
        assert_eq!(
            layout().metadata_file(&plain),
            PathBuf::from("/proj/data/json/Animation/ShotA.json")
        );

        let nested = SceneId::new("Animation", Some("Seq01".to_string()), "ShotA");
        assert_eq!(
            layout().metadata_file(&nested),
            PathBuf::from("/proj/data/json/Animation/Seq01/ShotA.json")
        );
        assert_eq!(
            layout().shot_dir(&nested),
            PathBuf::from("/proj/scenes/Animation/Seq01/ShotA")
        );
    }

    #[test]
    fn version_and_reference_file_names() {
        let naming = SceneFileNaming::default();
        let shot_dir = PathBuf::from("/proj/scenes/Animation/ShotA");
        assert_eq!(
            naming.version_file(&shot_dir, "ShotA", "Animation", "gn", 1),
            shot_dir.join("ShotA_Animation_gn_v001.mb")
        );
        assert_eq!(
            naming.version_file_name("ShotA", "Animation", "gn", 12),
            "ShotA_Animation_gn_v012.mb"
        );
        assert_eq!(
            naming.reference_file(&shot_dir, "ShotA", "Animation"),
            shot_dir.join("ShotA_Animation_forReference.mb")
        );
    }

    #[test]
    fn padded_names_sort_in_version_order() {
        let naming = SceneFileNaming::default();
        let mut names: Vec<String> = [10, 2, 1, 100, 9]
            .into_iter()
            .map(|v| naming.version_file_name("S", "Rig", "ab", v))
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "S_Rig_ab_v001.mb",
                "S_Rig_ab_v002.mb",
                "S_Rig_ab_v009.mb",
                "S_Rig_ab_v010.mb",
                "S_Rig_ab_v100.mb",
            ]
        );
    }

    #[test]
    fn ensure_scene_dirs_creates_both_trees() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let layout = ProjectLayout::new(dir.path());
        let id = SceneId::new("Rig", Some("Props".to_string()), "Chair");

        layout.ensure_scene_dirs(&id).expect("create");
        layout.ensure_scene_dirs(&id).expect("idempotent");
        assert!(layout.metadata_dir("Rig", Some("Props")).is_dir());
        assert!(layout.shot_dir(&id).is_dir());
    }
}
