//! Scene identity.
//!
//! Operations take an explicit [`SceneId`]. Recovering an id from where a
//! content file sits on disk is one [`IdentityStrategy`] among possibly
//! others, used at the boundary where only a path is known.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, Result};
use crate::registry::SubProjectIndex;

/// Logical identity of a base scene within a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId {
    pub category: String,
    pub sub_project: Option<String>,
    pub name: String,
}

impl SceneId {
    pub fn new(
        category: impl Into<String>,
        sub_project: Option<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            sub_project,
            name: name.into(),
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_project {
            Some(sub) => write!(f, "{}/{}/{}", self.category, sub, self.name),
            None => write!(f, "{}/{}", self.category, self.name),
        }
    }
}

/// Recovers the scene a content file belongs to.
pub trait IdentityStrategy {
    fn identify(&self, content_path: &Path, sub_projects: &SubProjectIndex) -> Result<SceneId>;
}

/// Walks upward from a content file:
///
/// - parent directory name is the scene name
/// - grandparent is a sub-project if the index knows it and the directory
///   above it is a category, otherwise the category
/// - with a sub-project, the great-grandparent is the category
///
/// The directory above the category must be the scenes root.
#[derive(Debug, Clone)]
pub struct PathIdentity {
    scenes_root: PathBuf,
}

impl PathIdentity {
    pub fn new(scenes_root: impl Into<PathBuf>) -> Self {
        Self {
            scenes_root: scenes_root.into(),
        }
    }
}

impl IdentityStrategy for PathIdentity {
    fn identify(&self, content_path: &Path, sub_projects: &SubProjectIndex) -> Result<SceneId> {
        let not_tracked = |reason: &str| LedgerError::NotTracked {
            path: content_path.to_path_buf(),
            reason: reason.to_string(),
        };

        let shot_dir = content_path
            .parent()
            .ok_or_else(|| not_tracked("file has no parent directory"))?;
        let shot = dir_name(shot_dir).ok_or_else(|| not_tracked("unnamed scene directory"))?;

        let upper_dir = shot_dir
            .parent()
            .ok_or_else(|| not_tracked("scene directory has no parent"))?;
        let upper = dir_name(upper_dir).ok_or_else(|| not_tracked("unnamed parent directory"))?;

        // A sub-project may share its name with a category, so the
        // grandparent is read as a category when the sub-project reading
        // does not land on the scenes root.
        let as_sub_project = sub_projects
            .contains(upper)
            .then(|| upper_dir.parent())
            .flatten()
            .filter(|category_dir| category_dir.parent() == Some(self.scenes_root.as_path()))
            .and_then(dir_name)
            .map(|category| (category, Some(upper.to_string())));
        let as_category = (upper_dir.parent() == Some(self.scenes_root.as_path()))
            .then_some((upper, None));

        let (category, sub_project) = as_sub_project
            .or(as_category)
            .ok_or_else(|| not_tracked("not under the project scenes directory"))?;

        let id = SceneId::new(category, sub_project, shot);
        tracing::debug!(path = %content_path.display(), scene = %id, "identified scene from path");
        Ok(id)
    }
}

fn dir_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index() -> SubProjectIndex {
        SubProjectIndex::from_names(
            "/proj/data/json/subPdata.json",
            vec!["None".to_string(), "Seq01".to_string()],
        )
    }

    fn strategy() -> PathIdentity {
        PathIdentity::new("/proj/scenes")
    }

    #[test]
    fn plain_category_layout() {
        let id = strategy()
            .identify(
                Path::new("/proj/scenes/Animation/ShotA/ShotA_Animation_gn_v003.mb"),
                &index(),
            )
            .expect("identified");
        assert_eq!(id, SceneId::new("Animation", None, "ShotA"));
    }

    #[test]
    fn known_sub_project_adds_a_level() {
        let id = strategy()
            .identify(
                Path::new("/proj/scenes/Animation/Seq01/ShotA/ShotA_Animation_gn_v001.mb"),
                &index(),
            )
            .expect("identified");
        assert_eq!(
            id,
            SceneId::new("Animation", Some("Seq01".to_string()), "ShotA")
        );
        assert_eq!(id.to_string(), "Animation/Seq01/ShotA");
    }

    #[test]
    fn sentinel_is_never_treated_as_a_sub_project() {
        let err = strategy()
            .identify(
                Path::new("/proj/scenes/Animation/None/ShotA/ShotA_v001.mb"),
                &index(),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotTracked { .. }));
    }

    #[test]
    fn unknown_intermediate_directory_is_not_tracked() {
        let err = strategy()
            .identify(
                Path::new("/proj/scenes/Animation/Seq99/ShotA/ShotA_v001.mb"),
                &index(),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotTracked { .. }));
    }

    #[test]
    fn sub_project_named_like_a_category() {
        let index = SubProjectIndex::from_names(
            "/proj/data/json/subPdata.json",
            vec!["None".to_string(), "Animation".to_string()],
        );
        let plain = strategy()
            .identify(
                Path::new("/proj/scenes/Animation/ShotA/ShotA_Animation_gn_v001.mb"),
                &index,
            )
            .expect("plain scene");
        assert_eq!(plain, SceneId::new("Animation", None, "ShotA"));

        let nested = strategy()
            .identify(
                Path::new("/proj/scenes/Layout/Animation/ShotA/ShotA_Layout_gn_v001.mb"),
                &index,
            )
            .expect("nested scene");
        assert_eq!(
            nested,
            SceneId::new("Layout", Some("Animation".to_string()), "ShotA")
        );
    }

    #[test]
    fn paths_outside_the_project_are_not_tracked() {
        for path in ["/elsewhere/Animation/ShotA/x.mb", "/x.mb", "x.mb"] {
            let err = strategy().identify(Path::new(path), &index()).unwrap_err();
            assert!(matches!(err, LedgerError::NotTracked { .. }), "{path}");
        }
    }
}
