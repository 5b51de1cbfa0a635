//! Scene version history and reference integrity over JSON sidecar files.
//!
//! A project holds base scenes grouped by category and optional sub-project.
//! Each scene has one metadata file listing its versions in save order and,
//! optionally, which version the single reference copy mirrors.
//!
//! ```no_run
//! use scenekeep_ledger::{Ledger, LedgerConfig, NewScene, WorkingFileHost};
//!
//! let ledger = Ledger::open("/projects/feature", LedgerConfig::default(),
//!     WorkingFileHost::new("/tmp/work.mb"))?;
//! let saved = ledger.save_new_scene(NewScene {
//!     category: "Animation",
//!     user: "gn",
//!     shot_name: "ShotA",
//!     sub_project: None,
//!     make_reference: false,
//!     notes: "",
//! })?;
//! ledger.save_version(&saved.id, "gn", true, "fix")?;
//! # Ok::<(), scenekeep_ledger::LedgerError>(())
//! ```

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod consistency;
pub mod engine;
pub mod error;
pub mod host;
pub mod identity;
pub mod index;
pub mod naming;
pub mod paths;
pub mod record;
pub mod registry;
pub mod store;

pub use config::{ConfigError, ConfigLoader, LedgerConfig};
pub use consistency::{ReferenceStatus, SceneStatus, check_metadata, check_reference, survey};
pub use engine::{Ledger, NewScene, SavedScene, SceneInfo, VersionInfo};
pub use error::{ErrorKind, LedgerError, Result};
pub use host::{ContentHost, WorkingFileHost};
pub use identity::{IdentityStrategy, PathIdentity, SceneId};
pub use index::scan_scenes;
pub use paths::{ProjectLayout, SceneFileNaming};
pub use record::{SceneRecord, VersionEntry};
pub use registry::{CategoryRegistry, SubProjectIndex, UserRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
