use crate::config::error::{ConfigError, Result};
use crate::paths::{ProjectLayout, SceneFileNaming};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest accepted zero-pad width for version labels.
const MAX_VERSION_PADDING: usize = 9;

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Project directory; a `--project` flag takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,

    /// Extension of content files, without the dot
    #[serde(default = "default_scene_extension")]
    pub scene_extension: String,

    /// Zero-pad width of version labels (3 → v001)
    #[serde(default = "default_version_padding")]
    pub version_padding: usize,

    /// Write the 4-element entry form for version 1 as well
    #[serde(default)]
    pub record_host_on_first_version: bool,

    /// Compare file contents when reporting reference status
    #[serde(default)]
    pub deep_check: bool,

    /// Users registry override (defaults to `<project>/data/json/users.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_file: Option<PathBuf>,
}

fn default_scene_extension() -> String {
    "mb".to_string()
}
fn default_version_padding() -> usize {
    3
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            scene_extension: default_scene_extension(),
            version_padding: default_version_padding(),
            record_host_on_first_version: false,
            deep_check: false,
            users_file: None,
        }
    }
}

impl LedgerConfig {
    pub fn naming(&self) -> SceneFileNaming {
        SceneFileNaming {
            padding: self.version_padding,
            extension: self.scene_extension.clone(),
        }
    }

    pub fn users_file(&self, layout: &ProjectLayout) -> PathBuf {
        self.users_file
            .clone()
            .unwrap_or_else(|| layout.users_file())
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_VERSION_PADDING).contains(&self.version_padding) {
            return Err(ConfigError::ValidationError(format!(
                "version_padding must be within 1..={MAX_VERSION_PADDING}, got {}",
                self.version_padding
            )));
        }
        let ext = &self.scene_extension;
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError(format!(
                "scene_extension must be a bare extension like \"mb\", got {ext:?}"
            )));
        }
        Ok(())
    }
}

/// Configuration loader with layered merging support
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration with layered merging:
    /// 1. Defaults
    /// 2. Config file if provided
    /// 3. Environment variables (SCENEKEEP_ prefix)
    pub fn load(&self) -> Result<LedgerConfig> {
        let mut builder = Config::builder();

        let defaults_json = serde_json::to_string(&LedgerConfig::default())?;
        builder = builder.add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        if let Some(ref path) = self.config_path {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_ref()));
            } else {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
        }

        // SCENEKEEP_VERSION_PADDING=4, SCENEKEEP_DEEP_CHECK=true
        builder = builder.add_source(
            Environment::with_prefix("SCENEKEEP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let ledger_config: LedgerConfig = config.try_deserialize()?;
        ledger_config.validate()?;

        tracing::debug!(
            file = ?self.config_path,
            padding = ledger_config.version_padding,
            extension = %ledger_config.scene_extension,
            "loaded configuration"
        );
        Ok(ledger_config)
    }

    /// Locate the default config file:
    /// 1. Current directory: ./scenekeep.toml
    /// 2. XDG config: ~/.config/scenekeep/config.toml
    pub fn find_config_file() -> Option<PathBuf> {
        let cwd_config = PathBuf::from("./scenekeep.toml");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("scenekeep").join("config.toml");
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        None
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<LedgerConfig> {
        let loader = if let Some(config_path) = Self::find_config_file() {
            ConfigLoader::new().with_file(config_path)
        } else {
            ConfigLoader::new()
        };

        loader.load()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
