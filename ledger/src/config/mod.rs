//! Layered ledger configuration:
//! 1. Defaults (from code)
//! 2. Config file (scenekeep.toml)
//! 3. Environment variables (SCENEKEEP_* prefix)
//!
//! # Example
//!
//! ```no_run
//! use scenekeep_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load_default().expect("Failed to load config");
//! assert!(config.version_padding >= 1);
//! ```
pub mod error;
pub mod loader;

pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, LedgerConfig};
