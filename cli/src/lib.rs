//! `scenekeep` command-line driver.
//!
//! A thin adapter over `scenekeep-ledger`: it resolves configuration and the
//! project root, builds a [`Ledger`] with a working-file host, and renders
//! results as text or JSON.
//!
//! ## Exit Codes
//!
//! - 0: Success
//! - 1: Notice (no reference set, scene not found, file not tracked)
//! - 2: Invalid input (bad name, version out of range, unknown or duplicate entry)
//! - 3: Infrastructure error (corrupted metadata, I/O failure)

pub mod registry_cmd;
pub mod scene_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scenekeep_ledger::{
    ConfigError, ConfigLoader, ContentHost, Ledger, LedgerConfig, LedgerError,
};

use crate::registry_cmd::{CategoryCli, SubProjectCli, UserCli};
use crate::scene_cmd::{InfoArgs, NewArgs, PathArgs, PromoteArgs, StatusArgs, VersionArgs};

/// Scene version tracking for shared project drives
#[derive(Debug, Parser)]
#[command(name = "scenekeep", version)]
pub struct Cli {
    /// Project root (overrides `project_root` from configuration)
    #[arg(long = "project", short = 'p', value_name = "DIR", global = true)]
    pub project: Option<PathBuf>,

    /// Configuration file (defaults to ./scenekeep.toml, then the user config dir)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the project skeleton
    Init,

    /// Save a working file as a new base scene
    New(NewArgs),

    /// Save a working file as the next version of a scene
    Version(VersionArgs),

    /// Make an existing version the reference
    Promote(PromoteArgs),

    /// Reference health of every scene in a category
    Status(StatusArgs),

    /// Versions and reference of one scene
    Info(InfoArgs),

    /// Print the file to open for a version or the reference
    Path(PathArgs),

    /// Manage sub-projects
    #[command(name = "sub-project")]
    SubProject(SubProjectCli),

    /// Manage categories
    Category(CategoryCli),

    /// Manage users
    User(UserCli),
}

/// Errors raised by the driver itself rather than the ledger.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("No project given: pass --project or set project_root in scenekeep.toml")]
    NoProject,

    #[error("Version numbers start at 1")]
    ZeroVersion,
}

/// Resolved configuration and project root shared by every command.
pub struct Context {
    pub project_root: PathBuf,
    pub config: LedgerConfig,
}

impl Context {
    pub fn ledger<H: ContentHost>(&self, host: H) -> anyhow::Result<Ledger<H>> {
        Ok(Ledger::open(
            self.project_root.clone(),
            self.config.clone(),
            host,
        )?)
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => ConfigLoader::new().with_file(path).load()?,
            None => ConfigLoader::load_default()?,
        };
        let project_root = self
            .project
            .or_else(|| config.project_root.clone())
            .ok_or(CliError::NoProject)?;
        tracing::debug!(project = %project_root.display(), "resolved project root");

        let ctx = Context {
            project_root,
            config,
        };

        match self.command {
            Command::Init => scene_cmd::run_init(&ctx),
            Command::New(args) => scene_cmd::run_new(&ctx, args),
            Command::Version(args) => scene_cmd::run_version(&ctx, args),
            Command::Promote(args) => scene_cmd::run_promote(&ctx, args),
            Command::Status(args) => scene_cmd::run_status(&ctx, args),
            Command::Info(args) => scene_cmd::run_info(&ctx, args),
            Command::Path(args) => scene_cmd::run_path(&ctx, args),
            Command::SubProject(cli) => registry_cmd::run_sub_project(&ctx, cli),
            Command::Category(cli) => registry_cmd::run_category(&ctx, cli),
            Command::User(cli) => registry_cmd::run_user(&ctx, cli),
        }
    }
}

/// Map a failure to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(err) = err.downcast_ref::<LedgerError>() {
        return match err {
            LedgerError::Config(config) => config_exit_code(config),
            e if e.is_user_facing_notice() => 1,
            e if e.is_invalid_input() => 2,
            _ => 3,
        };
    }
    if let Some(config) = err.downcast_ref::<ConfigError>() {
        return config_exit_code(config);
    }
    if err.downcast_ref::<CliError>().is_some() {
        return 2;
    }
    3
}

/// Whether the failure should be worded as a notice instead of an error.
pub fn is_notice(err: &anyhow::Error) -> bool {
    err.downcast_ref::<LedgerError>()
        .is_some_and(LedgerError::is_user_facing_notice)
}

fn config_exit_code(err: &ConfigError) -> i32 {
    match err {
        ConfigError::FileNotFound(_) | ConfigError::ValidationError(_) => 2,
        _ => 3,
    }
}
