//! Scene commands: `init`, `new`, `version`, `promote`, `status`, `info`, `path`.

use std::path::PathBuf;

use clap::{Args, Parser};
use scenekeep_ledger::naming::normalize_name;
use scenekeep_ledger::{NewScene, SavedScene, SceneId, WorkingFileHost};

use crate::{CliError, Context};

/// Which scene a command addresses.
#[derive(Debug, Args)]
pub struct SceneArgs {
    /// Scene name
    pub name: String,

    /// Category the scene is filed under
    #[arg(long = "category", value_name = "CATEGORY")]
    pub category: String,

    /// Sub-project, if the scene lives in one
    #[arg(long = "sub-project", short = 's', value_name = "NAME")]
    pub sub_project: Option<String>,
}

impl SceneArgs {
    fn id(&self) -> anyhow::Result<SceneId> {
        Ok(SceneId::new(
            &self.category,
            self.sub_project.clone(),
            normalize_name(&self.name)?,
        ))
    }
}

#[derive(Debug, Parser)]
pub struct NewArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Working file saved as version 1
    #[arg(long = "file", short = 'f', value_name = "WORKING_FILE")]
    pub file: PathBuf,

    /// User name or initials
    #[arg(long = "user", short = 'u')]
    pub user: String,

    /// Also make version 1 the reference
    #[arg(long = "reference", short = 'r')]
    pub reference: bool,

    /// Version notes
    #[arg(long = "notes", short = 'm', default_value = "")]
    pub notes: String,
}

#[derive(Debug, Parser)]
pub struct VersionArgs {
    /// Scene name
    #[arg(required_unless_present = "at", requires = "category")]
    pub name: Option<String>,

    /// Category the scene is filed under
    #[arg(
        long = "category",
        value_name = "CATEGORY",
        requires = "name",
        conflicts_with = "at"
    )]
    pub category: Option<String>,

    /// Sub-project, if the scene lives in one
    #[arg(
        long = "sub-project",
        short = 's',
        value_name = "NAME",
        conflicts_with = "at"
    )]
    pub sub_project: Option<String>,

    /// Any file inside the scene's directory; the scene is found from its location
    #[arg(long = "at", value_name = "SCENE_FILE", conflicts_with = "name")]
    pub at: Option<PathBuf>,

    /// Working file saved as the new version
    #[arg(long = "file", short = 'f', value_name = "WORKING_FILE")]
    pub file: PathBuf,

    /// User name or initials
    #[arg(long = "user", short = 'u')]
    pub user: String,

    /// Also make the new version the reference
    #[arg(long = "reference", short = 'r')]
    pub reference: bool,

    /// Version notes
    #[arg(long = "notes", short = 'm', default_value = "")]
    pub notes: String,
}

#[derive(Debug, Parser)]
pub struct PromoteArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Version number to promote (1-based)
    #[arg(long = "version", short = 'n')]
    pub version: usize,
}

#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Category to list
    #[arg(long = "category", value_name = "CATEGORY")]
    pub category: String,

    /// Sub-project to list
    #[arg(long = "sub-project", short = 's', value_name = "NAME")]
    pub sub_project: Option<String>,

    /// Compare reference contents byte for byte (default from config)
    #[arg(long = "deep")]
    pub deep: bool,

    /// Output as JSON instead of text
    #[arg(long = "json", short = 'j')]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct InfoArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Output as JSON instead of text
    #[arg(long = "json", short = 'j')]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct PathArgs {
    #[command(flatten)]
    pub scene: SceneArgs,

    /// Version number (1-based); the latest when omitted
    #[arg(long = "version", short = 'n', conflicts_with = "reference")]
    pub version: Option<usize>,

    /// Print the reference file instead of a version
    #[arg(long = "reference", short = 'r')]
    pub reference: bool,

    /// Open even if the host reports unsaved changes
    #[arg(long = "force")]
    pub force: bool,
}

pub fn run_init(ctx: &Context) -> anyhow::Result<()> {
    let ledger = ctx.ledger(WorkingFileHost::read_only())?;
    ledger.init_project()?;
    println!("Initialized project at {}", ledger.layout().root().display());
    Ok(())
}

pub fn run_new(ctx: &Context, args: NewArgs) -> anyhow::Result<()> {
    let ledger = ctx.ledger(WorkingFileHost::new(&args.file))?;
    let saved = ledger.save_new_scene(NewScene {
        category: &args.scene.category,
        user: &args.user,
        shot_name: &args.scene.name,
        sub_project: args.scene.sub_project.as_deref(),
        make_reference: args.reference,
        notes: &args.notes,
    })?;
    print_saved(&saved, ctx.config.version_padding);
    Ok(())
}

pub fn run_version(ctx: &Context, args: VersionArgs) -> anyhow::Result<()> {
    let ledger = ctx.ledger(WorkingFileHost::new(&args.file))?;
    let saved = match (&args.at, &args.name, &args.category) {
        (Some(at), _, _) => ledger.save_version_at(at, &args.user, args.reference, &args.notes)?,
        (None, Some(name), Some(category)) => {
            let id = SceneId::new(category, args.sub_project.clone(), normalize_name(name)?);
            ledger.save_version(&id, &args.user, args.reference, &args.notes)?
        }
        _ => anyhow::bail!("either a scene name with --category, or --at, is required"),
    };
    print_saved(&saved, ctx.config.version_padding);
    Ok(())
}

pub fn run_promote(ctx: &Context, args: PromoteArgs) -> anyhow::Result<()> {
    let ledger = ctx.ledger(WorkingFileHost::read_only())?;
    let id = args.scene.id()?;
    let reference = ledger.make_reference(&id, args.version)?;
    println!(
        "{id}: reference now mirrors {}",
        scenekeep_ledger::naming::version_label(args.version, ctx.config.version_padding)
    );
    println!("{}", reference.display());
    Ok(())
}

pub fn run_status(ctx: &Context, args: StatusArgs) -> anyhow::Result<()> {
    let ledger = ctx.ledger(WorkingFileHost::read_only())?;
    let deep = args.deep || ctx.config.deep_check;
    let rows = ledger.survey(&args.category, args.sub_project.as_deref(), deep)?;

    if args.json {
        let json = serde_json::json!({
            "category": args.category,
            "sub_project": args.sub_project,
            "deep": deep,
            "scenes": rows.iter().map(|row| serde_json::json!({
                "name": row.name,
                "metadata_file": row.metadata_file,
                "versions": row.versions,
                "referenced_version": row.referenced_version,
                "status": row.status.as_str(),
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No scenes in {}", args.category);
        return Ok(());
    }
    for row in rows {
        let versions = row
            .versions
            .map_or_else(|| "-".to_string(), |n| format!("{n}"));
        let reference = row
            .referenced_version
            .map(|n| format!("ref v{n}"))
            .unwrap_or_default();
        println!(
            "{:<24} {versions:>4} {reference:<8} {}",
            row.name, row.status
        );
    }
    Ok(())
}

pub fn run_info(ctx: &Context, args: InfoArgs) -> anyhow::Result<()> {
    let ledger = ctx.ledger(WorkingFileHost::read_only())?;
    let info = ledger.scene_info(&args.scene.id()?)?;

    if args.json {
        let json = serde_json::json!({
            "scene": info.id.to_string(),
            "creator": info.creator,
            "creator_host": info.creator_host,
            "reference_file": info.reference_file,
            "referenced_version": info.referenced_version,
            "selected_version": info.selected_version,
            "versions": info.versions.iter().map(|v| serde_json::json!({
                "version": v.version,
                "label": v.label,
                "file": v.file,
                "notes": v.notes,
                "author": v.author,
                "host": v.host,
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("{}", info.id);
    println!("  creator:   {}@{}", info.creator, info.creator_host);
    match (&info.reference_file, info.referenced_version) {
        (Some(file), Some(version)) => {
            println!("  reference: v{version} {}", file.display());
        }
        (Some(file), None) => println!("  reference: {}", file.display()),
        _ => println!("  reference: none"),
    }
    for v in &info.versions {
        let marker = if v.version == info.selected_version {
            '*'
        } else {
            ' '
        };
        let host = v.host.as_deref().unwrap_or("-");
        println!("{marker} {}  {}  {host}  {}", v.label, v.author, v.notes);
    }
    Ok(())
}

pub fn run_path(ctx: &Context, args: PathArgs) -> anyhow::Result<()> {
    let ledger = ctx.ledger(WorkingFileHost::read_only())?;
    let id = args.scene.id()?;
    let file = if args.reference {
        ledger.load_reference(&id)?
    } else {
        let index = match args.version {
            Some(0) => return Err(CliError::ZeroVersion.into()),
            Some(v) => Some(v - 1),
            None => None,
        };
        ledger.load_scene(&id, index, args.force)?
    };
    println!("{}", file.display());
    Ok(())
}

fn print_saved(saved: &SavedScene, padding: usize) {
    println!(
        "{}: saved {}",
        saved.id,
        scenekeep_ledger::naming::version_label(saved.version, padding)
    );
    println!("{}", saved.scene_file.display());
    if let Some(reference) = &saved.reference_file {
        println!("reference: {}", reference.display());
    }
}
