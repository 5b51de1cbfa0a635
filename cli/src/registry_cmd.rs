//! Registry commands: `sub-project`, `category`, `user`.

use clap::{Parser, Subcommand};
use scenekeep_ledger::WorkingFileHost;

use crate::Context;

#[derive(Debug, Parser)]
pub struct SubProjectCli {
    #[command(subcommand)]
    pub command: SubProjectSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum SubProjectSubcommand {
    /// Register a sub-project shared by all categories
    Add {
        /// Sub-project name
        name: String,
    },
    /// List sub-projects with their index
    List,
}

#[derive(Debug, Parser)]
pub struct CategoryCli {
    #[command(subcommand)]
    pub command: CategorySubcommand,
}

#[derive(Debug, Subcommand)]
pub enum CategorySubcommand {
    /// Add a category
    Add {
        /// Category name
        name: String,
    },
    /// Remove a category; scenes filed under it are kept on disk
    Remove {
        /// Category name
        name: String,
    },
    /// List categories
    List,
}

#[derive(Debug, Parser)]
pub struct UserCli {
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum UserSubcommand {
    /// Register a user
    Add {
        /// Display name
        name: String,
        /// Initials used in version file names
        initials: String,
    },
    /// Remove a user
    Remove {
        /// Display name
        name: String,
    },
    /// List users and their initials
    List,
}

pub fn run_sub_project(ctx: &Context, cli: SubProjectCli) -> anyhow::Result<()> {
    let ledger = ctx.ledger(WorkingFileHost::read_only())?;
    let mut index = ledger.sub_projects()?;
    match cli.command {
        SubProjectSubcommand::Add { name } => {
            let position = index.create(&name)?;
            println!("Added sub-project #{position}");
        }
        SubProjectSubcommand::List => {
            for (position, name) in index.sub_projects().iter().enumerate() {
                println!("{:>3}  {name}", position + 1);
            }
        }
    }
    Ok(())
}

pub fn run_category(ctx: &Context, cli: CategoryCli) -> anyhow::Result<()> {
    let ledger = ctx.ledger(WorkingFileHost::read_only())?;
    let mut registry = ledger.categories()?;
    match cli.command {
        CategorySubcommand::Add { name } => {
            registry.add(&name)?;
            println!("Added category {name}");
        }
        CategorySubcommand::Remove { name } => {
            registry.remove(&name)?;
            println!("Removed category {name}");
        }
        CategorySubcommand::List => {
            for category in registry.categories() {
                println!("{category}");
            }
        }
    }
    Ok(())
}

pub fn run_user(ctx: &Context, cli: UserCli) -> anyhow::Result<()> {
    let ledger = ctx.ledger(WorkingFileHost::read_only())?;
    let mut registry = ledger.users()?;
    match cli.command {
        UserSubcommand::Add { name, initials } => {
            registry.add(&name, &initials)?;
            println!("Added user {name}");
        }
        UserSubcommand::Remove { name } => {
            registry.remove(&name)?;
            println!("Removed user {name}");
        }
        UserSubcommand::List => {
            for (name, initials) in registry.users() {
                println!("{initials:<6} {name}");
            }
        }
    }
    Ok(())
}
