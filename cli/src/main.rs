//! # filewise CLI
//!
//! Command-line interface for filewise.
//!
//! ## Usage
//!
//! - `filewise find ROOT -p 'data*' -e nc` - List matching files
//! - `filewise dirs ROOT --containing -e pdf` - List directories holding matches
//! - `filewise extensions ROOT` - List the file extensions present
//! - `filewise rename ROOT -p '*.jpeg' --replace .jpeg .jpg --dry-run` - Plan or apply renames

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod output;

use commands::{
    dirs_command, extensions_command, find_command, rename_command, DirsArgs, ExtensionsArgs,
    FindArgs, RenameArgs,
};
use config::CliConfigLoader;

/// filewise - find files by name and rename them without collisions
#[derive(Parser)]
#[command(name = "filewise")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find files by name pattern and apply collision-free bulk renames")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files whose names match
    Find(FindArgs),

    /// List matching directories
    Dirs(DirsArgs),

    /// List distinct file extensions
    Extensions(ExtensionsArgs),

    /// Rename matching files
    Rename(RenameArgs),
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    loader
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    filewise_core::init_tracing_with_debug(cli.verbose);

    let config = build_config_loader(&cli).load()?;

    match cli.command {
        Commands::Find(args) => find_command(args, &config),
        Commands::Dirs(args) => dirs_command(args, &config),
        Commands::Extensions(args) => extensions_command(args, &config),
        Commands::Rename(args) => rename_command(args, &config),
    }
}
