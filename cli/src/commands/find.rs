//! File and directory search commands

use super::{build_engine, SearchArgs};
use crate::output::print_paths;
use anyhow::{Context, Result};
use clap::Args;
use filewise_core::{FilewiseConfig, SearchTarget};
use tracing::info;

/// Arguments for `filewise find`
#[derive(Debug, Clone, Args)]
pub struct FindArgs {
    #[command(flatten)]
    pub search: SearchArgs,
}

/// Arguments for `filewise dirs`
#[derive(Debug, Clone, Args)]
pub struct DirsArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Report directories containing matching files instead of matching directory names
    #[arg(long)]
    pub containing: bool,
}

/// List files whose names match
pub fn find_command(args: FindArgs, config: &FilewiseConfig) -> Result<()> {
    let request = args.search.to_request(config);
    info!(root = %request.root.display(), "Searching for files");

    let result = build_engine(config)
        .search(&request)
        .with_context(|| format!("Search failed under {}", request.root.display()))?;

    print_paths(&result.paths, args.search.json)
}

/// List matching directories, or the parents of matching files
pub fn dirs_command(args: DirsArgs, config: &FilewiseConfig) -> Result<()> {
    let target = if args.containing {
        SearchTarget::ParentDirectories
    } else {
        SearchTarget::Directories
    };
    let request = args.search.to_request(config).with_target(target);
    info!(root = %request.root.display(), ?target, "Searching for directories");

    let result = build_engine(config)
        .search(&request)
        .with_context(|| format!("Search failed under {}", request.root.display()))?;

    print_paths(&result.paths, args.search.json)
}
