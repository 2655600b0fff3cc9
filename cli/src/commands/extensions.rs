//! Extension inventory command

use super::{build_engine, SearchArgs};
use crate::output::print_extensions;
use anyhow::{Context, Result};
use clap::Args;
use filewise_core::FilewiseConfig;

/// Arguments for `filewise extensions`
#[derive(Debug, Clone, Args)]
pub struct ExtensionsArgs {
    #[command(flatten)]
    pub search: SearchArgs,
}

/// List the distinct extensions of matching files
pub fn extensions_command(args: ExtensionsArgs, config: &FilewiseConfig) -> Result<()> {
    let request = args.search.to_request(config);

    let extensions = build_engine(config)
        .list_extensions(&request)
        .with_context(|| format!("Search failed under {}", request.root.display()))?;

    print_extensions(&extensions, args.search.json)
}
