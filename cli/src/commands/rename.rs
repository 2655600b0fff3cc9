//! Bulk rename command

use super::{build_engine, SearchArgs};
use crate::output::print_plan;
use anyhow::{bail, Context, Result};
use clap::Args;
use filewise_core::{
    execute_plan, plan_renames, FilewiseConfig, RenameOptions, SearchTarget, StdFileSystem,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for `filewise rename`
#[derive(Debug, Clone, Args)]
pub struct RenameArgs {
    #[command(flatten)]
    pub search: SearchArgs,

    /// Replace FROM with TO in every matched file name
    #[arg(
        long,
        num_args = 2,
        value_names = ["FROM", "TO"],
        conflicts_with = "sequence",
        required_unless_present = "sequence"
    )]
    pub replace: Option<Vec<String>>,

    /// Rename matched files to PREFIX followed by a zero-padded counter
    #[arg(long, value_name = "PREFIX")]
    pub sequence: Option<String>,

    /// First counter value for --sequence
    #[arg(long, default_value_t = 1, requires = "sequence")]
    pub start: usize,

    /// Counter width for --sequence
    #[arg(long, default_value_t = 3, requires = "sequence")]
    pub width: usize,

    /// Replace existing files that are not part of the batch
    #[arg(long)]
    pub overwrite: bool,

    /// Show the plan without touching the filesystem
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

/// How a matched file's new name is derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameRule {
    Replace { from: String, to: String },
    Sequence { prefix: String, start: usize, width: usize },
}

impl NameRule {
    fn from_args(args: &RenameArgs) -> Result<Self> {
        match (&args.replace, &args.sequence) {
            (Some(pair), None) => match pair.as_slice() {
                [from, _] if from.is_empty() => bail!("--replace needs a non-empty FROM"),
                [from, to] => Ok(NameRule::Replace {
                    from: from.clone(),
                    to: to.clone(),
                }),
                _ => bail!("--replace takes exactly two values"),
            },
            (None, Some(prefix)) => Ok(NameRule::Sequence {
                prefix: prefix.clone(),
                start: args.start,
                width: args.width,
            }),
            _ => bail!("Specify exactly one of --replace or --sequence"),
        }
    }

    /// Target for the `index`-th source; only the file name changes
    pub fn apply(&self, source: &Path, index: usize) -> PathBuf {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        match self {
            NameRule::Replace { from, to } => source.with_file_name(name.replace(from, to)),
            NameRule::Sequence {
                prefix,
                start,
                width,
            } => {
                let extension = source
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                source.with_file_name(format!(
                    "{prefix}{:0width$}{extension}",
                    start + index,
                    width = *width
                ))
            }
        }
    }
}

/// Rename every matched file according to the chosen rule
pub fn rename_command(args: RenameArgs, config: &FilewiseConfig) -> Result<()> {
    let rule = NameRule::from_args(&args)?;
    let request = args
        .search
        .to_request(config)
        .with_target(SearchTarget::Files);

    let sources = build_engine(config)
        .search(&request)
        .with_context(|| format!("Search failed under {}", request.root.display()))?
        .into_paths();
    info!(matched = sources.len(), ?rule, "Planning renames");

    let mut options = RenameOptions::from(&config.rename);
    if args.overwrite {
        options.overwrite = true;
    }

    let plan = plan_renames(
        &sources,
        |source, index| rule.apply(source, index),
        &options,
        &StdFileSystem,
    )
    .context("Could not plan renames")?;

    if args.dry_run {
        return print_plan(&plan, true, None, args.search.json);
    }

    let report = execute_plan(&plan, &StdFileSystem).context("Rename failed")?;
    print_plan(&plan, false, Some(&report), args.search.json)
}
