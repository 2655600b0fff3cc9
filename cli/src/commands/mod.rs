//! CLI command implementations

pub mod extensions;
pub mod find;
pub mod rename;

pub use extensions::{extensions_command, ExtensionsArgs};
pub use find::{dirs_command, find_command, DirsArgs, FindArgs};
pub use rename::{rename_command, RenameArgs};

use clap::Args;
use filewise_core::{FilewiseConfig, MatchMode, SearchEngine, SearchRequest};
use std::path::PathBuf;
use std::sync::Arc;

/// Search flags shared by every command
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Directory to search (defaults to the configured root, then ".")
    pub root: Option<PathBuf>,

    /// Name pattern; `*` marks the open end (`data*`, `*.nc`, `a*z`). Repeatable
    #[arg(short = 'p', long = "pattern", value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Force a match mode: exact, prefix, suffix, both or word
    #[arg(short = 'm', long)]
    pub mode: Option<MatchMode>,

    /// Only keep files with this extension. Repeatable
    #[arg(short = 'e', long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Drop files with this extension. Repeatable
    #[arg(long = "skip-ext", value_name = "EXT", conflicts_with = "extensions")]
    pub skip_extensions: Vec<String>,

    /// Prune directories whose names match this pattern. Repeatable
    #[arg(short = 'x', long = "exclude", value_name = "DIR")]
    pub exclude_dirs: Vec<String>,

    /// Only look at the immediate children of the root
    #[arg(long)]
    pub top_only: bool,

    /// Maximum depth below the root
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Match names case-insensitively
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_links: bool,

    /// Skip paths ignored by .gitignore files
    #[arg(long)]
    pub gitignore: bool,

    /// Skip entries whose names start with '.'
    #[arg(long)]
    pub no_hidden: bool,

    /// Warn about unreadable directories instead of failing
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    /// Merge configured defaults and flags into a request
    pub fn to_request(&self, config: &FilewiseConfig) -> SearchRequest {
        let root = self
            .root
            .clone()
            .or_else(|| config.search.root.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        let mut request = config
            .search
            .apply(SearchRequest::new(root))
            .with_patterns(self.patterns.clone());

        if let Some(mode) = self.mode {
            request = request.with_match_mode(mode);
        }

        let mut excludes = config.search.exclude_dirs.clone();
        excludes.extend(self.exclude_dirs.iter().cloned());
        request = request.exclude_dirs(excludes);

        if !self.extensions.is_empty() {
            request = request.with_extensions(self.extensions.clone());
        } else if !self.skip_extensions.is_empty() {
            let mut skip = config.search.skip_extensions.clone();
            skip.extend(self.skip_extensions.iter().cloned());
            request = request.skip_extensions(skip);
        }

        if self.top_only {
            request = request.top_only();
        }
        if let Some(depth) = self.max_depth {
            request = request.with_max_depth(depth);
        }
        if self.ignore_case {
            request = request.with_case_sensitive(false);
        }
        if self.follow_links {
            request = request.with_follow_links(true);
        }
        if self.gitignore {
            request = request.with_gitignore(true);
        }
        if self.no_hidden {
            request = request.with_hidden_files(false);
        }
        if self.skip_unreadable {
            request = request.with_skip_unreadable(true);
        }

        request
    }
}

/// Search engine whose matcher cache follows the configuration
pub fn build_engine(config: &FilewiseConfig) -> SearchEngine {
    SearchEngine::new(Arc::new(config.cache.build()))
}
