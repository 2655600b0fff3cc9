//! # filewise Core
//!
//! Pattern-driven file discovery and collision-free bulk renaming.
//!
//! Patterns compile into cached matchers, the search engine walks a tree
//! with include patterns, extension filters and pruned directories, and the
//! rename resolver turns search results into an ordered plan that never
//! clobbers a file it was not asked to replace.

// Core modules
pub mod config;
pub mod error;
pub mod flatten;
pub mod fs;
pub mod pattern;
pub mod rename;
pub mod search;

// Re-export commonly used types
pub use config::FilewiseConfig;
pub use error::{Error, PatternError, RenameError, Result, SearchError};
pub use flatten::{flatten, Nested};
pub use fs::{FileSystem, StdFileSystem};
pub use pattern::{MatchMode, Matcher, MatcherCache, Pattern};
pub use rename::{execute_plan, plan_renames, RenameOptions, RenamePlan, RenameStep};
pub use search::{
    list_extensions, search, CancellationToken, SearchEngine, SearchRequest, SearchResult,
    SearchTarget,
};

/// Current version of the filewise-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing at `debug` or `info`, unless `RUST_LOG` says otherwise.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing_with_debug(debug: bool) {
    let fallback = if debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
