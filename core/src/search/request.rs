//! Search request and its builder-style configuration

use super::cancel::CancellationToken;
use crate::flatten::{flatten, Nested};
use crate::pattern::MatchMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What kind of path a search reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTarget {
    /// Files whose names match
    #[default]
    Files,
    /// Directories whose names match
    Directories,
    /// Directories that contain at least one matching file
    ParentDirectories,
}

/// Extension allow-list or deny-list applied to files
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionFilter {
    #[default]
    Any,
    /// Keep only files with one of these extensions
    Include(Vec<String>),
    /// Drop files with one of these extensions
    Skip(Vec<String>),
}

impl ExtensionFilter {
    pub fn include(extensions: impl Into<Nested>) -> Self {
        Self::Include(normalize_extensions(extensions))
    }

    pub fn skip(extensions: impl Into<Nested>) -> Self {
        Self::Skip(normalize_extensions(extensions))
    }

    /// Whether a file called `name` passes the filter
    pub fn allows(&self, name: &str) -> bool {
        match self {
            ExtensionFilter::Any => true,
            ExtensionFilter::Include(exts) => exts.iter().any(|ext| has_extension(name, ext)),
            ExtensionFilter::Skip(exts) => !exts.iter().any(|ext| has_extension(name, ext)),
        }
    }
}

/// Lowercase, strip leading dots and drop empty entries
fn normalize_extensions(extensions: impl Into<Nested>) -> Vec<String> {
    flatten(extensions)
        .into_iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

/// `name` ends with `.ext` and has a non-empty stem (ASCII case-insensitive).
///
/// Multi-part extensions such as `tar.gz` work because only the name suffix
/// is inspected.
pub(crate) fn has_extension(name: &str, ext: &str) -> bool {
    let name = name.to_ascii_lowercase();
    if name.len() <= ext.len() + 1 || !name.ends_with(ext) {
        return false;
    }
    name.as_bytes()[name.len() - ext.len() - 1] == b'.'
}

/// Everything needed to run one tree search
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Directory the walk starts from
    pub root: PathBuf,

    /// Include patterns, OR-combined; empty means match everything
    pub patterns: Vec<String>,

    /// Explicit match mode; `None` derives the mode from `*` markers
    pub match_mode: Option<MatchMode>,

    /// Extension allow/deny list for files
    pub extensions: ExtensionFilter,

    /// Directory-name patterns whose subtrees are pruned
    pub exclude_dirs: Vec<String>,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Maximum depth below the root when recursive
    pub max_depth: Option<usize>,

    /// What kind of path to report
    pub target: SearchTarget,

    /// Case-sensitive name matching
    pub case_sensitive: bool,

    /// Follow symbolic links while walking
    pub follow_links: bool,

    /// Skip paths ignored by `.gitignore` files
    pub respect_gitignore: bool,

    /// Include entries whose names start with `.`
    pub include_hidden: bool,

    /// Log and count unreadable entries instead of failing the search
    pub skip_unreadable: bool,

    /// Cooperative cancellation signal
    pub cancel: Option<CancellationToken>,
}

impl SearchRequest {
    /// Create a request that reports every file below `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            patterns: Vec::new(),
            match_mode: None,
            extensions: ExtensionFilter::Any,
            exclude_dirs: Vec::new(),
            recursive: true,
            max_depth: None,
            target: SearchTarget::Files,
            case_sensitive: true,
            follow_links: false,
            respect_gitignore: false,
            include_hidden: true,
            skip_unreadable: false,
            cancel: None,
        }
    }

    /// Set include patterns (a string or nested sequences of strings)
    pub fn with_patterns(mut self, patterns: impl Into<Nested>) -> Self {
        self.patterns = flatten(patterns);
        self
    }

    /// Force a match mode instead of deriving it from `*` markers
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = Some(mode);
        self
    }

    /// Keep only files with these extensions
    pub fn with_extensions(mut self, extensions: impl Into<Nested>) -> Self {
        self.extensions = ExtensionFilter::include(extensions);
        self
    }

    /// Drop files with these extensions
    pub fn skip_extensions(mut self, extensions: impl Into<Nested>) -> Self {
        self.extensions = ExtensionFilter::skip(extensions);
        self
    }

    /// Prune directories whose names match any of these patterns
    pub fn exclude_dirs(mut self, patterns: impl Into<Nested>) -> Self {
        self.exclude_dirs = flatten(patterns);
        self
    }

    /// Only visit the immediate children of the root
    pub fn top_only(mut self) -> Self {
        self.recursive = false;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_target(mut self, target: SearchTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    pub fn with_hidden_files(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn with_skip_unreadable(mut self, skip: bool) -> Self {
        self.skip_unreadable = skip;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Effective walk depth, `None` meaning unlimited
    pub(crate) fn depth_limit(&self) -> Option<usize> {
        if self.recursive {
            self.max_depth
        } else {
            Some(1)
        }
    }
}
