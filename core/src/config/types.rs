//! Configuration types for filewise core
//!
//! Core only accepts fully resolved configuration.
//! File discovery and flag merging happen in the CLI layer.

use crate::pattern::cache::DEFAULT_CACHE_CAPACITY;
use crate::pattern::{MatcherCache, DEFAULT_WORD_SEPARATORS};
use crate::rename::{RenameOptions, DEFAULT_COUNTER_SEPARATOR, DEFAULT_MAX_RETRIES};
use crate::search::SearchRequest;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilewiseConfig {
    pub search: SearchDefaults,
    pub rename: RenameDefaults,
    pub cache: CacheSettings,
}

/// Defaults applied to every search before command-line flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    /// Root used when a command is given none (`~` and `$VAR` allowed)
    pub root: Option<String>,
    /// Directory patterns always pruned
    pub exclude_dirs: Vec<String>,
    /// Extensions always skipped
    pub skip_extensions: Vec<String>,
    pub case_sensitive: bool,
    pub follow_links: bool,
    pub respect_gitignore: bool,
    pub include_hidden: bool,
    /// Log unreadable directories instead of failing the search
    pub skip_unreadable: bool,
    pub max_depth: Option<usize>,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            root: None,
            exclude_dirs: Vec::new(),
            skip_extensions: Vec::new(),
            case_sensitive: true,
            follow_links: false,
            respect_gitignore: false,
            include_hidden: true,
            skip_unreadable: false,
            max_depth: None,
        }
    }
}

impl SearchDefaults {
    /// Copy these defaults onto `request`
    pub fn apply(&self, mut request: SearchRequest) -> SearchRequest {
        if !self.exclude_dirs.is_empty() {
            request = request.exclude_dirs(self.exclude_dirs.clone());
        }
        if !self.skip_extensions.is_empty() {
            request = request.skip_extensions(self.skip_extensions.clone());
        }
        request.max_depth = self.max_depth;
        request
            .with_case_sensitive(self.case_sensitive)
            .with_follow_links(self.follow_links)
            .with_gitignore(self.respect_gitignore)
            .with_hidden_files(self.include_hidden)
            .with_skip_unreadable(self.skip_unreadable)
    }
}

/// Defaults for rename planning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameDefaults {
    pub overwrite: bool,
    pub max_retries: usize,
    pub separator: String,
}

impl Default for RenameDefaults {
    fn default() -> Self {
        Self {
            overwrite: false,
            max_retries: DEFAULT_MAX_RETRIES,
            separator: DEFAULT_COUNTER_SEPARATOR.to_string(),
        }
    }
}

impl From<&RenameDefaults> for RenameOptions {
    fn from(defaults: &RenameDefaults) -> Self {
        RenameOptions::default()
            .with_overwrite(defaults.overwrite)
            .with_max_retries(defaults.max_retries)
            .with_separator(defaults.separator.clone())
    }
}

/// Matcher cache sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub capacity: usize,
    /// Characters that delimit words for whole-word matching
    pub word_separators: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            word_separators: DEFAULT_WORD_SEPARATORS.to_string(),
        }
    }
}

impl CacheSettings {
    pub fn build(&self) -> MatcherCache {
        MatcherCache::with_separators(self.capacity, self.word_separators.clone())
    }
}
