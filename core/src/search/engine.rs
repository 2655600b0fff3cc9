//! Core tree search engine

use super::request::{SearchRequest, SearchTarget};
use crate::error::{PatternError, Result, SearchError};
use crate::pattern::{Matcher, MatcherCache, Pattern};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Traversal counters collected during one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Directories entered, including the root
    pub directories_visited: usize,

    /// Entries yielded by the walk and tested against the filters
    pub entries_examined: usize,

    /// Subtrees skipped because their directory matched an exclusion
    pub pruned: usize,

    /// Entries that could not be read and were skipped
    pub errors: usize,
}

/// Sorted, duplicate-free absolute paths produced by a search
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub paths: Vec<PathBuf>,
    pub stats: SearchStats,
}

impl SearchResult {
    fn new(mut paths: Vec<PathBuf>, stats: SearchStats) -> Self {
        paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        paths.dedup();
        Self { paths, stats }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }

    /// Paths as display strings, in result order
    pub fn to_strings(&self) -> Vec<String> {
        self.paths
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect()
    }
}

impl IntoIterator for SearchResult {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

/// Pattern-driven directory tree search
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    cache: Arc<MatcherCache>,
}

impl SearchEngine {
    /// Create an engine that compiles patterns through `cache`
    pub fn new(cache: Arc<MatcherCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<MatcherCache> {
        &self.cache
    }

    /// Walk `request.root` depth-first and collect matching paths
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let root = resolve_root(&request.root)?;
        let includes = self.compile_includes(request)?;
        let excludes = self.compile_excludes(request)?;
        let exclude_all = request
            .exclude_dirs
            .iter()
            .any(|raw| Pattern::is_wildcard_only(raw));
        let gitignore = if request.respect_gitignore {
            build_gitignore(&root)
        } else {
            None
        };

        let mut walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(request.follow_links)
            .sort_by_file_name();
        if let Some(depth) = request.depth_limit() {
            walker = walker.max_depth(depth);
        }

        // Canonical paths of every directory entered, to break symlink cycles
        let canonical_root = root.canonicalize().unwrap_or_else(|_| root.clone());
        let mut visited = HashSet::from([canonical_root.clone()]);

        let mut pruned = 0;
        let mut stats = SearchStats {
            directories_visited: 1,
            ..SearchStats::default()
        };
        let mut found = Vec::new();

        let mut entries = walker.into_iter().filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            let is_dir = entry.file_type().is_dir() || is_linked_dir(entry);

            if !request.include_hidden && name.starts_with('.') {
                return false;
            }

            if let Some(gitignore) = &gitignore {
                let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
                if gitignore.matched(relative, is_dir).is_ignore() {
                    return false;
                }
            }

            if is_dir && (exclude_all || excludes.iter().any(|m| m.test(&name))) {
                debug!(path = %entry.path().display(), "pruning excluded directory");
                pruned += 1;
                return false;
            }

            true
        });

        while let Some(entry) = entries.next() {
            if let Some(token) = &request.cancel {
                if token.is_cancelled() {
                    return Err(SearchError::Cancelled {
                        examined: stats.entries_examined,
                    }
                    .into());
                }
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.loop_ancestor().is_some() => {
                    debug!(error = %e, "skipping symlink loop");
                    stats.errors += 1;
                    continue;
                }
                Err(e) if is_dangling(&e) || request.skip_unreadable => {
                    warn!(error = %e, "skipping unreadable entry");
                    stats.errors += 1;
                    continue;
                }
                Err(e) => {
                    return Err(SearchError::Walk {
                        path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone()),
                        message: e.to_string(),
                    }
                    .into());
                }
            };

            if entry.file_type().is_dir() {
                let canonical = entry.path().canonicalize().ok();
                let links_inside_root = entry.path_is_symlink()
                    && canonical
                        .as_ref()
                        .is_some_and(|target| target.starts_with(&canonical_root));

                // The real directory is walked under its own name
                if links_inside_root {
                    debug!(
                        path = %entry.path().display(),
                        "not descending into link inside root"
                    );
                    entries.skip_current_dir();
                } else if canonical.is_some_and(|target| !visited.insert(target)) {
                    debug!(path = %entry.path().display(), "directory already visited");
                    entries.skip_current_dir();
                } else {
                    stats.directories_visited += 1;
                }
            }

            stats.entries_examined += 1;
            let is_dir = entry.file_type().is_dir() || is_linked_dir(&entry);

            let name = entry.file_name().to_string_lossy();
            match request.target {
                SearchTarget::Files if !is_dir => {
                    if accepts_file(&includes, request, &name) {
                        found.push(entry.path().to_path_buf());
                    }
                }
                SearchTarget::Directories if is_dir => {
                    if matches_any(&includes, &name) {
                        found.push(entry.path().to_path_buf());
                    }
                }
                SearchTarget::ParentDirectories if !is_dir => {
                    if accepts_file(&includes, request, &name) {
                        if let Some(parent) = entry.path().parent() {
                            found.push(parent.to_path_buf());
                        }
                    }
                }
                _ => {}
            }
        }

        drop(entries);
        stats.pruned = pruned;
        let result = SearchResult::new(found, stats);

        info!(
            root = %root.display(),
            matched = result.len(),
            visited = result.stats.directories_visited,
            pruned = result.stats.pruned,
            "search complete"
        );

        Ok(result)
    }

    /// Unique extensions (with leading dot) of the files a search would match
    pub fn list_extensions(&self, request: &SearchRequest) -> Result<Vec<String>> {
        let request = SearchRequest {
            target: SearchTarget::Files,
            ..request.clone()
        };

        let extensions: BTreeSet<String> = self
            .search(&request)?
            .iter()
            .filter_map(|path| path.extension())
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .collect();

        Ok(extensions.into_iter().collect())
    }

    /// An empty list matches every name, as does a lone `*` without a forced mode
    fn compile_includes(
        &self,
        request: &SearchRequest,
    ) -> std::result::Result<Vec<Arc<Matcher>>, PatternError> {
        if request.match_mode.is_none()
            && request.patterns.iter().any(|raw| Pattern::is_wildcard_only(raw))
        {
            return Ok(Vec::new());
        }

        request
            .patterns
            .iter()
            .map(|raw| {
                let pattern = match request.match_mode {
                    Some(mode) => Pattern::new(raw.as_str(), mode),
                    None => Pattern::parse(raw, false),
                };
                self.cache.compile_pattern(&pattern, request.case_sensitive)
            })
            .collect()
    }

    /// Exclusions always derive their mode from `*` markers.
    /// Marker-only exclusions are handled by the caller.
    fn compile_excludes(
        &self,
        request: &SearchRequest,
    ) -> std::result::Result<Vec<Arc<Matcher>>, PatternError> {
        request
            .exclude_dirs
            .iter()
            .filter(|raw| !Pattern::is_wildcard_only(raw))
            .map(|raw| {
                self.cache
                    .compile_pattern(&Pattern::parse(raw, false), request.case_sensitive)
            })
            .collect()
    }
}

/// Search with a fresh engine and a private matcher cache
pub fn search(request: &SearchRequest) -> Result<SearchResult> {
    SearchEngine::default().search(request)
}

/// Unique file extensions below a root, see [`SearchEngine::list_extensions`]
pub fn list_extensions(request: &SearchRequest) -> Result<Vec<String>> {
    SearchEngine::default().list_extensions(request)
}

fn resolve_root(root: &Path) -> Result<PathBuf> {
    let root = std::path::absolute(root)?;
    if !root.is_dir() {
        return Err(SearchError::PathNotFound { path: root }.into());
    }
    Ok(root)
}

/// A followed link whose target no longer exists
fn is_dangling(error: &walkdir::Error) -> bool {
    error
        .io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

/// A symlink that is not being followed but points at a directory
fn is_linked_dir(entry: &DirEntry) -> bool {
    entry.path_is_symlink() && !entry.file_type().is_dir() && entry.path().is_dir()
}

fn matches_any(matchers: &[Arc<Matcher>], name: &str) -> bool {
    matchers.is_empty() || matchers.iter().any(|m| m.test(name))
}

fn accepts_file(includes: &[Arc<Matcher>], request: &SearchRequest, name: &str) -> bool {
    matches_any(includes, name) && request.extensions.allows(name)
}

fn build_gitignore(root: &Path) -> Option<Gitignore> {
    let mut builder = GitignoreBuilder::new(root);

    // Add .gitignore files walking up the directory tree
    let mut current = Some(root);
    while let Some(dir) = current {
        let gitignore_path = dir.join(".gitignore");
        if gitignore_path.exists() {
            if let Some(e) = builder.add(&gitignore_path) {
                warn!(
                    "Failed to parse .gitignore at {}: {}",
                    gitignore_path.display(),
                    e
                );
            }
        }
        current = dir.parent();
    }

    match builder.build() {
        Ok(gitignore) => Some(gitignore),
        Err(e) => {
            warn!("Failed to build gitignore matcher: {}", e);
            None
        }
    }
}
