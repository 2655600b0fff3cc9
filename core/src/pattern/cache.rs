//! Bounded cache of compiled matchers
//!
//! Entries are keyed by (pattern text, mode, case sensitivity) and never go
//! stale: a compiled matcher is a pure function of its key. The cache only
//! evicts to stay within capacity, dropping the least recently used entry.
//!
//! The entry map is an immutable snapshot behind an `ArcSwap`. Lookups load
//! the snapshot without locking and record recency through an atomic stamp.
//! Inserts serialise on a single mutex, copy the snapshot, and publish the
//! new map.

use super::{MatchMode, Matcher, Pattern, DEFAULT_WORD_SEPARATORS};
use crate::error::PatternError;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Default number of compiled matchers kept alive
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    mode: MatchMode,
    case_sensitive: bool,
}

type EntryMap = HashMap<CacheKey, Arc<CacheEntry>>;

#[derive(Debug)]
struct CacheEntry {
    matcher: Arc<Matcher>,
    last_used: AtomicU64,
}

/// Thread-safe, size-bounded matcher cache with LRU eviction
#[derive(Debug)]
pub struct MatcherCache {
    entries: ArcSwap<EntryMap>,
    insert_lock: Mutex<()>,
    capacity: usize,
    separators: String,
    clock: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl MatcherCache {
    /// Create a cache holding at most `capacity` matchers (minimum one)
    pub fn new(capacity: usize) -> Self {
        Self::with_separators(capacity, DEFAULT_WORD_SEPARATORS)
    }

    /// Create a cache whose whole-word matchers split on `separators`
    pub fn with_separators(capacity: usize, separators: impl Into<String>) -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
            insert_lock: Mutex::new(()),
            capacity: capacity.max(1),
            separators: separators.into(),
            clock: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Return the cached matcher for this key, compiling it on first use.
    ///
    /// Compilation failures are returned to the caller and never cached.
    pub fn compile(
        &self,
        text: &str,
        mode: MatchMode,
        case_sensitive: bool,
    ) -> Result<Arc<Matcher>, PatternError> {
        let key = CacheKey {
            text: text.to_string(),
            mode,
            case_sensitive,
        };

        if let Some(matcher) = self.lookup(&key) {
            return Ok(matcher);
        }

        let matcher = Arc::new(Matcher::compile(
            &Pattern::new(text, mode),
            case_sensitive,
            &self.separators,
        )?);
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(pattern = text, %mode, case_sensitive, "compiled matcher");

        let _guard = self
            .insert_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let current = self.entries.load_full();

        // Another thread may have inserted the same key while we compiled
        if let Some(entry) = current.get(&key) {
            entry.last_used.store(self.tick(), Ordering::Relaxed);
            return Ok(Arc::clone(&entry.matcher));
        }

        let mut next: EntryMap = (*current).clone();
        if next.len() >= self.capacity {
            self.evict_oldest(&mut next);
        }
        next.insert(
            key,
            Arc::new(CacheEntry {
                matcher: Arc::clone(&matcher),
                last_used: AtomicU64::new(self.tick()),
            }),
        );
        self.entries.store(Arc::new(next));

        Ok(matcher)
    }

    /// Compile a parsed pattern through the cache
    pub fn compile_pattern(
        &self,
        pattern: &Pattern,
        case_sensitive: bool,
    ) -> Result<Arc<Matcher>, PatternError> {
        self.compile(&pattern.text, pattern.mode, case_sensitive)
    }

    fn lookup(&self, key: &CacheKey) -> Option<Arc<Matcher>> {
        let entries = self.entries.load();
        let entry = entries.get(key)?;
        entry.last_used.store(self.tick(), Ordering::Relaxed);
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(Arc::clone(&entry.matcher))
    }

    fn evict_oldest(&self, entries: &mut EntryMap) {
        let oldest = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used.load(Ordering::Relaxed))
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            debug!(pattern = %key.text, mode = %key.mode, "evicting matcher");
            entries.remove(&key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn separators(&self) -> &str {
        &self.separators
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

impl Default for MatcherCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_returns_same_matcher_for_equal_key() {
        let cache = MatcherCache::new(8);
        let a = cache.compile("foo", MatchMode::Prefix, true).unwrap();
        let b = cache.compile("foo", MatchMode::Prefix, true).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_case_sensitivity_is_part_of_key() {
        let cache = MatcherCache::new(8);
        let sensitive = cache.compile("Foo", MatchMode::Exact, true).unwrap();
        let insensitive = cache.compile("Foo", MatchMode::Exact, false).unwrap();

        assert!(!Arc::ptr_eq(&sensitive, &insensitive));
        assert!(!sensitive.test("foo.txt"));
        assert!(insensitive.test("foo.txt"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_mode_is_part_of_key() {
        let cache = MatcherCache::new(8);
        let prefix = cache.compile("ab", MatchMode::Prefix, true).unwrap();
        let suffix = cache.compile("ab", MatchMode::Suffix, true).unwrap();

        assert!(prefix.test("abc"));
        assert!(!suffix.test("abc"));
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = MatcherCache::new(2);
        let first = cache.compile("a", MatchMode::Exact, true).unwrap();
        cache.compile("b", MatchMode::Exact, true).unwrap();

        // Touch "a" so "b" becomes the eviction candidate
        let again = cache.compile("a", MatchMode::Exact, true).unwrap();
        assert!(Arc::ptr_eq(&first, &again));

        cache.compile("c", MatchMode::Exact, true).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);

        let still_cached = cache.compile("a", MatchMode::Exact, true).unwrap();
        assert!(Arc::ptr_eq(&first, &still_cached));

        let misses_before = cache.stats().misses;
        cache.compile("b", MatchMode::Exact, true).unwrap();
        assert_eq!(cache.stats().misses, misses_before + 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = MatcherCache::new(4);
        assert!(cache.compile("", MatchMode::Exact, true).is_err());
        assert!(cache.compile("nomarker", MatchMode::Both, true).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_still_holds_one() {
        let cache = MatcherCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.compile("a", MatchMode::Exact, true).unwrap();
        cache.compile("b", MatchMode::Exact, true).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_hits_do_not_wait_for_inserts() {
        let cache = Arc::new(MatcherCache::new(8));
        let cached = cache.compile("warm", MatchMode::Prefix, true).unwrap();

        // Hold the insert side while another thread reads
        let _held = cache.insert_lock.lock().unwrap();
        let (tx, rx) = mpsc::channel();
        let reader = Arc::clone(&cache);
        thread::spawn(move || {
            let matcher = reader.compile("warm", MatchMode::Prefix, true).unwrap();
            tx.send(matcher).unwrap();
        });

        let hit = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(Arc::ptr_eq(&cached, &hit));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_concurrent_compiles() {
        let cache = Arc::new(MatcherCache::new(16));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for j in 0..50 {
                        let text = format!("p{}", (i + j) % 4);
                        let matcher = cache.compile(&text, MatchMode::Prefix, true).unwrap();
                        assert!(matcher.test(&format!("{text}_file")));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 4);
        assert!(cache.stats().misses >= 4);
    }
}
