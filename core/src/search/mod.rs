//! Pattern-based directory tree search
//!
//! A [`SearchRequest`] describes the root, include patterns, extension
//! filter and directory exclusions. [`SearchEngine::search`] walks the tree
//! depth-first, prunes excluded subtrees before descending into them, and
//! returns sorted, duplicate-free absolute paths.

pub mod cancel;
pub mod engine;
pub mod request;


// Export the main interfaces
pub use cancel::CancellationToken;
pub use engine::{list_extensions, search, SearchEngine, SearchResult, SearchStats};
pub use request::{ExtensionFilter, SearchRequest, SearchTarget};
