//! Configuration module for filewise core
//!
//! Only exports pure data types. All loading logic is in the CLI layer.

pub mod types;

pub use types::{CacheSettings, FilewiseConfig, RenameDefaults, SearchDefaults};
