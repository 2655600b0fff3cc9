//! Name derivation for disambiguated and staged targets

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const STAGING_SUFFIX: &str = "filewise-tmp";

/// `dir/stem.ext` becomes `dir/stem{separator}{n}.ext`.
///
/// Only the last extension is kept after the counter, so `a.tar.gz` turns
/// into `a.tar_1.gz`. Names without an extension (including dotfiles such as
/// `.env`) get the counter appended.
pub fn with_counter(path: &Path, n: usize, separator: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_default();

    let mut name = OsString::with_capacity(stem.len() + separator.len() + 8);
    name.push(&stem);
    name.push(separator);
    name.push(n.to_string());
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }

    path.with_file_name(name)
}

/// Hidden, uuid-tagged sibling of `target` used to park a file mid-plan
pub fn staging_name(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tag = Uuid::new_v4().simple();

    target.with_file_name(format!(".{name}.{tag}.{STAGING_SUFFIX}"))
}
