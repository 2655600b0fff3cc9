//! Filesystem primitives consumed by rename planning and execution

use std::io;
use std::path::Path;

/// The small set of filesystem operations the rename resolver relies on
pub trait FileSystem {
    /// Whether anything (file, directory or dangling symlink) exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Rename a single path, replacing `to` if the platform allows it
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`FileSystem`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }
}
