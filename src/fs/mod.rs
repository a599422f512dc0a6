// src/fs/mod.rs

use std::fmt::Debug;
use std::path::Path;

pub mod mock;

/// Abstract filesystem interface.
///
/// The runner only needs to know whether a changed path still exists (an
/// editor may have deleted or renamed it between the event and the run), so
/// the surface is kept small.
pub trait FileSystem: Send + Sync + Debug {
    fn exists(&self, path: &Path) -> bool;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_fs_sees_files_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let spec = dir.path().join("a_spec.js");
        assert!(!RealFileSystem.exists(&spec));

        std::fs::write(&spec, "describe()").unwrap();
        assert!(RealFileSystem.exists(&spec));
        assert!(RealFileSystem.exists(dir.path()));
    }
}
