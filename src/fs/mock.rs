// src/fs/mock.rs

use super::FileSystem;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory filesystem for tests.
///
/// Paths are stored exactly as given (after dropping a leading `./`), so tests
/// should query with the same relative or absolute form they inserted.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    paths: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut paths = HashSet::new();
        paths.insert(normalize(Path::new(".")));

        Self {
            paths: Arc::new(Mutex::new(paths)),
        }
    }

    /// Make `path` and its parent directories exist.
    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        let mut paths = self.paths.lock().unwrap();

        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            paths.insert(dir.to_path_buf());
            parent = dir.parent();
        }

        paths.insert(path);
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        self.paths.lock().unwrap().remove(&path);
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.strip_prefix(".")
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.paths.lock().unwrap().contains(&normalize(path))
    }
}
