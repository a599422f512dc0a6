// src/suite.rs

//! Translation of spec file paths into suite identifiers.
//!
//! The execution engine addresses suites by their location below the suite
//! root without an extension: `spec/javascripts/foo/bar.js` becomes
//! `/foo/bar`.

use std::fmt;
use std::path::{Component, Path};

/// Default spec file extensions, longest first so compound extensions like
/// `js.coffee` win over `coffee`.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js.coffee", "coffee", "js"];

/// Logical name of a test suite, e.g. `/foo/bar`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiteId(String);

impl SuiteId {
    /// Derive a suite identifier from a path below `suite_root`.
    ///
    /// Returns `None` when `path` does not live under `suite_root` or when
    /// nothing is left after stripping the root and extension.
    pub fn from_path(path: &Path, suite_root: &Path, extensions: &[String]) -> Option<Self> {
        let path = strip_cur_dir(path);
        let root = strip_cur_dir(suite_root);

        let rel = path.strip_prefix(root).ok()?;

        let parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let (file, dirs) = parts.split_last()?;
        let stem = strip_extension(file, extensions);
        if stem.is_empty() {
            return None;
        }

        let mut id = String::new();
        for dir in dirs {
            id.push('/');
            id.push_str(dir);
        }
        id.push('/');
        id.push_str(stem);

        Some(SuiteId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SuiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SuiteId {
    fn from(s: &str) -> Self {
        SuiteId(s.to_string())
    }
}

fn strip_cur_dir(path: &Path) -> &Path {
    path.strip_prefix(".").unwrap_or(path)
}

/// Remove the first matching configured extension; fall back to the last
/// `.ext` of the file name.
fn strip_extension<'a>(file: &'a str, extensions: &[String]) -> &'a str {
    let mut sorted: Vec<&String> = extensions.iter().collect();
    sorted.sort_by_key(|e| std::cmp::Reverse(e.len()));

    for ext in sorted {
        let ext = ext.trim_start_matches('.');
        if let Some(stem) = file.strip_suffix(ext).and_then(|s| s.strip_suffix('.')) {
            return stem;
        }
    }

    match file.rfind('.') {
        Some(0) | None => file,
        Some(idx) => &file[..idx],
    }
}

/// Which suites the engine should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuiteSelection {
    All,
    Only(Vec<SuiteId>),
}

impl SuiteSelection {
    /// An empty list means "run everything".
    pub fn from_ids(ids: Vec<SuiteId>) -> Self {
        if ids.is_empty() {
            SuiteSelection::All
        } else {
            SuiteSelection::Only(ids)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, SuiteSelection::All)
    }
}
