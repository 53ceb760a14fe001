//! Managed-file registry (`blackbox-files.txt`).

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::{read_lines, write_lines};
use crate::core::types::ManagedPath;
use crate::error::{Result, ValidationError};

/// Plaintext paths under envelope management.
///
/// Membership here is the only thing that makes a file "managed". The file
/// is rewritten sorted and de-duplicated on every save.
#[derive(Debug, Clone)]
pub struct FileRegistry {
    path: PathBuf,
    files: BTreeSet<ManagedPath>,
}

impl FileRegistry {
    /// Load the registry at `path` (absolute).
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Missing` if the file does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let files: BTreeSet<_> = read_lines(&path)?.into_iter().collect();
        debug!(path = %path.display(), files = files.len(), "managed files loaded");
        Ok(Self { path, files })
    }

    /// Load, or start empty when the file does not exist yet.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self {
                path,
                files: BTreeSet::new(),
            })
        }
    }

    /// Add `path` and persist, renormalizing the file even when `path` was
    /// already present. Returns whether it was new.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidInput` if `path` fails
    /// [`check_entry`].
    pub fn register(&mut self, path: &str) -> Result<bool> {
        check_entry(path)?;
        let added = self.files.insert(path.to_string());
        self.save()?;
        debug!(path, added, "registered");
        Ok(added)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains(path)
    }

    /// Managed paths in lexicographic order.
    pub fn list(&self) -> Vec<ManagedPath> {
        self.files.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Every proper ancestor directory of every managed path.
    pub fn ancestor_directories(&self) -> BTreeSet<String> {
        ancestor_directories(self.files.iter().map(String::as_str))
    }

    fn save(&self) -> Result<()> {
        write_lines(&self.path, &self.files)
    }
}

/// Reject an entry that is not a plain relative path inside the
/// repository: absolute paths, `..`, `.` and drive prefixes all fail.
///
/// Entries are not checked on load so one bad line cannot hide the rest;
/// callers check each entry before touching the filesystem.
pub fn check_entry(entry: &str) -> Result<()> {
    let inside = !entry.is_empty()
        && Path::new(entry)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if inside {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            entry,
            "managed paths must be relative and stay inside the repository",
        )
        .into())
    }
}

/// Every proper ancestor directory of the given `/`-separated paths,
/// de-duplicated and sorted.
pub fn ancestor_directories<'a>(paths: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    let mut dirs = BTreeSet::new();
    for path in paths {
        let mut end = path.len();
        while let Some(idx) = path[..end].rfind('/') {
            if idx == 0 {
                break;
            }
            if !dirs.insert(path[..idx].to_string()) {
                // Shorter prefixes are already present too.
                break;
            }
            end = idx;
        }
    }
    dirs
}
