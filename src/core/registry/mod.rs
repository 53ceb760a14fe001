//! Persisted registries.
//!
//! Both registries are plain newline-separated text files inside the keyring
//! directory so they diff cleanly in version control.

mod admins;
mod files;

pub use admins::AdminRegistry;
pub use files::{ancestor_directories, check_entry, FileRegistry};

use std::path::Path;

use crate::error::{RegistryError, Result};

/// Read lines, dropping blank ones and the line terminator. Content is
/// otherwise kept byte for byte. A missing file is `RegistryMissing`.
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            RegistryError::Missing(path.to_path_buf())
        } else {
            RegistryError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    Ok(contents
        .lines()
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.trim().is_empty())
        .map(String::from)
        .collect())
}

/// Write one entry per line, creating parent directories as needed.
fn write_lines<'a>(path: &Path, lines: impl IntoIterator<Item = &'a String>) -> Result<()> {
    let write_err = |source| RegistryError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    let mut contents = String::new();
    for line in lines {
        contents.push_str(line);
        contents.push('\n');
    }
    std::fs::write(path, contents).map_err(write_err)?;
    Ok(())
}
