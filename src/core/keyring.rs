//! Keyring directory.
//!
//! The keyring directory holds the two registries and the distributed public
//! keys. It must never hold private key material.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::constants;
use crate::error::{KeyringError, Result};

/// Location of the keyring directory inside a repository.
#[derive(Debug, Clone)]
pub struct Keyring {
    root: PathBuf,
    relative: PathBuf,
}

impl Keyring {
    /// `relative` is the keyring directory relative to `root`.
    pub fn new(root: impl Into<PathBuf>, relative: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            relative: relative.into(),
        }
    }

    /// Absolute keyring directory.
    pub fn dir(&self) -> PathBuf {
        self.root.join(&self.relative)
    }

    /// Keyring directory relative to the repository root.
    pub fn relative_dir(&self) -> &Path {
        &self.relative
    }

    /// Admin registry, relative to the repository root.
    pub fn admins_file(&self) -> PathBuf {
        self.relative.join(constants::ADMINS_FILE)
    }

    /// Managed-file registry, relative to the repository root.
    pub fn files_file(&self) -> PathBuf {
        self.relative.join(constants::FILES_FILE)
    }

    /// Absolute path of the distributed public keyring.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::PubringMissing` if no candidate exists.
    pub fn pubring(&self) -> Result<PathBuf> {
        let dir = self.dir();
        constants::PUBRING_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| KeyringError::PubringMissing(dir.clone()).into())
    }

    /// Public key files present in the keyring, relative to the root.
    pub fn public_files(&self) -> Vec<PathBuf> {
        constants::PUBRING_FILES
            .iter()
            .chain(std::iter::once(&constants::TRUSTDB_FILE))
            .map(|name| self.relative.join(name))
            .filter(|rel| self.root.join(rel).is_file())
            .collect()
    }

    /// Fail if any private key material is present.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::SecretKeyLeakDetected` naming the offending
    /// file or directory.
    pub fn assert_no_private_key_leak(&self) -> Result<()> {
        let dir = self.dir();

        for name in constants::SECRING_FILES {
            let path = dir.join(name);
            if fs::metadata(&path).map(|m| m.is_file() && m.len() > 0).unwrap_or(false) {
                return Err(KeyringError::SecretKeyLeakDetected(path).into());
            }
        }

        let private = dir.join(constants::PRIVATE_KEYS_DIR);
        if private.is_dir() && fs::read_dir(&private)?.next().is_some() {
            return Err(KeyringError::SecretKeyLeakDetected(private).into());
        }

        debug!(dir = %dir.display(), "no private key material in keyring");
        Ok(())
    }
}
