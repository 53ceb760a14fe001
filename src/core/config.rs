//! Configuration file management.
//!
//! Reads the optional `.blackbox.toml` at the repository root and applies
//! command-line / environment overrides on top of it.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Repository configuration stored in `.blackbox.toml`.
///
/// Every field is optional; an absent file is the same as an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Keyring directory relative to the repository root.
    pub keyring_dir: Option<PathBuf>,
    /// Cipher backend: "gpg" (default) or "age".
    pub cipher: Option<String>,
    /// gpg program to invoke.
    pub gpg: Option<String>,
    /// age identity file used for decryption.
    pub age_identity: Option<PathBuf>,
    /// Add enrolled plaintext paths to the VCS ignore file.
    pub ignore_plaintext: bool,
}

/// Values supplied on the command line or through the environment.
///
/// These win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub keyring_dir: Option<PathBuf>,
    pub gpg: Option<String>,
    /// Root to use when no git or mercurial repository is found.
    pub repobase: Option<PathBuf>,
}

impl Config {
    /// Path to the configuration file for a repository.
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(constants::CONFIG_FILE)
    }

    /// Load configuration for the repository at `root`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the TOML is malformed or
    /// `ConfigError::InvalidValue` if a value fails validation.
    pub fn load(root: &Path, overrides: &Overrides) -> Result<Self> {
        let path = Self::config_path(root);
        debug!(path = %path.display(), "loading config");

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
            toml::from_str(&contents).map_err(ConfigError::Parse)?
        } else {
            Self::default()
        };

        if let Some(dir) = &overrides.keyring_dir {
            config.keyring_dir = Some(dir.clone());
        }
        if let Some(gpg) = &overrides.gpg {
            config.gpg = Some(gpg.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate values that serde cannot check on its own.
    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.keyring_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "keyring_dir",
                    reason: "must not be empty".to_string(),
                }
                .into());
            }
            let escapes = dir
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
            if escapes {
                return Err(ConfigError::InvalidValue {
                    field: "keyring_dir",
                    reason: format!(
                        "{} must be a relative path inside the repository",
                        dir.display()
                    ),
                }
                .into());
            }
        }

        if let Some(cipher) = &self.cipher {
            if !constants::CIPHERS.contains(&cipher.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "cipher",
                    reason: format!("{} is not one of: {}", cipher, constants::CIPHERS.join(", ")),
                }
                .into());
            }
        }

        if let Some(gpg) = &self.gpg {
            if gpg.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "gpg",
                    reason: "must not be empty".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Keyring directory relative to the repository root.
    ///
    /// Falls back to `.blackbox` when that directory exists, otherwise
    /// `keyrings/live`.
    pub fn keyring_dir(&self, root: &Path) -> PathBuf {
        if let Some(dir) = &self.keyring_dir {
            return dir.clone();
        }
        if root.join(constants::LEGACY_KEYRING_DIR).is_dir() {
            return PathBuf::from(constants::LEGACY_KEYRING_DIR);
        }
        PathBuf::from(constants::DEFAULT_KEYRING_DIR)
    }

    /// Cipher backend name.
    pub fn cipher(&self) -> &str {
        self.cipher.as_deref().unwrap_or("gpg")
    }

    /// gpg program.
    pub fn gpg(&self) -> &str {
        self.gpg.as_deref().unwrap_or(constants::DEFAULT_GPG)
    }

    /// age identity file, with a leading `~` expanded.
    pub fn age_identity(&self) -> Option<PathBuf> {
        match &self.age_identity {
            Some(path) => Some(expand_home(path)),
            None => dirs::config_dir().map(|d| d.join(constants::AGE_IDENTITY_FILE)),
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}
