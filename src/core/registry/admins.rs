//! Recipient registry (`blackbox-admins.txt`).

use std::path::PathBuf;

use tracing::debug;

use super::{read_lines, write_lines};
use crate::core::types::RecipientId;
use crate::error::{RegistryError, Result, ValidationError};

/// Trusted identities every envelope is encrypted to.
///
/// Insertion order is kept for display; duplicates are dropped.
#[derive(Debug, Clone)]
pub struct AdminRegistry {
    path: PathBuf,
    admins: Vec<RecipientId>,
}

impl AdminRegistry {
    /// Load the registry at `path` (absolute).
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Missing` if the file does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut admins: Vec<RecipientId> = Vec::new();
        for line in read_lines(&path)? {
            let identity = line.trim().to_string();
            if !admins.contains(&identity) {
                admins.push(identity);
            }
        }
        debug!(path = %path.display(), admins = admins.len(), "admins loaded");
        Ok(Self { path, admins })
    }

    /// Load, or start empty when the file does not exist yet.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self {
                path,
                admins: Vec::new(),
            })
        }
    }

    /// Identities in insertion order.
    pub fn list(&self) -> &[RecipientId] {
        &self.admins
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.admins.iter().any(|a| a == identity)
    }

    /// Append an identity. Returns false if it was already listed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidInput` for empty or multi-line input.
    pub fn insert(&mut self, identity: &str) -> Result<bool> {
        let identity = identity.trim();
        if identity.is_empty() || identity.contains('\n') {
            return Err(ValidationError::invalid(
                format!("{:?}", identity),
                "admin identity must be a single non-empty line",
            )
            .into());
        }
        if self.contains(identity) {
            return Ok(false);
        }
        self.admins.push(identity.to_string());
        Ok(true)
    }

    /// Drop an identity.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownAdmin` if it is not listed.
    pub fn remove(&mut self, identity: &str) -> Result<()> {
        let before = self.admins.len();
        self.admins.retain(|a| a != identity);
        if self.admins.len() == before {
            return Err(RegistryError::UnknownAdmin(identity.to_string()).into());
        }
        Ok(())
    }

    /// Persist the registry.
    pub fn save(&self) -> Result<()> {
        write_lines(&self.path, &self.admins)
    }
}
