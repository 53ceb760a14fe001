//! The primary interface for blackbox operations.
//!
//! `Blackbox` ties a repository to its configuration, keyring directory and
//! cipher backend. Workflows live in the submodules as further `impl` blocks.

mod admins;
mod bulk;
mod edit;
mod enroll;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::cipher::{self, Cipher, ImportOutcome};
use crate::core::config::{Config, Overrides};
use crate::core::envelope::Envelope;
use crate::core::keyring::Keyring;
use crate::core::registry::{check_entry, AdminRegistry, FileRegistry};
use crate::core::repo::{slash_path, Repository};
use crate::core::types::{ManagedPath, RecipientId};
use crate::error::{KeyringError, RegistryError, Result};

/// A repository under blackbox management.
pub struct Blackbox {
    pub(super) repo: Repository,
    pub(super) config: Config,
    pub(super) keyring: Keyring,
    pub(super) cipher: Box<dyn Cipher>,
}

impl std::fmt::Debug for Blackbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blackbox")
            .field("repo", &self.repo)
            .field("config", &self.config)
            .field("keyring", &self.keyring)
            .field("cipher", &self.cipher.name())
            .finish()
    }
}

impl Blackbox {
    /// Open the repository containing the current directory.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::NoRepository` when no git or mercurial repository
    /// is found and no repository base was supplied. Returns `ConfigError`
    /// if `.blackbox.toml` is invalid.
    pub fn open(overrides: &Overrides) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::open_at(&cwd, overrides)
    }

    /// Open the repository containing `start`.
    pub fn open_at(start: &Path, overrides: &Overrides) -> Result<Self> {
        let repo = Repository::detect(start, overrides.repobase.as_deref())?;
        let config = Config::load(repo.root(), overrides)?;
        let cipher = cipher::from_config(&config)?;
        Ok(Self::from_parts(repo, config, cipher))
    }

    /// Assemble from already-built parts.
    pub fn from_parts(repo: Repository, config: Config, cipher: Box<dyn Cipher>) -> Self {
        let keyring = Keyring::new(repo.root(), config.keyring_dir(repo.root()));
        debug!(
            root = %repo.root().display(),
            backend = %repo.backend(),
            keyring = %keyring.relative_dir().display(),
            cipher = cipher.name(),
            "blackbox opened"
        );
        Self {
            repo,
            config,
            keyring,
            cipher,
        }
    }

    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn keyring(&self) -> &Keyring {
        &self.keyring
    }

    pub fn cipher(&self) -> &dyn Cipher {
        self.cipher.as_ref()
    }

    /// Envelope engine bound to this repository's cipher.
    pub fn envelope(&self) -> Envelope<'_> {
        Envelope::new(self.cipher.as_ref())
    }

    // --- Registries ---

    /// Load the admin registry.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Missing` if the file does not exist.
    pub fn admins(&self) -> Result<AdminRegistry> {
        AdminRegistry::load(self.repo.path(self.keyring.admins_file()))
    }

    /// Load the managed-file registry.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Missing` if the file does not exist.
    pub fn files(&self) -> Result<FileRegistry> {
        FileRegistry::load(self.repo.path(self.keyring.files_file()))
    }

    /// Current recipients, in registry order.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Missing` if there is no admin registry and
    /// `KeyringError::NoRecipients` if it is empty.
    pub fn recipients(&self) -> Result<Vec<RecipientId>> {
        let admins = self.admins()?;
        if admins.list().is_empty() {
            return Err(KeyringError::NoRecipients.into());
        }
        Ok(admins.list().to_vec())
    }

    // --- Keychain ---

    /// Refuse to continue if private key material sits in the keyring
    /// directory, then import the distributed public keys.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::SecretKeyLeakDetected` before touching the
    /// user's keychain if the keyring directory is contaminated.
    pub fn prepare_keychain(&self) -> Result<ImportOutcome> {
        self.keyring.assert_no_private_key_leak()?;
        let outcome = self.cipher.import_public_keys(&self.keyring)?;
        match outcome {
            ImportOutcome::Imported => info!("public keys imported"),
            ImportOutcome::Unchanged => debug!("keychain already current"),
        }
        Ok(outcome)
    }

    // --- Paths ---

    /// Resolve user input to the managed (plaintext) path it refers to.
    ///
    /// Accepts either the plaintext or the envelope name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidInput` for paths outside the
    /// repository.
    pub fn managed_path(&self, input: &Path) -> Result<ManagedPath> {
        let relative = self.repo.relative(input)?;
        let managed = slash_path(&relative);
        Ok(match managed.strip_suffix(self.cipher.suffix()) {
            Some(stripped) if !stripped.is_empty() => stripped.to_string(),
            _ => managed,
        })
    }

    /// Like [`managed_path`](Self::managed_path) but also requires the file
    /// to be registered.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotRegistered` if it is not, including when
    /// no file has been registered yet.
    pub fn registered_path(&self, input: &Path) -> Result<ManagedPath> {
        let managed = self.managed_path(input)?;
        let files = FileRegistry::load_or_default(self.repo.path(self.keyring.files_file()))?;
        if !files.contains(&managed) {
            return Err(RegistryError::NotRegistered(managed).into());
        }
        Ok(managed)
    }

    /// Absolute plaintext and envelope paths for a managed path.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidInput` for an entry that would
    /// resolve outside the repository.
    pub fn locate(&self, managed: &str) -> Result<(PathBuf, PathBuf)> {
        check_entry(managed)?;
        let plaintext = self.repo.path(managed);
        let ciphertext = self.envelope().ciphertext_path(&plaintext);
        Ok((plaintext, ciphertext))
    }
}
