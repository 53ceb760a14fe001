//! Error types.
//!
//! Every failure is grouped by the concern that produced it. The top-level
//! [`Error`] wraps the per-concern enums so `?` works across module seams,
//! and [`Error::kind`] folds everything back onto the small taxonomy the
//! command-line front end reports.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::domain::Stage;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Keyring(#[from] KeyringError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Enrollment stopped part way through. Nothing is rolled back.
    #[error("{source} (completed: {})", Stage::describe(.completed))]
    Interrupted {
        completed: Vec<Stage>,
        #[source]
        source: Box<Error>,
    },

    /// A bulk workflow finished with per-file failures.
    #[error("{failed} of {total} files failed")]
    BulkFailed { failed: usize, total: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Version-control failures.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error("not inside a git or mercurial repository")]
    NoRepository,

    #[error("could not determine whether {path} is tracked: {reason}")]
    TrackedCheck { path: String, reason: String },

    #[error("{command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures around the persisted registries.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("registry missing: {0}")]
    Missing(PathBuf),

    #[error("{0} is already registered (its encrypted form exists)")]
    AlreadyRegistered(String),

    #[error("{0} is not registered")]
    NotRegistered(String),

    #[error("admin {0} is not listed")]
    UnknownAdmin(String),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Keychain failures.
#[derive(Error, Debug)]
pub enum KeyringError {
    #[error("private key material found in {0}; it must never be distributed with the repository")]
    SecretKeyLeakDetected(PathBuf),

    #[error("no public keyring found in {0}")]
    PubringMissing(PathBuf),

    #[error("public key import failed: {0}")]
    ImportFailed(String),

    #[error("public key export failed for {identity}: {reason}")]
    ExportFailed { identity: String, reason: String },

    #[error("no admins listed; add one with add-admin")]
    NoRecipients,
}

/// Encryption engine failures.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("{0} not found on PATH")]
    ToolMissing(String),

    #[error("unknown cipher: {0} (supported: gpg, age)")]
    UnknownBackend(String),

    #[error("invalid key material: {0}")]
    InvalidKey(String),
}

/// Input validation failures.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("invalid input {input}: {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("{0} would be overwritten; pass --force to replace it")]
    WouldOverwrite(String),
}

impl ValidationError {
    pub fn invalid(input: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Configuration failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// The failure classes reported to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoRepository,
    RegistryMissing,
    SecretKeyLeakDetected,
    InvalidInput,
    FileNotFound,
    AlreadyRegistered,
    EncryptionFailed,
    DecryptionFailed,
    Other,
}

impl Error {
    /// Classify this error, looking through interrupted enrollments.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Interrupted { source, .. } => source.kind(),
            Error::Repo(RepoError::NoRepository | RepoError::TrackedCheck { .. }) => {
                ErrorKind::NoRepository
            }
            Error::Registry(RegistryError::Missing(_)) => ErrorKind::RegistryMissing,
            Error::Registry(RegistryError::AlreadyRegistered(_)) => ErrorKind::AlreadyRegistered,
            Error::Keyring(KeyringError::SecretKeyLeakDetected(_)) => {
                ErrorKind::SecretKeyLeakDetected
            }
            Error::Validation(ValidationError::InvalidInput { .. }) => ErrorKind::InvalidInput,
            Error::Validation(ValidationError::FileNotFound(_)) => ErrorKind::FileNotFound,
            Error::Cipher(CipherError::EncryptionFailed(_)) => ErrorKind::EncryptionFailed,
            Error::Cipher(CipherError::DecryptionFailed(_)) => ErrorKind::DecryptionFailed,
            _ => ErrorKind::Other,
        }
    }

    /// Stages that finished before an enrollment failed.
    pub fn completed_stages(&self) -> &[Stage] {
        match self {
            Error::Interrupted { completed, .. } => completed,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
