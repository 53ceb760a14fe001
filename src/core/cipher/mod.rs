//! Encryption engines.
//!
//! The workflows never encrypt anything themselves; they hand bytes and a
//! recipient list to a [`Cipher`].
//!
//! ## Backends
//!
//! - **gpg**: Default. Shells out to GnuPG; recipients are user ids, emails
//!   or fingerprints present in the local keychain.
//! - **age**: Uses the `age` crate; recipients are `age1...` public keys and
//!   decryption reads an identity file.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file
//! 3. Select it in `from_config`

use std::path::Path;

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::config::Config;
use crate::core::keyring::Keyring;
use crate::core::types::RecipientId;
use crate::error::{CipherError, Result};

mod age;
mod gpg;

pub use self::age::{parse_recipient, Age};
pub use self::gpg::{parse_import_status, Gpg};

/// Result of importing the distributed public keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// At least one key was new or changed.
    Imported,
    /// Every key was already present and unchanged.
    Unchanged,
}

/// Encryption capability.
pub trait Cipher {
    /// Backend name for display/config.
    fn name(&self) -> &'static str;

    /// Suffix appended to a plaintext path to name its envelope.
    fn suffix(&self) -> &'static str;

    /// Import every public key from the distributed keyring into the local
    /// keychain. Must run before encrypting.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError` if the pubring is missing or the import fails.
    fn import_public_keys(&self, keyring: &Keyring) -> Result<ImportOutcome>;

    /// Copy `identity`'s public key from the local keychain into the
    /// distributed keyring.
    fn publish_key(&self, identity: &str, keyring: &Keyring) -> Result<()>;

    /// Encrypt so that every recipient can decrypt.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if the engine rejects the
    /// input or any recipient.
    fn encrypt(&self, plaintext: &[u8], recipients: &[RecipientId]) -> Result<Vec<u8>>;

    /// Decrypt with whatever private key material the user has access to.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` on any engine error.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>>;
}

/// Build the cipher backend named in the configuration.
///
/// # Errors
///
/// Returns `CipherError::UnknownBackend` for unsupported names.
pub fn from_config(config: &Config) -> Result<Box<dyn Cipher>> {
    match config.cipher() {
        "gpg" => {
            debug!(program = config.gpg(), "creating gpg cipher backend");
            Ok(Box::new(Gpg::new(config.gpg())))
        }
        "age" => {
            debug!("creating age cipher backend");
            Ok(Box::new(Age::new(config.age_identity())))
        }
        other => Err(CipherError::UnknownBackend(other.to_string()).into()),
    }
}

/// Envelope path for a plaintext path.
pub fn envelope_path(plaintext: &Path, suffix: &str) -> std::path::PathBuf {
    let mut name = plaintext.as_os_str().to_os_string();
    name.push(suffix);
    name.into()
}
