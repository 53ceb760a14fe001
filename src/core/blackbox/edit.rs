//! Single-file operations on registered files.

use std::path::{Path, PathBuf};

use tracing::info;
use zeroize::Zeroizing;

use super::Blackbox;
use crate::core::envelope::secure_erase;
use crate::error::{Result, ValidationError};

impl Blackbox {
    /// Decrypt one registered file next to its envelope.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::WouldOverwrite` if the plaintext exists and
    /// `overwrite` is false. Confirming with the user is the caller's job.
    pub fn decrypt_file(&self, input: &Path, overwrite: bool) -> Result<PathBuf> {
        let managed = self.registered_path(input)?;
        let (plaintext, ciphertext) = self.locate(&managed)?;
        if plaintext.exists() && !overwrite {
            return Err(ValidationError::WouldOverwrite(managed).into());
        }

        self.prepare_keychain()?;
        self.envelope().decrypt(&ciphertext, &plaintext)?;
        info!(path = %managed, "decrypted");
        Ok(plaintext)
    }

    /// Re-encrypt one registered file from its plaintext, then erase the
    /// plaintext. Nothing is committed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::FileNotFound` if there is no plaintext.
    pub fn encrypt_file(&self, input: &Path) -> Result<PathBuf> {
        let managed = self.registered_path(input)?;
        let (plaintext, _) = self.locate(&managed)?;
        if !plaintext.is_file() {
            return Err(ValidationError::FileNotFound(managed).into());
        }

        self.prepare_keychain()?;
        let recipients = self.recipients()?;
        let ciphertext = self.envelope().encrypt(&plaintext, &recipients)?;
        secure_erase(&plaintext)?;
        info!(path = %managed, "encrypted");
        Ok(ciphertext)
    }

    /// Decrypt one registered file into memory.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::SecretKeyLeakDetected` before decrypting if
    /// the keyring directory holds private key material.
    pub fn cat(&self, input: &Path) -> Result<Zeroizing<Vec<u8>>> {
        self.keyring.assert_no_private_key_leak()?;
        let managed = self.registered_path(input)?;
        let (_, ciphertext) = self.locate(&managed)?;
        self.envelope().open(&ciphertext)
    }
}
