//! Envelope engine.
//!
//! Moves bytes between a plaintext file `P` and its envelope `P<suffix>`.
//! The envelope is authoritative; plaintext is derived and disposable.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::cipher::{self, Cipher};
use crate::core::domain::{Fingerprint, Freshness};
use crate::core::types::RecipientId;
use crate::error::{CipherError, Error, Result, ValidationError};

pub use crate::core::erase::secure_erase;

/// Encrypt/decrypt files with a cipher backend.
pub struct Envelope<'a> {
    cipher: &'a dyn Cipher,
}

impl<'a> Envelope<'a> {
    pub fn new(cipher: &'a dyn Cipher) -> Self {
        Self { cipher }
    }

    /// Envelope suffix for this cipher.
    pub fn suffix(&self) -> &'static str {
        self.cipher.suffix()
    }

    /// Whether `path` names an envelope rather than a plaintext.
    pub fn is_envelope(&self, path: &Path) -> bool {
        path.to_string_lossy().ends_with(self.suffix())
    }

    /// Envelope path for a plaintext path.
    pub fn ciphertext_path(&self, plaintext: &Path) -> PathBuf {
        cipher::envelope_path(plaintext, self.suffix())
    }

    /// Encrypt `plaintext` to every recipient, overwriting any existing
    /// envelope. Returns the envelope path.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::FileNotFound` if the plaintext is missing
    /// or `CipherError::EncryptionFailed` from the engine.
    pub fn encrypt(&self, plaintext: &Path, recipients: &[RecipientId]) -> Result<PathBuf> {
        let bytes = Zeroizing::new(read_or_not_found(plaintext)?);
        let sealed = self
            .cipher
            .encrypt(&bytes, recipients)
            .map_err(|e| engine_failure(e, CipherError::EncryptionFailed))?;

        let ciphertext = self.ciphertext_path(plaintext);
        fs::write(&ciphertext, sealed)?;
        debug!(path = %ciphertext.display(), "envelope written");
        Ok(ciphertext)
    }

    /// Decrypt `ciphertext` into `plaintext`, replacing whatever is there.
    ///
    /// Whether replacing an existing plaintext is acceptable is the
    /// caller's decision.
    pub fn decrypt(&self, ciphertext: &Path, plaintext: &Path) -> Result<()> {
        let opened = self.open(ciphertext)?;
        write_plaintext(plaintext, &opened)?;
        debug!(path = %plaintext.display(), "plaintext written");
        Ok(())
    }

    /// Decrypt unconditionally and report whether the plaintext on disk
    /// changed.
    ///
    /// Decryption always runs: the old plaintext may have been tampered
    /// with, so its fingerprint is never a reason to skip.
    pub fn decrypt_if_changed(&self, ciphertext: &Path, plaintext: &Path) -> Result<Freshness> {
        let before = Fingerprint::of_file(plaintext)?;
        self.decrypt(ciphertext, plaintext)?;
        let after = Fingerprint::of_file(plaintext)?;

        if before.matches(&after) {
            Ok(Freshness::Unchanged)
        } else {
            Ok(Freshness::Updated)
        }
    }

    /// Decrypt an envelope into memory.
    pub fn open(&self, ciphertext: &Path) -> Result<Zeroizing<Vec<u8>>> {
        let sealed = read_or_not_found(ciphertext)?;
        self.cipher
            .decrypt(&sealed)
            .map_err(|e| engine_failure(e, CipherError::DecryptionFailed))
    }

    /// Re-encrypt an envelope to `recipients` without writing plaintext to
    /// disk.
    pub fn reseal(&self, ciphertext: &Path, recipients: &[RecipientId]) -> Result<()> {
        let opened = self.open(ciphertext)?;
        let sealed = self
            .cipher
            .encrypt(&opened, recipients)
            .map_err(|e| engine_failure(e, CipherError::EncryptionFailed))?;
        fs::write(ciphertext, sealed)?;
        debug!(path = %ciphertext.display(), "envelope resealed");
        Ok(())
    }
}

/// Report a missing tool or unusable key as a failure of the operation
/// that needed it.
fn engine_failure(e: Error, failed: fn(String) -> CipherError) -> Error {
    match e {
        Error::Cipher(inner @ (CipherError::ToolMissing(_) | CipherError::InvalidKey(_))) => {
            failed(inner.to_string()).into()
        }
        other => other,
    }
}

fn read_or_not_found(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ValidationError::FileNotFound(path.display().to_string()).into()
        } else {
            e.into()
        }
    })
}

/// Write plaintext, creating new files readable by the owner only.
fn write_plaintext(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    Ok(())
}
