//! Age encryption backend implementation.
//!
//! Encrypts with the age format for x25519 recipients and ASCII armor.
//! Recipients in the admin list are `age1...` public keys; decryption reads
//! `AGE-SECRET-KEY-...` lines from an identity file.

use std::io::{Read, Write};
use std::path::PathBuf;

use ::age::x25519;
use tracing::trace;
use zeroize::Zeroizing;

use super::{Cipher, ImportOutcome};
use crate::core::keyring::Keyring;
use crate::core::types::RecipientId;
use crate::error::{CipherError, Error, KeyringError, Result};

/// Age-based cryptographic backend using x25519 keys.
pub struct Age {
    identity_file: Option<PathBuf>,
}

impl Age {
    pub fn new(identity_file: Option<PathBuf>) -> Self {
        Self { identity_file }
    }

    fn identities(&self) -> Result<Vec<x25519::Identity>> {
        let path = self.identity_file.as_ref().ok_or_else(|| {
            CipherError::DecryptionFailed("no age identity file configured".to_string())
        })?;
        let contents = Zeroizing::new(std::fs::read_to_string(path).map_err(|e| {
            CipherError::DecryptionFailed(format!(
                "cannot read age identity {}: {}",
                path.display(),
                e
            ))
        })?);

        let identities = contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| {
                l.parse::<x25519::Identity>()
                    .map_err(|e: &str| Error::from(CipherError::InvalidKey(e.to_string())))
            })
            .collect::<Result<Vec<_>>>()?;

        if identities.is_empty() {
            return Err(CipherError::DecryptionFailed(format!(
                "no identities in {}",
                path.display()
            ))
            .into());
        }
        Ok(identities)
    }
}

impl Cipher for Age {
    fn name(&self) -> &'static str {
        "age"
    }

    fn suffix(&self) -> &'static str {
        ".age"
    }

    fn import_public_keys(&self, _keyring: &Keyring) -> Result<ImportOutcome> {
        // Public keys live in the admin list itself.
        Ok(ImportOutcome::Unchanged)
    }

    fn publish_key(&self, identity: &str, _keyring: &Keyring) -> Result<()> {
        parse_recipient(identity).map(|_| ())
    }

    fn encrypt(&self, plaintext: &[u8], recipients: &[RecipientId]) -> Result<Vec<u8>> {
        trace!(
            recipients = recipients.len(),
            plaintext_len = plaintext.len(),
            "encrypting"
        );

        if recipients.is_empty() {
            return Err(KeyringError::NoRecipients.into());
        }
        let recipients = recipients
            .iter()
            .map(|r| {
                r.parse::<x25519::Recipient>().map_err(|_| {
                    Error::from(CipherError::EncryptionFailed(format!(
                        "unknown recipient: {}",
                        r
                    )))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let encryptor =
            age::Encryptor::with_recipients(recipients.iter().map(|r| r as &dyn age::Recipient))
                .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        let mut encrypted = Vec::new();
        let mut writer = encryptor
            .wrap_output(age::armor::ArmoredWriter::wrap_output(
                &mut encrypted,
                age::armor::Format::AsciiArmor,
            )?)
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;

        writer.write_all(plaintext)?;
        let armored = writer
            .finish()
            .map_err(|e| CipherError::EncryptionFailed(format!("{}", e)))?;
        armored
            .finish()
            .map_err(|e| CipherError::EncryptionFailed(format!("armor: {}", e)))?;

        trace!(ciphertext_len = encrypted.len(), "encrypted");
        Ok(encrypted)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        trace!(ciphertext_len = ciphertext.len(), "decrypting");

        let identities = self.identities()?;
        let reader = age::armor::ArmoredReader::new(ciphertext);
        let decryptor = age::Decryptor::new(reader)
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        let mut decrypted = Zeroizing::new(Vec::new());
        let mut reader = decryptor
            .decrypt(identities.iter().map(|i| i as &dyn age::Identity))
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        reader
            .read_to_end(&mut decrypted)
            .map_err(|e| CipherError::DecryptionFailed(format!("{}", e)))?;

        trace!(plaintext_len = decrypted.len(), "decrypted");
        Ok(decrypted)
    }
}

/// Parse a public key string into an age recipient.
///
/// # Errors
///
/// Returns `CipherError::InvalidKey` if the key format is invalid.
pub fn parse_recipient(key: &str) -> Result<x25519::Recipient> {
    key.parse::<x25519::Recipient>()
        .map_err(|_| CipherError::InvalidKey(key.to_string()).into())
}
