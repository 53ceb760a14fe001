//! Bulk workflows.
//!
//! Apply an envelope operation to every managed file. Preconditions (leak
//! check, key import, registries) are fatal; after that each file succeeds
//! or fails on its own and the batch always runs to the end.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::Blackbox;
use crate::core::domain::{BulkReport, Freshness};
use crate::core::envelope::secure_erase;
use crate::core::registry::{ancestor_directories, check_entry};
use crate::core::repo::slash_path;
use crate::error::Result;

impl Blackbox {
    /// Decrypt every managed file, reporting which plaintexts changed.
    ///
    /// Missing parent directories are recreated first. A directory that
    /// cannot be created only fails the files beneath it.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::SecretKeyLeakDetected` or
    /// `RegistryError::Missing` before any file is visited. Per-file
    /// failures are collected in the report instead.
    pub fn decrypt_all(&self) -> Result<BulkReport> {
        self.prepare_keychain()?;
        let files = self.files()?;
        let envelope = self.envelope();

        let entries = files.list();
        let valid = entries.iter().map(String::as_str).filter(|m| check_entry(m).is_ok());
        for dir in ancestor_directories(valid) {
            if let Err(e) = std::fs::create_dir_all(self.repo.path(&dir)) {
                warn!(dir = %dir, error = %e, "cannot create directory");
            }
        }

        let mut report = BulkReport::default();
        for managed in entries {
            let outcome = self
                .locate(&managed)
                .and_then(|(plaintext, ciphertext)| {
                    envelope.decrypt_if_changed(&ciphertext, &plaintext)
                });
            match outcome {
                Ok(Freshness::Updated) => {
                    debug!(path = %managed, "updated");
                    report.updated.push(managed);
                }
                Ok(Freshness::Unchanged) => report.unchanged.push(managed),
                Err(e) => {
                    warn!(path = %managed, error = %e, "decrypt failed");
                    report.failed.push((managed, e));
                }
            }
        }
        Ok(report)
    }

    /// Re-encrypt every envelope to the current admins.
    ///
    /// Plaintext stays in memory; nothing is decrypted to disk.
    pub fn reencrypt_all(&self) -> Result<BulkReport> {
        self.prepare_keychain()?;
        let recipients = self.recipients()?;
        let files = self.files()?;
        let envelope = self.envelope();

        let mut report = BulkReport::default();
        for managed in files.list() {
            let outcome = self
                .locate(&managed)
                .and_then(|(_, ciphertext)| envelope.reseal(&ciphertext, &recipients));
            match outcome {
                Ok(()) => report.updated.push(managed),
                Err(e) => {
                    warn!(path = %managed, error = %e, "re-encrypt failed");
                    report.failed.push((managed, e));
                }
            }
        }
        Ok(report)
    }

    /// Commit the envelopes of `managed` files after a re-encryption.
    ///
    /// Returns the committed envelope paths, empty when there was nothing
    /// to commit.
    pub fn commit_reencrypted(&self, managed: &[String]) -> Result<Vec<PathBuf>> {
        let envelope = self.envelope();
        let paths: Vec<PathBuf> = managed
            .iter()
            .map(|m| envelope.ciphertext_path(Path::new(m)))
            .collect();
        if paths.is_empty() {
            return Ok(paths);
        }
        let vcs = self.repo.vcs();
        vcs.add(&paths)?;
        vcs.commit("Re-encrypted keys", &paths)?;
        debug!(
            files = %paths.iter().map(|p| slash_path(p)).collect::<Vec<_>>().join(" "),
            "re-encryption committed"
        );
        Ok(paths)
    }

    /// Securely erase every plaintext that is present on disk.
    ///
    /// Erased files are reported as updated, absent ones as unchanged.
    ///
    /// # Errors
    ///
    /// Returns `KeyringError::SecretKeyLeakDetected` before any file is
    /// visited.
    pub fn shred_all(&self) -> Result<BulkReport> {
        self.keyring.assert_no_private_key_leak()?;
        let files = self.files()?;

        let mut report = BulkReport::default();
        for managed in files.list() {
            let plaintext = match self.locate(&managed) {
                Ok((plaintext, _)) => plaintext,
                Err(e) => {
                    warn!(path = %managed, error = %e, "skipping entry");
                    report.failed.push((managed, e));
                    continue;
                }
            };
            if !plaintext.exists() {
                report.unchanged.push(managed);
                continue;
            }
            match secure_erase(&plaintext) {
                Ok(()) => report.updated.push(managed),
                Err(e) => report.failed.push((managed, e)),
            }
        }
        Ok(report)
    }
}
