//! Enrollment.
//!
//! Takes a plaintext file under management: encrypt it, record it, purge
//! the plaintext and commit the result. Stages run strictly in order and
//! nothing is rolled back when one fails.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::Blackbox;
use crate::core::domain::{Enrollment, Stage};
use crate::core::envelope::secure_erase;
use crate::core::registry::FileRegistry;
use crate::core::repo::slash_path;
use crate::error::{Error, RegistryError, Result, ValidationError};

/// Tracks completed stages and wraps failures once work has begun.
#[derive(Debug, Default)]
struct Progress {
    completed: Vec<Stage>,
}

impl Progress {
    /// Run a stage, recording it on success.
    fn step<T>(
        &mut self,
        stage: Stage,
        observer: &mut dyn FnMut(Stage),
        work: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let value = self.attempt(work)?;
        debug!(stage = %stage, "stage complete");
        self.completed.push(stage);
        observer(stage);
        Ok(value)
    }

    /// Run work that belongs to the next stage without recording it.
    fn attempt<T>(&self, work: impl FnOnce() -> Result<T>) -> Result<T> {
        work().map_err(|source| {
            if self.completed.is_empty() {
                source
            } else {
                Error::Interrupted {
                    completed: self.completed.clone(),
                    source: Box::new(source),
                }
            }
        })
    }
}

impl Blackbox {
    /// Register a plaintext file.
    ///
    /// See [`register_with`](Self::register_with).
    pub fn register(&self, input: &Path) -> Result<Enrollment> {
        self.register_with(input, |_| {})
    }

    /// Register a plaintext file, calling `observer` as each stage
    /// completes.
    ///
    /// # Errors
    ///
    /// Before anything is touched:
    /// - `ValidationError::InvalidInput` if `input` is outside the
    ///   repository or already names an envelope
    /// - `ValidationError::FileNotFound` if the plaintext does not exist
    /// - `RegistryError::AlreadyRegistered` if its envelope exists
    ///
    /// A failure after the first stage is returned as `Error::Interrupted`
    /// carrying the stages that did complete.
    pub fn register_with(
        &self,
        input: &Path,
        mut observer: impl FnMut(Stage),
    ) -> Result<Enrollment> {
        let relative = self.repo.relative(input)?;
        let managed = slash_path(&relative);
        let envelope = self.envelope();

        if envelope.is_envelope(&relative) {
            let stripped = managed
                .strip_suffix(envelope.suffix())
                .unwrap_or(&managed)
                .to_string();
            return Err(ValidationError::invalid(
                &managed,
                format!("this is already an encrypted file; register {} instead", stripped),
            )
            .into());
        }

        let plaintext = self.repo.path(&relative);
        if !plaintext.is_file() {
            return Err(ValidationError::FileNotFound(managed).into());
        }
        let ciphertext_relative = envelope.ciphertext_path(&relative);
        if self.repo.path(&ciphertext_relative).exists() {
            return Err(RegistryError::AlreadyRegistered(managed).into());
        }

        info!(path = %managed, "registering");
        let mut progress = Progress::default();
        let observer: &mut dyn FnMut(Stage) = &mut observer;

        progress.step(Stage::KeychainPrepared, observer, || {
            self.prepare_keychain()
        })?;

        progress.step(Stage::Encrypted, observer, || {
            let recipients = self.recipients()?;
            envelope.encrypt(&plaintext, &recipients)
        })?;

        let files_file = self.keyring.files_file();
        progress.step(Stage::ListUpdated, observer, || {
            FileRegistry::load_or_default(self.repo.path(&files_file))?.register(&managed)
        })?;

        let vcs = self.repo.vcs();
        let exposed = progress.attempt(|| vcs.is_tracked(&relative))?;
        if exposed {
            info!(path = %managed, "plaintext was committed earlier; removing it from version control");
        }
        let ignore_file = if self.config.ignore_plaintext {
            progress.attempt(|| vcs.ignore(&relative))?
        } else {
            None
        };

        progress.step(Stage::PlaintextPurged, observer, || secure_erase(&plaintext))?;

        let mut staged: Vec<PathBuf> = vec![files_file, ciphertext_relative.clone()];
        staged.extend(ignore_file);
        let mut committed = staged.clone();
        if exposed {
            committed.push(relative.clone());
        }

        progress.step(Stage::Committed, observer, || {
            if exposed {
                vcs.remove(std::slice::from_ref(&relative))?;
            }
            vcs.add(&staged)?;
            vcs.commit(&format!("registered in blackbox: {}", managed), &committed)
        })?;

        Ok(Enrollment {
            plaintext: managed,
            ciphertext: slash_path(&ciphertext_relative),
            exposed,
            committed,
            stages: progress.completed,
        })
    }
}
