//! GPG cipher backend.
//!
//! Encrypts files using GnuPG (GNU Privacy Guard).
//!
//! ## Requirements
//!
//! - `gpg` CLI must be installed (override with `GPG` or `gpg = "..."`)
//! - The distributed pubring is imported into the user's keychain before
//!   encrypting
//! - Decrypting needs a matching private key in the user's keychain

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::process::{Command, Output, Stdio};

use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::{Cipher, ImportOutcome};
use crate::core::keyring::Keyring;
use crate::core::types::RecipientId;
use crate::error::{CipherError, KeyringError, Result};

/// GPG cipher backend using the gpg CLI.
pub struct Gpg {
    program: String,
}

impl Gpg {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run gpg, feeding `input` on stdin from a scoped thread so large
    /// payloads cannot deadlock against a full stdout pipe.
    fn pipe(&self, args: &[OsString], input: &[u8]) -> io::Result<Output> {
        trace!(program = %self.program, ?args, input_len = input.len(), "running gpg");

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdin = child.stdin.take();
        let (written, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(input),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer.join().unwrap_or_else(|_| {
                Err(io::Error::new(io::ErrorKind::Other, "stdin writer panicked"))
            });
            (written, output)
        });
        let output = output?;

        match written {
            Ok(()) => Ok(output),
            // gpg stopped reading because it failed; its stderr says why.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe && !output.status.success() => {
                Ok(output)
            }
            Err(e) => Err(io::Error::new(
                e.kind(),
                format!("writing to {} failed: {}", self.program, e),
            )),
        }
    }

    fn spawn_error(&self, e: io::Error) -> CipherError {
        if e.kind() == io::ErrorKind::NotFound {
            CipherError::ToolMissing(self.program.clone())
        } else {
            CipherError::EncryptionFailed(format!("failed to run {}: {}", self.program, e))
        }
    }
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

impl Cipher for Gpg {
    fn name(&self) -> &'static str {
        "gpg"
    }

    fn suffix(&self) -> &'static str {
        ".gpg"
    }

    fn import_public_keys(&self, keyring: &Keyring) -> Result<ImportOutcome> {
        let pubring = keyring.pubring()?;
        debug!(pubring = %pubring.display(), "importing public keys");

        let output = Command::new(&self.program)
            .args(["--batch", "--status-fd", "1", "--import"])
            .arg(&pubring)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(KeyringError::ImportFailed(stderr_of(&output)).into());
        }

        let outcome = parse_import_status(&String::from_utf8_lossy(&output.stdout));
        debug!(?outcome, "public keys imported");
        Ok(outcome)
    }

    fn publish_key(&self, identity: &str, keyring: &Keyring) -> Result<()> {
        let export = Command::new(&self.program)
            .args(["--batch", "--armor", "--export", identity])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !export.status.success() || export.stdout.is_empty() {
            return Err(KeyringError::ExportFailed {
                identity: identity.to_string(),
                reason: if export.stdout.is_empty() {
                    "no public key in the local keychain".to_string()
                } else {
                    stderr_of(&export)
                },
            }
            .into());
        }

        fs::create_dir_all(keyring.dir())?;
        let args: Vec<OsString> = vec![
            "--homedir".into(),
            keyring.dir().as_os_str().to_os_string(),
            "--batch".into(),
            "--import".into(),
        ];
        let output = self
            .pipe(&args, &export.stdout)
            .map_err(|e| self.spawn_error(e))?;
        if !output.status.success() {
            return Err(KeyringError::ImportFailed(stderr_of(&output)).into());
        }

        debug!(identity, "published public key");
        Ok(())
    }

    fn encrypt(&self, plaintext: &[u8], recipients: &[RecipientId]) -> Result<Vec<u8>> {
        trace!(
            recipients = recipients.len(),
            plaintext_len = plaintext.len(),
            "encrypting with GPG"
        );

        if recipients.is_empty() {
            return Err(KeyringError::NoRecipients.into());
        }

        let mut args: Vec<OsString> = vec![
            "--batch".into(),
            "--yes".into(),
            "--trust-model".into(),
            "always".into(),
            "--encrypt".into(),
        ];
        for recipient in recipients {
            args.push("--recipient".into());
            args.push(recipient.into());
        }

        let output = self.pipe(&args, plaintext).map_err(|e| self.spawn_error(e))?;
        if !output.status.success() {
            return Err(CipherError::EncryptionFailed(format!(
                "gpg encrypt failed: {}",
                stderr_of(&output)
            ))
            .into());
        }

        trace!(ciphertext_len = output.stdout.len(), "encrypted with GPG");
        Ok(output.stdout)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        trace!(ciphertext_len = ciphertext.len(), "decrypting with GPG");

        let args: Vec<OsString> = vec!["--quiet".into(), "--yes".into(), "--decrypt".into()];
        let output = self.pipe(&args, ciphertext).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CipherError::ToolMissing(self.program.clone()),
            _ => CipherError::DecryptionFailed(format!("failed to run {}: {}", self.program, e)),
        })?;

        let plaintext = Zeroizing::new(output.stdout);
        if !output.status.success() {
            return Err(CipherError::DecryptionFailed(format!(
                "gpg decrypt failed: {}. Ensure you have the private key in your keyring.",
                String::from_utf8_lossy(&output.stderr).trim()
            ))
            .into());
        }

        trace!(plaintext_len = plaintext.len(), "decrypted with GPG");
        Ok(plaintext)
    }
}

/// Interpret `gpg --status-fd` output from an import.
///
/// `IMPORT_RES` counts are: count, no_user_id, imported, imported_rsa,
/// unchanged, n_uids, n_subk, n_sigs, n_revoc, ... Anything imported or
/// changed means the keychain moved. Without the line, assume it did.
pub fn parse_import_status(status: &str) -> ImportOutcome {
    let Some(line) = status
        .lines()
        .find_map(|l| l.trim().strip_prefix("[GNUPG:] IMPORT_RES "))
    else {
        return ImportOutcome::Imported;
    };

    let counts: Vec<u64> = line
        .split_whitespace()
        .map(|n| n.parse().unwrap_or(0))
        .collect();
    let field = |i: usize| counts.get(i).copied().unwrap_or(0);
    let changed = field(2) + field(5) + field(6) + field(7) + field(8);

    if changed > 0 {
        ImportOutcome::Imported
    } else {
        ImportOutcome::Unchanged
    }
}
