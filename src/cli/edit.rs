//! Single-file commands: decrypt, encrypt, cat.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use dialoguer::Confirm;

use crate::cli::output;
use crate::core::blackbox::Blackbox;
use crate::core::config::Overrides;
use crate::core::repo::slash_path;
use crate::error::Result;

/// Decrypt a registered file, asking before replacing an existing plaintext.
pub fn decrypt(file: &Path, force: bool, overrides: &Overrides) -> Result<()> {
    let blackbox = Blackbox::open(overrides)?;
    let managed = blackbox.registered_path(file)?;
    let (plaintext, _) = blackbox.locate(&managed)?;

    let overwrite = if force || !plaintext.exists() {
        force
    } else if io::stdin().is_terminal() {
        output::warn(&format!("{} already exists", output::path(&managed)));
        let confirmed = Confirm::new()
            .with_prompt("Overwrite with the decrypted version?")
            .default(false)
            .interact()?;
        if !confirmed {
            output::dimmed("left unchanged");
            return Ok(());
        }
        true
    } else {
        false
    };

    blackbox.decrypt_file(file, overwrite)?;
    output::success(&format!("decrypted {}", output::path(&managed)));
    output::hint(&format!(
        "when done editing run: {}",
        output::cmd(&format!("blackbox encrypt {}", managed))
    ));
    Ok(())
}

/// Encrypt a registered file's plaintext and erase it.
pub fn encrypt(file: &Path, overrides: &Overrides) -> Result<()> {
    let blackbox = Blackbox::open(overrides)?;
    let ciphertext = blackbox.encrypt_file(file)?;
    let relative = blackbox.repo().relative(&ciphertext)?;
    output::success(&format!("encrypted {}", output::path(&slash_path(&relative))));
    Ok(())
}

/// Write a registered file's contents to stdout.
pub fn cat(file: &Path, overrides: &Overrides) -> Result<()> {
    let blackbox = Blackbox::open(overrides)?;
    let contents = blackbox.cat(file)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&contents)?;
    stdout.flush()?;
    Ok(())
}
