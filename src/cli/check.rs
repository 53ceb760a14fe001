//! Check command - report repository and keyring state.

use crate::cli::output;
use crate::core::blackbox::Blackbox;
use crate::core::config::Overrides;
use crate::error::{Error, ErrorKind, Result};

/// Show where everything lives and whether the keyring is clean.
///
/// Fails when the keyring holds private key material.
pub fn execute(overrides: &Overrides) -> Result<()> {
    let blackbox = Blackbox::open(overrides)?;
    let keyring = blackbox.keyring();

    output::section("Repository");
    output::kv("root", blackbox.repo().root().display());
    output::kv("backend", blackbox.repo().backend());
    output::kv("cipher", blackbox.cipher().name());
    output::kv("keyring", keyring.relative_dir().display());

    output::section("Registries");
    match blackbox.list_admins() {
        Ok(admins) => output::kv("admins", admins.len()),
        Err(e) => output::kv("admins", describe(&e)),
    }
    match blackbox.files() {
        Ok(files) => output::kv("files", files.len()),
        Err(e) => output::kv("files", describe(&e)),
    }

    println!();
    keyring.assert_no_private_key_leak()?;
    output::success("no private keys in the keyring directory");
    Ok(())
}

fn describe(err: &Error) -> String {
    match err.kind() {
        ErrorKind::RegistryMissing => "missing".to_string(),
        _ => err.to_string(),
    }
}
