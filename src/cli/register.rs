//! Register command.
//!
//! Take a plaintext file under management in one commit.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::core::blackbox::Blackbox;
use crate::core::config::Overrides;
use crate::core::domain::Stage;
use crate::error::Result;

/// Register a file.
pub fn execute(file: &Path, overrides: &Overrides) -> Result<()> {
    info!("Registering {}", file.display());
    let blackbox = Blackbox::open(overrides)?;

    let enrollment = blackbox.register_with(file, |stage| match stage {
        Stage::KeychainPrepared => output::dimmed("keychain ready"),
        Stage::Committed => {}
        other => output::success(other.label()),
    })?;

    if enrollment.exposed {
        output::warn(&format!(
            "{} was committed in plaintext earlier and is still in history",
            output::path(&enrollment.plaintext)
        ));
    }
    output::success(&format!(
        "registered {} as {}",
        output::path(&enrollment.plaintext),
        output::path(&enrollment.ciphertext)
    ));
    Ok(())
}
