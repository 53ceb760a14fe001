//! Secure erase of plaintext files.
//!
//! Uses `shred` or `srm` when one is on the PATH. Otherwise the file is
//! simply deleted, which leaves its blocks recoverable on disk. Callers are
//! not told which happened.

use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::core::constants;
use crate::error::Result;

/// Overwrite and unlink `path`. A missing file is a no-op.
pub fn secure_erase(path: &Path) -> Result<()> {
    if !path.exists() {
        debug!(path = %path.display(), "nothing to erase");
        return Ok(());
    }

    for (tool, args) in constants::SHRED_TOOLS {
        let Ok(program) = which::which(tool) else {
            continue;
        };
        let status = Command::new(&program)
            .args(*args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(s) if s.success() && !path.exists() => {
                debug!(path = %path.display(), tool, "shredded");
                return Ok(());
            }
            Ok(s) => warn!(tool, status = %s, "secure delete failed, trying next"),
            Err(e) => warn!(tool, error = %e, "secure delete failed, trying next"),
        }
    }

    if path.exists() {
        fs::remove_file(path)?;
        debug!(path = %path.display(), "deleted without overwrite");
    }
    Ok(())
}
