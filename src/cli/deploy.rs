//! Bulk commands: postdeploy, reencrypt-all, shred-all.

use crate::cli::output;
use crate::core::blackbox::Blackbox;
use crate::core::config::Overrides;
use crate::core::domain::BulkReport;
use crate::error::{Error, Result};

/// Decrypt every registered file.
pub fn postdeploy(overrides: &Overrides) -> Result<()> {
    let blackbox = Blackbox::open(overrides)?;
    let report = blackbox.decrypt_all()?;

    for path in &report.updated {
        output::success(&format!("decrypted {}", output::path(path)));
    }
    summarize(&report, "updated", "unchanged")
}

/// Re-encrypt every registered file, optionally committing the result.
pub fn reencrypt_all(commit: bool, overrides: &Overrides) -> Result<()> {
    let blackbox = Blackbox::open(overrides)?;
    let report = blackbox.reencrypt_all()?;

    for path in &report.updated {
        output::success(&format!("re-encrypted {}", output::path(path)));
    }
    if commit {
        let committed = blackbox.commit_reencrypted(&report.updated)?;
        if !committed.is_empty() {
            output::success(&format!("committed {} files", committed.len()));
        }
    } else if !report.updated.is_empty() {
        output::hint(&format!(
            "review and commit the changes, or rerun with {}",
            output::cmd("--commit")
        ));
    }
    summarize(&report, "re-encrypted", "skipped")
}

/// Erase every decrypted plaintext.
pub fn shred_all(overrides: &Overrides) -> Result<()> {
    let blackbox = Blackbox::open(overrides)?;
    let report = blackbox.shred_all()?;

    for path in &report.updated {
        output::success(&format!("erased {}", output::path(path)));
    }
    summarize(&report, "erased", "absent")
}

/// Print per-file failures and the totals; fail if anything failed.
fn summarize(report: &BulkReport, done: &str, untouched: &str) -> Result<()> {
    for (path, err) in &report.failed {
        output::error(&format!("{}: {}", path, err));
    }
    output::dimmed(&format!(
        "{} {}, {} {}, {} failed",
        report.updated.len(),
        done,
        report.unchanged.len(),
        untouched,
        report.failed.len()
    ));

    if report.is_success() {
        Ok(())
    } else {
        Err(Error::BulkFailed {
            failed: report.failed.len(),
            total: report.total(),
        })
    }
}
