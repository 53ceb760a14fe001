//! Admin management commands.

use crate::cli::output;
use crate::core::blackbox::Blackbox;
use crate::core::config::Overrides;
use crate::error::Result;

/// Add an admin.
pub fn add(identity: &str, overrides: &Overrides) -> Result<()> {
    let blackbox = Blackbox::open(overrides)?;

    if blackbox.add_admin(identity)? {
        output::success(&format!("added admin {}", identity));
        output::hint(&format!(
            "to let them open existing files run: {}",
            output::cmd("blackbox reencrypt-all --commit")
        ));
    } else {
        output::dimmed(&format!("{} is already an admin", identity));
    }
    Ok(())
}

/// Remove an admin.
pub fn remove(identity: &str, overrides: &Overrides) -> Result<()> {
    let blackbox = Blackbox::open(overrides)?;
    blackbox.remove_admin(identity)?;

    output::success(&format!("removed admin {}", identity));
    output::warn("existing files can still be opened with the removed key");
    output::hint(&format!(
        "run: {}",
        output::cmd("blackbox reencrypt-all --commit")
    ));
    Ok(())
}
