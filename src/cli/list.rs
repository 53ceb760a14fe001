//! Listing commands.

use crate::cli::output;
use crate::core::blackbox::Blackbox;
use crate::core::config::Overrides;
use crate::error::Result;

/// List registered files.
pub fn files(json: bool, overrides: &Overrides) -> Result<()> {
    let blackbox = Blackbox::open(overrides)?;
    let files = blackbox.files()?.list();

    if json {
        let result = serde_json::json!({
            "files": files,
            "count": files.len(),
        });
        output::data(&serde_json::to_string_pretty(&result)?);
    } else if files.is_empty() {
        output::dimmed("no registered files");
    } else {
        for file in &files {
            output::data(file);
        }
    }
    Ok(())
}

/// List admins.
pub fn admins(json: bool, overrides: &Overrides) -> Result<()> {
    let blackbox = Blackbox::open(overrides)?;
    let admins = blackbox.list_admins()?;

    if json {
        let result = serde_json::json!({
            "admins": admins,
            "count": admins.len(),
        });
        output::data(&serde_json::to_string_pretty(&result)?);
    } else if admins.is_empty() {
        output::dimmed("no admins");
    } else {
        for admin in &admins {
            output::data(admin);
        }
    }
    Ok(())
}
