//! Shared CLI output helpers for consistent terminal output.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: paths, commands, hints
//! - Bold: headers, important values
//! - Dimmed: secondary info
//!
//! Warnings, hints and errors go to stderr.

use console::style;
use std::fmt::Display;

const RULE_WIDTH: usize = 56;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ registered secrets/api.key`
pub fn success(msg: &str) {
    if colors_enabled() {
        println!("{} {}", style("✓").green(), msg);
    } else {
        println!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
///
/// Example: `✗ file not found: secrets/api.key`
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message to stderr (yellow).
pub fn warn(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("⚠").yellow(), msg);
    } else {
        eprintln!("⚠ {}", msg);
    }
}

/// Print a hint message to stderr (cyan).
///
/// Example: `→ run: blackbox reencrypt-all --commit`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a bold section header.
pub fn header(title: &str) {
    if colors_enabled() {
        println!("{}", style(title).bold());
    } else {
        println!("{}", title);
    }
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  backend:  git`
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled() {
        println!("  {}  {}", style(label).dim(), style(value).bold());
    } else {
        println!("  {}  {}", label, value);
    }
}

/// Print a horizontal rule separator.
pub fn rule() {
    let line = "─".repeat(RULE_WIDTH);
    if colors_enabled() {
        println!("{}", style(line).dim());
    } else {
        println!("{}", line);
    }
}

/// Format a path string in cyan.
pub fn path(p: &str) -> String {
    if colors_enabled() {
        style(p).cyan().to_string()
    } else {
        p.to_string()
    }
}

/// Format a command string in green.
pub fn cmd(c: &str) -> String {
    if colors_enabled() {
        style(c).green().to_string()
    } else {
        c.to_string()
    }
}

/// Print a dimmed/secondary message.
pub fn dimmed(msg: &str) {
    if colors_enabled() {
        println!("{}", style(msg).dim());
    } else {
        println!("{}", msg);
    }
}

/// Print a section header with a separator line.
///
/// Example:
/// ```text
/// Managed files
/// ────────────────────────────────────────────────────────
/// ```
pub fn section(title: &str) {
    println!();
    header(title);
    rule();
}

/// Print machine-readable output unstyled.
pub fn data(text: &str) {
    println!("{}", text);
}
