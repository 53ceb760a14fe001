//! Enrollment stages.

use std::fmt;

/// A state reached while enrolling a file.
///
/// Stages are strictly sequential. A failed enrollment reports the stages
/// it completed so the user can finish the remaining steps by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Nothing has happened yet.
    Unregistered,
    /// Leak check passed and public keys were imported.
    KeychainPrepared,
    /// The envelope was written next to the plaintext.
    Encrypted,
    /// The plaintext path was added to the managed-file registry.
    ListUpdated,
    /// The plaintext was securely erased.
    PlaintextPurged,
    /// Everything was committed.
    Committed,
}

impl Stage {
    /// Every stage after `Unregistered`, in order.
    pub const TRANSITIONS: [Stage; 5] = [
        Stage::KeychainPrepared,
        Stage::Encrypted,
        Stage::ListUpdated,
        Stage::PlaintextPurged,
        Stage::Committed,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Unregistered => "unregistered",
            Stage::KeychainPrepared => "keychain prepared",
            Stage::Encrypted => "encrypted",
            Stage::ListUpdated => "list updated",
            Stage::PlaintextPurged => "plaintext purged",
            Stage::Committed => "committed",
        }
    }

    /// Comma-separated labels, or `none`.
    pub fn describe(stages: &[Stage]) -> String {
        if stages.is_empty() {
            return "none".to_string();
        }
        stages
            .iter()
            .map(Stage::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
