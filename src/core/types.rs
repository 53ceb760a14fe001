//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// An opaque name for a trusted key owner (gpg user id, email,
/// fingerprint or age public key depending on the cipher).
pub type RecipientId = String;

/// A managed plaintext path, relative to the repository root, using `/`.
pub type ManagedPath = String;
