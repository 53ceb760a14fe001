//! Constants used throughout blackbox.
//!
//! Centralizes magic strings and configuration values.

/// Optional per-repository configuration file (.blackbox.toml).
pub const CONFIG_FILE: &str = ".blackbox.toml";

/// Keyring directory used when `.blackbox` exists at the repository root.
pub const LEGACY_KEYRING_DIR: &str = ".blackbox";

/// Default keyring directory relative to the repository root.
pub const DEFAULT_KEYRING_DIR: &str = "keyrings/live";

/// Newline-separated admin identities.
pub const ADMINS_FILE: &str = "blackbox-admins.txt";

/// Newline-separated, sorted plaintext paths under management.
pub const FILES_FILE: &str = "blackbox-files.txt";

/// Public keyring candidates, newest format first.
pub const PUBRING_FILES: &[&str] = &["pubring.kbx", "pubring.gpg"];

/// Private key material that must never appear in the keyring directory.
pub const SECRING_FILES: &[&str] = &["secring.gpg", "secring.kbx"];

/// GnuPG 2.1+ private key directory.
pub const PRIVATE_KEYS_DIR: &str = "private-keys-v1.d";

/// Trust database written by gpg next to the pubring.
pub const TRUSTDB_FILE: &str = "trustdb.gpg";

/// Supported cipher backends.
pub const CIPHERS: &[&str] = &["gpg", "age"];

/// Default gpg program.
pub const DEFAULT_GPG: &str = "gpg";

/// Default age identity file relative to the user's config directory.
pub const AGE_IDENTITY_FILE: &str = "blackbox/age-identity.txt";

/// Secure-delete programs tried in order, with their arguments.
pub const SHRED_TOOLS: &[(&str, &[&str])] = &[("shred", &["-u"]), ("srm", &["-f"])];
