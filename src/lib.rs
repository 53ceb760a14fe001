//! blackbox - Keep encrypted secrets in version control.
//!
//! Plaintext secrets are registered once, encrypted to every admin, committed
//! only in encrypted form and decrypted again on the machines that need them.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── register      # Take a file under management
//! │   ├── deploy        # postdeploy, reencrypt-all, shred-all
//! │   ├── edit          # decrypt, encrypt, cat
//! │   ├── admins        # add-admin, remove-admin
//! │   ├── list          # list-files, list-admins
//! │   ├── check         # Repository status
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── blackbox/     # Repository context and workflows
//!     ├── repo/         # git, hg and unmanaged backends
//!     ├── cipher/       # gpg and age backends
//!     ├── registry/     # Admin and managed-file registries
//!     ├── keyring       # Keyring directory and leak check
//!     ├── envelope      # Encrypt, decrypt, decrypt-if-changed
//!     ├── erase         # Secure erase
//!     ├── config        # .blackbox.toml management
//!     └── domain/       # Stages, fingerprints, reports
//! ```
//!
//! # Example
//!
//! ```no_run
//! use blackbox::core::blackbox::Blackbox;
//! use blackbox::core::config::Overrides;
//!
//! # fn main() -> blackbox::error::Result<()> {
//! let blackbox = Blackbox::open(&Overrides::default())?;
//! let enrollment = blackbox.register("secrets/api.key".as_ref())?;
//! println!("committed {}", enrollment.ciphertext);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;
