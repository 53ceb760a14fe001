//! Command-line interface.

pub mod admins;
pub mod check;
pub mod completions;
pub mod deploy;
pub mod edit;
pub mod list;
pub mod output;
pub mod register;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::Overrides;

/// blackbox - Keep encrypted secrets in version control.
#[derive(Parser)]
#[command(
    name = "blackbox",
    about = "Keep encrypted secrets in version control",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Keyring directory, relative to the repository root
    #[arg(long, global = true, env = "BLACKBOXDATA", value_name = "DIR")]
    pub keyring_dir: Option<PathBuf>,

    /// Repository root to use when not inside git or mercurial
    #[arg(long, global = true, env = "BLACKBOX_REPOBASE", value_name = "DIR")]
    pub repobase: Option<PathBuf>,

    /// gpg program to run
    #[arg(long, global = true, env = "GPG", value_name = "PROGRAM")]
    pub gpg: Option<String>,
}

impl Cli {
    /// Settings that override `.blackbox.toml`.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            keyring_dir: self.keyring_dir.clone(),
            gpg: self.gpg.clone(),
            repobase: self.repobase.clone(),
        }
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt a file, register it and commit the result
    Register {
        /// Plaintext file to protect
        file: PathBuf,
    },

    /// Decrypt every registered file (run after deploying)
    Postdeploy,

    /// Re-encrypt every registered file to the current admins
    #[command(name = "reencrypt-all")]
    ReencryptAll {
        /// Commit the re-encrypted files
        #[arg(long)]
        commit: bool,
    },

    /// Decrypt one registered file for editing
    Decrypt {
        /// Registered file (plaintext or encrypted name)
        file: PathBuf,
        /// Overwrite an existing plaintext without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Re-encrypt one registered file and erase its plaintext
    Encrypt {
        /// Registered file (plaintext or encrypted name)
        file: PathBuf,
    },

    /// Print a registered file's contents
    Cat {
        /// Registered file (plaintext or encrypted name)
        file: PathBuf,
    },

    /// Securely erase every decrypted plaintext
    #[command(name = "shred-all")]
    ShredAll,

    /// List registered files
    #[command(name = "list-files")]
    ListFiles {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List admins
    #[command(name = "list-admins")]
    ListAdmins {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add an admin whose public key is in your keychain
    #[command(name = "add-admin")]
    AddAdmin {
        /// Key identity (email for gpg, public key for age)
        identity: String,
    },

    /// Remove an admin
    #[command(name = "remove-admin")]
    RemoveAdmin {
        /// Key identity as listed in the admin registry
        identity: String,
    },

    /// Show repository, keyring and registry status
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Execute a command.
pub fn execute(command: Command, overrides: &Overrides) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Register { file } => register::execute(&file, overrides),
        Postdeploy => deploy::postdeploy(overrides),
        ReencryptAll { commit } => deploy::reencrypt_all(commit, overrides),
        Decrypt { file, force } => edit::decrypt(&file, force, overrides),
        Encrypt { file } => edit::encrypt(&file, overrides),
        Cat { file } => edit::cat(&file, overrides),
        ShredAll => deploy::shred_all(overrides),
        ListFiles { json } => list::files(json, overrides),
        ListAdmins { json } => list::admins(json, overrides),
        AddAdmin { identity } => admins::add(&identity, overrides),
        RemoveAdmin { identity } => admins::remove(&identity, overrides),
        Check => check::execute(overrides),
        Completions { shell } => completions::execute(shell),
    }
}
