//! blackbox - Keep encrypted secrets in version control.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use std::path::Path;

use blackbox::cli::output;
use blackbox::cli::{execute, Cli};
use blackbox::core::constants;
use blackbox::error::{Error, ErrorKind, RegistryError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("BLACKBOX_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("blackbox=debug")
        } else {
            EnvFilter::new("blackbox=warn")
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("BLACKBOX_LOG_FORMAT").is_ok_and(|f| f == "json") {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false).without_time())
            .init();
    }

    let overrides = cli.overrides();
    if let Err(e) = execute(cli.command, &overrides) {
        output::error(&e.to_string());
        if let Some(hint) = hint(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

/// Suggest a next step for errors the user can fix.
fn hint(e: &Error) -> Option<&'static str> {
    if matches!(e, Error::Interrupted { .. }) {
        return Some("nothing was rolled back; finish the remaining steps by hand");
    }
    match e.kind() {
        ErrorKind::NoRepository => {
            Some("run inside a git or mercurial checkout, or set BLACKBOX_REPOBASE")
        }
        ErrorKind::RegistryMissing => match missing_registry(e).and_then(Path::file_name) {
            Some(name) if name == constants::FILES_FILE => {
                Some("no files are registered yet; add one with: blackbox register <file>")
            }
            _ => Some("add an admin with: blackbox add-admin <identity>"),
        },
        ErrorKind::SecretKeyLeakDetected => {
            Some("delete the private key files from the keyring directory and never commit them")
        }
        ErrorKind::AlreadyRegistered => Some("to change it run: blackbox decrypt <file>"),
        _ => None,
    }
}

fn missing_registry(e: &Error) -> Option<&Path> {
    match e {
        Error::Interrupted { source, .. } => missing_registry(source),
        Error::Registry(RegistryError::Missing(path)) => Some(path),
        _ => None,
    }
}
