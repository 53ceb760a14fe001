//! Version-control abstraction.
//!
//! Provides the four operations enrollment needs (tracked check, add,
//! remove, commit) over interchangeable backends.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Vcs` trait
//! 2. Teach `Repository::detect` how to find its root
//! 3. Add a `Backend` variant

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tracing::{debug, trace};

use crate::error::{RepoError, Result, ValidationError};

mod git;
mod hg;
mod unmanaged;

pub use git::Git;
pub use hg::Mercurial;
pub use unmanaged::Unmanaged;

/// Detected backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Git,
    Mercurial,
    /// No version control; the root comes from `BLACKBOX_REPOBASE`.
    Unmanaged,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Git => "git",
            Backend::Mercurial => "hg",
            Backend::Unmanaged => "none",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Version-control capability.
///
/// All paths are relative to the repository root. Implementations run their
/// commands from the root.
pub trait Vcs {
    /// Backend kind.
    fn backend(&self) -> Backend;

    /// Whether `path` is known to version control.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::TrackedCheck` when the backend cannot answer.
    fn is_tracked(&self, path: &Path) -> Result<bool>;

    /// Stage paths for the next commit.
    fn add(&self, paths: &[PathBuf]) -> Result<()>;

    /// Stop tracking paths. Paths that are not tracked are ignored.
    fn remove(&self, paths: &[PathBuf]) -> Result<()>;

    /// Commit exactly the given paths.
    fn commit(&self, message: &str, paths: &[PathBuf]) -> Result<()>;

    /// Add `path` to the backend's ignore file.
    ///
    /// Returns the ignore file (relative to the root) when it was changed.
    fn ignore(&self, path: &Path) -> Result<Option<PathBuf>>;
}

/// A detected repository: its root and the backend that manages it.
///
/// Detection happens once per process; the value is then passed to every
/// workflow.
pub struct Repository {
    root: PathBuf,
    vcs: Box<dyn Vcs>,
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .field("backend", &self.vcs.backend())
            .finish()
    }
}

impl Repository {
    /// Wrap an already-known root and backend.
    pub fn new(root: impl Into<PathBuf>, vcs: Box<dyn Vcs>) -> Self {
        let root = root.into();
        let root = root.canonicalize().unwrap_or(root);
        Self { root, vcs }
    }

    /// Find the repository containing `start`.
    ///
    /// Tries git, then mercurial, then an explicit `repobase`.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::NoRepository` if nothing matches.
    pub fn detect(start: &Path, repobase: Option<&Path>) -> Result<Self> {
        if let Some(root) = Git::find_root(start) {
            debug!(root = %root.display(), "detected git repository");
            return Ok(Self::new(root.clone(), Box::new(Git::new(root))));
        }
        if let Some(root) = Mercurial::find_root(start) {
            debug!(root = %root.display(), "detected mercurial repository");
            return Ok(Self::new(root.clone(), Box::new(Mercurial::new(root))));
        }
        if let Some(base) = repobase {
            if base.is_dir() {
                debug!(root = %base.display(), "using unmanaged repository base");
                return Ok(Self::new(base, Box::new(Unmanaged)));
            }
        }
        Err(RepoError::NoRepository.into())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn backend(&self) -> Backend {
        self.vcs.backend()
    }

    pub fn vcs(&self) -> &dyn Vcs {
        self.vcs.as_ref()
    }

    /// Absolute location of a root-relative path.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Resolve a user-supplied path against the working directory and make it
    /// relative to the repository root.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidInput` if the path lies outside the
    /// repository or names the root itself.
    pub fn relative(&self, input: &Path) -> Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        self.relative_to(input, &cwd)
    }

    /// Like [`Repository::relative`] with an explicit working directory.
    pub fn relative_to(&self, input: &Path, cwd: &Path) -> Result<PathBuf> {
        let absolute = normalize(&cwd.join(input));
        let resolved = resolve_existing_prefix(&absolute);

        match resolved.strip_prefix(&self.root) {
            Ok(rel) if !rel.as_os_str().is_empty() => Ok(rel.to_path_buf()),
            _ => Err(ValidationError::invalid(
                input.display(),
                format!("not inside the repository at {}", self.root.display()),
            )
            .into()),
        }
    }
}

/// Lexically remove `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize the longest existing ancestor so symlinked working
/// directories still land under the canonical root.
fn resolve_existing_prefix(path: &Path) -> PathBuf {
    let mut existing = path.to_path_buf();
    let mut rest = Vec::new();
    while !existing.exists() {
        match (existing.file_name().map(|n| n.to_os_string()), existing.parent()) {
            (Some(name), Some(parent)) => {
                rest.push(name);
                existing = parent.to_path_buf();
            }
            _ => return path.to_path_buf(),
        }
    }
    let mut resolved = existing.canonicalize().unwrap_or(existing);
    for name in rest.into_iter().rev() {
        resolved.push(name);
    }
    resolved
}

/// Run an external command from `cwd` and capture its output.
pub(crate) fn run<I, S>(program: &str, args: I, cwd: &Path) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
    trace!(program, ?args, cwd = %cwd.display(), "running command");

    Command::new(program)
        .args(&args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| {
            RepoError::Spawn {
                command: program.to_string(),
                source,
            }
            .into()
        })
}

/// Turn a non-zero exit into `RepoError::CommandFailed`.
pub(crate) fn check(output: Output, command: &str) -> Result<Output> {
    if output.status.success() {
        Ok(output)
    } else {
        Err(RepoError::CommandFailed {
            command: command.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into())
    }
}

/// Append an entry to an ignore file unless an identical line exists.
///
/// `header` is written first when the file does not already contain it.
/// Returns whether the file changed.
pub(crate) fn append_ignore(file: &Path, header: Option<&str>, entry: &str) -> Result<bool> {
    let existing = if file.exists() {
        fs::read_to_string(file)?
    } else {
        String::new()
    };

    if existing.lines().any(|l| l.trim() == entry) {
        return Ok(false);
    }

    let mut updated = existing.clone();
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    if let Some(header) = header {
        if !existing.lines().any(|l| l.trim() == header) {
            updated.push_str(header);
            updated.push('\n');
        }
    }
    updated.push_str(entry);
    updated.push('\n');

    fs::write(file, updated)?;
    Ok(true)
}

/// Forward-slash form of a relative path.
pub fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
