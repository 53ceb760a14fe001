//! git backend.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{append_ignore, check, run, slash_path, Backend, Vcs};
use crate::error::{RepoError, Result};

/// git, driven through the `git` CLI.
pub struct Git {
    root: PathBuf,
}

impl Git {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Top-level directory of the git work tree containing `start`.
    pub fn find_root(start: &Path) -> Option<PathBuf> {
        let output = run("git", ["rev-parse", "--show-toplevel"], start).ok()?;
        if !output.status.success() {
            return None;
        }
        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if root.is_empty() {
            None
        } else {
            Some(PathBuf::from(root))
        }
    }

    fn git(&self, command: &str, args: Vec<OsString>) -> Result<()> {
        let mut full: Vec<OsString> = vec![command.into()];
        full.extend(args);
        check(run("git", &full, &self.root)?, &format!("git {}", command))?;
        Ok(())
    }
}

/// `-- path...` tail shared by every command.
fn pathspec(paths: &[PathBuf]) -> Vec<OsString> {
    std::iter::once(OsString::from("--"))
        .chain(paths.iter().map(|p| p.as_os_str().to_os_string()))
        .collect()
}

/// Escape characters gitignore would treat as patterns.
fn ignore_entry(path: &Path) -> String {
    let mut entry = String::from("/");
    for ch in slash_path(path).chars() {
        if matches!(ch, '*' | '?' | '[' | '\\' | '!' | '#') {
            entry.push('\\');
        }
        entry.push(ch);
    }
    entry
}

impl Vcs for Git {
    fn backend(&self) -> Backend {
        Backend::Git
    }

    fn is_tracked(&self, path: &Path) -> Result<bool> {
        let output = run(
            "git",
            [
                OsString::from("ls-files"),
                OsString::from("--error-unmatch"),
                OsString::from("--"),
                path.as_os_str().to_os_string(),
            ],
            &self.root,
        )?;

        // 0: tracked, 1: pathspec did not match, anything else: git is unhappy.
        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(RepoError::TrackedCheck {
                path: path.display().to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into()),
        }
    }

    fn add(&self, paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        debug!(count = paths.len(), "git add");
        self.git("add", pathspec(paths))
    }

    fn remove(&self, paths: &[PathBuf]) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        debug!(count = paths.len(), "git rm");
        let mut args: Vec<OsString> = vec!["--cached".into(), "--ignore-unmatch".into(), "-q".into()];
        args.extend(pathspec(paths));
        self.git("rm", args)
    }

    fn commit(&self, message: &str, paths: &[PathBuf]) -> Result<()> {
        debug!(message, count = paths.len(), "git commit");
        let mut args: Vec<OsString> = vec!["-q".into(), "-m".into(), message.into()];
        args.extend(pathspec(paths));
        self.git("commit", args)
    }

    fn ignore(&self, path: &Path) -> Result<Option<PathBuf>> {
        let file = PathBuf::from(".gitignore");
        let changed = append_ignore(&self.root.join(&file), None, &ignore_entry(path))?;
        Ok(changed.then_some(file))
    }
}
