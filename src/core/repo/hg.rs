//! Mercurial backend.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{append_ignore, check, run, slash_path, Backend, Vcs};
use crate::error::{RepoError, Result};

/// Mercurial, driven through the `hg` CLI.
pub struct Mercurial {
    root: PathBuf,
}

impl Mercurial {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root of the mercurial repository containing `start`.
    pub fn find_root(start: &Path) -> Option<PathBuf> {
        let output = run("hg", ["root"], start).ok()?;
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

    fn hg(&self, command: &str, args: Vec<OsString>) -> Result<()> {
        let mut full: Vec<OsString> = vec![command.into()];
        full.extend(args);
        check(run("hg", &full, &self.root)?, &format!("hg {}", command))?;
        Ok(())
    }

    fn pathspec(paths: &[&PathBuf]) -> Vec<OsString> {
        std::iter::once(OsString::from("--"))
            .chain(paths.iter().map(|p| p.as_os_str().to_os_string()))
            .collect()
    }

    /// Split paths by whether hg already tracks them.
    fn partition<'a>(
        &self,
        paths: &'a [PathBuf],
    ) -> Result<(Vec<&'a PathBuf>, Vec<&'a PathBuf>)> {
        let mut tracked = Vec::new();
        let mut untracked = Vec::new();
        for path in paths {
            if self.is_tracked(path)? {
                tracked.push(path);
            } else {
                untracked.push(path);
            }
        }
        Ok((tracked, untracked))
    }
}

impl Vcs for Mercurial {
    fn backend(&self) -> Backend {
        Backend::Mercurial
    }

    fn is_tracked(&self, path: &Path) -> Result<bool> {
        let output = run(
            "hg",
            [
                OsString::from("files"),
                OsString::from("--"),
                path.as_os_str().to_os_string(),
            ],
            &self.root,
        )?;

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
        // hg complains about files it already tracks; their changes are
        // picked up by the commit anyway.
        let (_, untracked) = self.partition(paths)?;
        if untracked.is_empty() {
            return Ok(());
        }
        debug!(count = untracked.len(), "hg add");
        self.hg("add", Self::pathspec(&untracked))
    }

    fn remove(&self, paths: &[PathBuf]) -> Result<()> {
        let (tracked, _) = self.partition(paths)?;
        if tracked.is_empty() {
            return Ok(());
        }
        debug!(count = tracked.len(), "hg forget");
        self.hg("forget", Self::pathspec(&tracked))
    }

    fn commit(&self, message: &str, paths: &[PathBuf]) -> Result<()> {
        debug!(message, count = paths.len(), "hg commit");
        let mut args: Vec<OsString> = vec!["-m".into(), message.into()];
        args.extend(Self::pathspec(&paths.iter().collect::<Vec<_>>()));
        self.hg("commit", args)
    }

    fn ignore(&self, path: &Path) -> Result<Option<PathBuf>> {
        let file = PathBuf::from(".hgignore");
        let changed = append_ignore(
            &self.root.join(&file),
            Some("syntax: glob"),
            &slash_path(path),
        )?;
        Ok(changed.then_some(file))
    }
}
