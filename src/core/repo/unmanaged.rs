//! Backend for trees without version control.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Backend, Vcs};
use crate::error::Result;

/// A plain directory. Nothing is tracked and every VCS operation is a no-op.
pub struct Unmanaged;

impl Vcs for Unmanaged {
    fn backend(&self) -> Backend {
        Backend::Unmanaged
    }

    fn is_tracked(&self, _path: &Path) -> Result<bool> {
        Ok(false)
    }

    fn add(&self, paths: &[PathBuf]) -> Result<()> {
        debug!(?paths, "no version control: skipping add");
        Ok(())
    }

    fn remove(&self, paths: &[PathBuf]) -> Result<()> {
        debug!(?paths, "no version control: skipping remove");
        Ok(())
    }

    fn commit(&self, message: &str, paths: &[PathBuf]) -> Result<()> {
        debug!(message, ?paths, "no version control: skipping commit");
        Ok(())
    }

    fn ignore(&self, _path: &Path) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}
