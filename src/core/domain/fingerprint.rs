//! Content fingerprints.
//!
//! A fingerprint only answers "did these bytes change?". It is never used to
//! authenticate anything.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Digest of a file's bytes, or a sentinel for a file that does not exist.
///
/// The sentinel never matches anything, itself included, so a missing
/// plaintext always counts as changed.
#[derive(Debug, Clone, Copy)]
pub enum Fingerprint {
    Digest([u8; 32]),
    Missing,
}

impl Fingerprint {
    /// Fingerprint an in-memory buffer.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self::Digest(Sha256::digest(bytes).into())
    }

    /// Fingerprint a file, returning `Missing` if it does not exist.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::Missing),
            Err(e) => return Err(e),
        };

        let mut hasher = Sha256::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(Self::Digest(hasher.finalize().into()))
    }

    /// True only when both sides are digests of identical content.
    pub fn matches(&self, other: &Fingerprint) -> bool {
        match (self, other) {
            (Self::Digest(a), Self::Digest(b)) => a == b,
            _ => false,
        }
    }
}
