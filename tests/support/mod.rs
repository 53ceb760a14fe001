//! Test support utilities for blackbox integration tests.
//!
//! Provides an isolated git repository per test, wired to the age backend so
//! runs are hermetic, plus helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;

#[allow(unused_imports)]
pub use assertions::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use age::secrecy::ExposeSecret;
use age::x25519;
use tempfile::TempDir;

/// Where each home keeps its age identity.
pub const IDENTITY_FILE: &str = ".age/identity.txt";

/// Repository config selecting the age backend with a per-home identity.
pub const AGE_CONFIG: &str = "cipher = \"age\"\nage_identity = \"~/.age/identity.txt\"\n";

/// A user with an age key and their own home directory.
pub struct User {
    pub home: TempDir,
    pub identity: x25519::Identity,
}

impl User {
    pub fn new() -> Self {
        let home = TempDir::new().expect("failed to create temp home");
        let identity = x25519::Identity::generate();
        let path = home.path().join(IDENTITY_FILE);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            format!("{}\n", identity.to_string().expose_secret()),
        )
        .unwrap();
        Self { home, identity }
    }

    /// The user's admin identity (age public key).
    pub fn recipient(&self) -> String {
        self.identity.to_public().to_string()
    }
}

/// Test environment with isolated temp directories.
///
/// Each test gets its own repository and users. No process-global state is
/// mutated; child processes use `.current_dir()` and `HOME`, so tests can
/// run in parallel.
pub struct Test {
    /// Repository working tree
    pub dir: TempDir,
    /// Default user, listed as an admin
    pub alice: User,
    /// Second admin
    pub bob: User,
    /// Not an admin until a test adds them
    pub carol: User,
}

impl Test {
    /// Empty directories, no repository.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
            alice: User::new(),
            bob: User::new(),
            carol: User::new(),
        }
    }

    /// An empty git repository with a committer configured.
    pub fn git_repo() -> Self {
        let t = Self::new();
        t.git(&["init", "-q"]);
        t.git(&["config", "user.email", "test@example.com"]);
        t.git(&["config", "user.name", "Test"]);
        t.git(&["config", "commit.gpgsign", "false"]);
        t
    }

    /// A git repository with alice and bob as admins, committed.
    pub fn repo() -> Self {
        let t = Self::git_repo();
        t.write(".blackbox.toml", AGE_CONFIG);
        t.write(
            "keyrings/live/blackbox-admins.txt",
            &format!("{}\n{}\n", t.alice.recipient(), t.bob.recipient()),
        );
        t.git(&["add", "."]);
        t.git(&["commit", "-q", "-m", "initial"]);
        t
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }

    /// Run git in the repository, panicking on failure.
    pub fn git(&self, args: &[&str]) -> Output {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.root())
            .env("HOME", self.alice.home.path())
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .output()
            .expect("failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    /// Number of commits on HEAD.
    pub fn commit_count(&self) -> usize {
        let output = self.git(&["rev-list", "--count", "HEAD"]);
        String::from_utf8_lossy(&output.stdout).trim().parse().unwrap()
    }

    /// Subject and file list of the last commit.
    pub fn last_commit(&self) -> (String, Vec<String>) {
        let output = self.git(&["log", "-1", "--name-only", "--format=%s"]);
        let text = String::from_utf8_lossy(&output.stdout).to_string();
        let mut lines = text.lines().filter(|l| !l.is_empty());
        let subject = lines.next().unwrap_or_default().to_string();
        (subject, lines.map(String::from).collect())
    }

    /// Paths git currently tracks.
    pub fn tracked(&self) -> Vec<String> {
        let output = self.git(&["ls-files"]);
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(String::from)
            .collect()
    }
}
