//! Command helper methods for Test.

use super::{Test, User};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// A blackbox command run by alice.
    ///
    /// Returns a Command configured with:
    /// - HOME set to alice's home directory
    /// - Current directory set to the repository
    /// - NO_COLOR so output can be matched verbatim
    pub fn cmd(&self) -> Command {
        self.cmd_as(&self.alice)
    }

    /// A blackbox command run by `user`.
    pub fn cmd_as(&self, user: &User) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("blackbox").expect("failed to find blackbox binary");
        cmd.env("HOME", user.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", user.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env("GIT_CONFIG_NOSYSTEM", "1");
        cmd.env_remove("BLACKBOXDATA");
        cmd.env_remove("BLACKBOX_REPOBASE");
        cmd.env_remove("BLACKBOX_LOG");
        cmd.env_remove("BLACKBOX_LOG_FORMAT");
        cmd.current_dir(self.dir.path());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .unwrap_or_else(|e| panic!("failed to run blackbox {:?}: {}", args, e))
    }

    /// Shortcut for `blackbox register`.
    pub fn register(&self, file: &str) -> Output {
        self.run(&["register", file])
    }

    /// Shortcut for `blackbox postdeploy`.
    pub fn postdeploy(&self) -> Output {
        self.run(&["postdeploy"])
    }

    /// Shortcut for `blackbox reencrypt-all --commit`.
    pub fn reencrypt_all(&self) -> Output {
        self.run(&["reencrypt-all", "--commit"])
    }

    /// Shortcut for `blackbox decrypt`.
    pub fn decrypt(&self, file: &str) -> Output {
        self.run(&["decrypt", file])
    }

    /// Shortcut for `blackbox encrypt`.
    pub fn encrypt(&self, file: &str) -> Output {
        self.run(&["encrypt", file])
    }

    /// `blackbox cat` as `user`.
    pub fn cat_as(&self, user: &User, file: &str) -> Output {
        self.cmd_as(user)
            .args(["cat", file])
            .output()
            .expect("failed to run blackbox cat")
    }

    /// Shortcut for `blackbox list-files`.
    pub fn list_files(&self) -> Output {
        self.run(&["list-files"])
    }

    /// Shortcut for `blackbox list-admins`.
    pub fn list_admins(&self) -> Output {
        self.run(&["list-admins"])
    }

    /// Shortcut for `blackbox add-admin`.
    pub fn add_admin(&self, identity: &str) -> Output {
        self.run(&["add-admin", identity])
    }

    /// Shortcut for `blackbox remove-admin`.
    pub fn remove_admin(&self, identity: &str) -> Output {
        self.run(&["remove-admin", identity])
    }

    /// Shortcut for `blackbox check`.
    pub fn check(&self) -> Output {
        self.run(&["check"])
    }

    /// Write a file and register it, asserting success.
    pub fn enroll(&self, file: &str, contents: &str) {
        self.write(file, contents);
        let output = self.register(file);
        assert!(
            output.status.success(),
            "Failed to register {}: {}",
            file,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}
