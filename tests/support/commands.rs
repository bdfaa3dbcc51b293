//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::path::Path;
use std::process::Output;

impl Test {
    /// Create an envseal command with an isolated environment.
    ///
    /// HOME points at the temporary home directory, the working directory is
    /// the test project, and colors and inherited log filters are disabled.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("envseal").expect("failed to find envseal binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("ENVSEAL_LOG");
        cmd.env_remove("ENVSEAL_FILE");
        cmd.env_remove("ENVSEAL_IDENTITY");
        cmd.env_remove("ENVSEAL_MANIFEST");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Same as [`Test::cmd`] but using another identity file.
    pub fn cmd_as(&self, identity: &Path) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--identity").arg(identity);
        cmd
    }

    /// Shortcut for `envseal init --name`.
    pub fn init_cmd(&self, name: &str) -> Output {
        self.cmd()
            .args(["init", "--name", name])
            .output()
            .expect("failed to run envseal init")
    }

    /// Shortcut for `envseal set KEY=VALUE`.
    pub fn set(&self, key: &str, val: &str) -> Output {
        self.cmd()
            .arg("set")
            .arg(format!("{}={}", key, val))
            .output()
            .expect("failed to run envseal set")
    }

    /// Shortcut for `envseal get`.
    pub fn get(&self, key: &str) -> Output {
        self.cmd()
            .args(["get", key])
            .output()
            .expect("failed to run envseal get")
    }

    /// Shortcut for `envseal get` as another identity.
    pub fn get_as(&self, identity: &Path, key: &str) -> Output {
        self.cmd_as(identity)
            .args(["get", key])
            .output()
            .expect("failed to run envseal get")
    }

    /// Shortcut for `envseal unset`.
    pub fn unset(&self, keys: &[&str]) -> Output {
        self.cmd()
            .arg("unset")
            .args(keys)
            .output()
            .expect("failed to run envseal unset")
    }

    /// Shortcut for `envseal print`.
    pub fn print(&self) -> Output {
        self.cmd()
            .arg("print")
            .output()
            .expect("failed to run envseal print")
    }

    /// Shortcut for `envseal print --json`.
    pub fn print_json(&self) -> Output {
        self.cmd()
            .args(["print", "--json"])
            .output()
            .expect("failed to run envseal print --json")
    }

    /// Shortcut for `envseal users add`.
    pub fn users_add(&self, name: &str, key: &str) -> Output {
        self.cmd()
            .args(["users", "add", name, key])
            .output()
            .expect("failed to run envseal users add")
    }

    /// Shortcut for `envseal users remove`.
    pub fn users_remove(&self, identifier: &str) -> Output {
        self.cmd()
            .args(["users", "remove", identifier])
            .output()
            .expect("failed to run envseal users remove")
    }

    /// Shortcut for `envseal users list`.
    pub fn users_list(&self) -> Output {
        self.cmd()
            .args(["users", "list"])
            .output()
            .expect("failed to run envseal users list")
    }

    /// Shortcut for `envseal users list --json`.
    pub fn users_list_json(&self) -> Output {
        self.cmd()
            .args(["users", "list", "--json"])
            .output()
            .expect("failed to run envseal users list --json")
    }

    /// Shortcut for `envseal rekey`.
    pub fn rekey(&self) -> Output {
        self.cmd()
            .arg("rekey")
            .output()
            .expect("failed to run envseal rekey")
    }

    /// Shortcut for `envseal rekey --rotate`.
    pub fn rotate(&self) -> Output {
        self.cmd()
            .args(["rekey", "--rotate"])
            .output()
            .expect("failed to run envseal rekey --rotate")
    }

    /// Shortcut for `envseal whoami`.
    pub fn whoami(&self) -> Output {
        self.cmd()
            .arg("whoami")
            .output()
            .expect("failed to run envseal whoami")
    }
}
