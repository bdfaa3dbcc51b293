//! Test support utilities for envseal integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;

#[allow(unused_imports)]
pub use assertions::*;

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// An invalid public key for negative tests.
pub const INVALID_PUBLIC_KEY: &str = "not-a-valid-age-key";

/// Secrets used across multiple tests.
pub const STANDARD_SECRETS: &[(&str, &str)] = &[
    ("DATABASE_URL", "postgres://localhost/mydb"),
    ("API_KEY", "sk-test-12345"),
    ("JWT_SECRET", "super-secret-jwt-token"),
];

/// Test environment with isolated temp directories.
///
/// Each test gets its own temporary project dir and home dir. Child
/// processes use `.current_dir()` and an explicit `HOME`, so tests can run in
/// parallel.
pub struct Test {
    /// Temporary directory for the test project
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create a test environment with `envseal init` already run.
    pub fn init(name: &str) -> Self {
        let t = Self::new();
        let output = t.init_cmd(name);
        assert!(
            output.status.success(),
            "Failed to initialize: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Create an initialized environment with secrets set.
    pub fn with_secrets(name: &str, secrets: &[(&str, &str)]) -> Self {
        let t = Self::init(name);
        for (k, v) in secrets {
            assert_success(&t.set(k, v));
        }
        t
    }

    /// Path of the secrets file.
    pub fn secrets_path(&self) -> PathBuf {
        self.dir.path().join("secrets.enc.toml")
    }

    /// Path of the roster file.
    pub fn manifest_path(&self) -> PathBuf {
        self.dir.path().join("envseal.toml")
    }

    /// Path of the default identity.
    pub fn identity_path(&self) -> PathBuf {
        self.home.path().join(".envseal").join("identity")
    }

    /// Raw contents of the secrets file.
    pub fn secrets_file(&self) -> String {
        fs::read_to_string(self.secrets_path()).expect("failed to read secrets file")
    }

    /// Raw contents of the roster file.
    pub fn manifest_file(&self) -> String {
        fs::read_to_string(self.manifest_path()).expect("failed to read roster file")
    }

    /// Create another identity outside the default location.
    ///
    /// Returns its path and public key.
    pub fn teammate(&self, name: &str) -> (PathBuf, String) {
        let path = self.home.path().join(format!("{}.key", name));
        let identity = envseal::Identity::create(&path).expect("failed to create identity");
        (path, identity.public_key())
    }
}
