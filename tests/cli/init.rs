//! Tests for `envseal init` and `envseal whoami`.

use crate::support::*;

#[test]
fn test_init_creates_all_files() {
    let t = Test::init("demo");

    assert!(t.identity_path().exists());
    assert!(t.manifest_path().exists());
    assert!(t.secrets_path().exists());
}

#[test]
fn test_init_writes_example_secret() {
    let t = Test::init("demo");

    let output = t.get("HELLO");
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "world");
    assert!(!t.secrets_file().contains("world"));
}

#[test]
fn test_init_roster_has_project_and_current_user() {
    let t = Test::init("demo");

    let manifest = t.manifest_file();
    assert!(manifest.contains("project_name = \"demo\""));

    let whoami = t.whoami();
    assert_success(&whoami);
    assert!(manifest.contains(stdout(&whoami).trim()));
}

#[test]
fn test_init_twice_keeps_existing_files() {
    let t = Test::with_secrets("demo", &[("TOKEN", "abc")]);
    let before = t.secrets_file();

    let output = t.init_cmd("other");
    assert_success(&output);
    assert_stderr_contains(&output, "already exists");

    assert_eq!(t.secrets_file(), before);
    assert!(t.manifest_file().contains("demo"));
}

#[test]
fn test_init_reuses_identity() {
    let t = Test::init("demo");
    let key = stdout(&t.whoami());

    std::fs::remove_file(t.secrets_path()).unwrap();
    std::fs::remove_file(t.manifest_path()).unwrap();
    assert_success(&t.init_cmd("demo"));

    assert_eq!(stdout(&t.whoami()), key);
    assert_roundtrip(&t, "AFTER", "reinit");
}

#[test]
fn test_whoami_prints_public_key() {
    let t = Test::init("demo");
    let output = t.whoami();
    assert_success(&output);
    assert!(stdout(&output).trim().starts_with("age1"));
}

#[cfg(unix)]
#[test]
fn test_files_are_private() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::init("demo");
    for path in [t.identity_path(), t.secrets_path(), t.manifest_path()] {
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "{}", path.display());
    }
}
