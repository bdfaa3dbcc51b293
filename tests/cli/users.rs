//! Tests for `envseal users add/remove/list`.

use crate::support::*;

#[test]
fn test_users_list_shows_creator() {
    let t = Test::init("demo");
    let key = stdout(&t.whoami());

    let output = t.users_list();
    assert_success(&output);
    assert_stdout_contains(&output, key.trim());
}

#[test]
fn test_users_list_json() {
    let t = Test::init("demo");

    let output = t.users_list_json();
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(parsed["project_name"], "demo");
    assert_eq!(parsed["users"].as_array().unwrap().len(), 1);
}

#[test]
fn test_users_add_prints_pending_action() {
    let t = Test::init("demo");
    let (_, bob) = t.teammate("bob");

    let output = t.users_add("bob", &bob);
    assert_success(&output);
    assert_stderr_contains(&output, "envseal rekey");

    assert_stdout_contains(&t.users_list(), "bob");
}

#[test]
fn test_users_add_does_not_touch_vault() {
    let t = Test::init("demo");
    let before = t.secrets_file();
    let (_, bob) = t.teammate("bob");

    assert_success(&t.users_add("bob", &bob));
    assert_eq!(t.secrets_file(), before);
}

#[test]
fn test_users_add_rejects_invalid() {
    let t = Test::init("demo");
    let (_, bob) = t.teammate("bob");
    let before = t.manifest_file();

    assert_failure(&t.users_add("bob", INVALID_PUBLIC_KEY));
    assert_failure(&t.users_add("bad name", &bob));
    assert_failure(&t.users_add("b", &bob));
    assert_eq!(t.manifest_file(), before);
}

#[test]
fn test_users_add_duplicate_key() {
    let t = Test::init("demo");
    let (_, bob) = t.teammate("bob");

    assert_success(&t.users_add("bob", &bob));
    let output = t.users_add("robert", &bob);
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
}

#[test]
fn test_users_remove_by_name_and_key() {
    let t = Test::init("demo");
    let (_, bob) = t.teammate("bob");
    let (_, carol) = t.teammate("carol");
    assert_success(&t.users_add("bob", &bob));
    assert_success(&t.users_add("carol", &carol));

    let output = t.users_remove("bob");
    assert_success(&output);
    assert_stderr_contains(&output, "rekey --rotate");
    assert_success(&t.users_remove(&carol));

    let list = t.users_list();
    assert_stdout_excludes(&list, "bob");
    assert_stdout_excludes(&list, &carol);
}

#[test]
fn test_users_remove_unknown() {
    let t = Test::init("demo");
    let output = t.users_remove("ghost");
    assert_failure(&output);
    assert_stderr_contains(&output, "user not found");
}
