//! Tests for `envseal rekey` and `envseal rekey --rotate`.

use crate::support::*;

#[test]
fn test_rekey_grants_access() {
    let t = Test::with_secrets("demo", &[("TOKEN", "abc")]);
    let (bob_key, bob) = t.teammate("bob");

    assert_failure(&t.get_as(&bob_key, "TOKEN"));

    assert_success(&t.users_add("bob", &bob));
    assert_failure(&t.get_as(&bob_key, "TOKEN"));

    let output = t.rekey();
    assert_success(&output);
    assert_stderr_contains(&output, "1 added");

    let output = t.get_as(&bob_key, "TOKEN");
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "abc");
}

#[test]
fn test_rekey_keeps_sealed_values() {
    let t = Test::with_secrets("demo", &[("TOKEN", "abc")]);
    let (_, bob) = t.teammate("bob");
    let sealed = |contents: &str| {
        contents
            .lines()
            .find(|l| l.starts_with("TOKEN"))
            .unwrap()
            .to_string()
    };
    let before = sealed(&t.secrets_file());

    assert_success(&t.users_add("bob", &bob));
    assert_success(&t.rekey());

    assert_eq!(sealed(&t.secrets_file()), before);
}

#[test]
fn test_rekey_after_remove_warns() {
    let t = Test::with_secrets("demo", &[("TOKEN", "abc")]);
    let (bob_key, bob) = t.teammate("bob");
    assert_success(&t.users_add("bob", &bob));
    assert_success(&t.rekey());

    assert_success(&t.users_remove("bob"));
    let output = t.rekey();
    assert_success(&output);
    assert_stderr_contains(&output, "may still hold the old data key");

    assert_failure(&t.get_as(&bob_key, "TOKEN"));
}

#[test]
fn test_rotate_changes_every_sealed_value() {
    let t = Test::with_secrets("demo", STANDARD_SECRETS);
    let before = t.secrets_file();

    let output = t.rotate();
    assert_success(&output);
    assert_stderr_contains(&output, "rotated");

    let after = t.secrets_file();
    for line in before.lines().filter(|l| l.contains("ENC[")) {
        assert!(!after.contains(line), "unchanged after rotate: {}", line);
    }
    for (k, v) in STANDARD_SECRETS {
        assert_eq!(stdout(&t.get(k)).trim(), *v);
    }
}

#[test]
fn test_rotate_locks_out_removed_user() {
    let t = Test::with_secrets("demo", &[("TOKEN", "abc")]);
    let (bob_key, bob) = t.teammate("bob");
    assert_success(&t.users_add("bob", &bob));
    assert_success(&t.rekey());
    assert_success(&t.get_as(&bob_key, "TOKEN"));

    assert_success(&t.users_remove("bob"));
    assert_success(&t.rotate());

    assert_denied(&t.get_as(&bob_key, "TOKEN"));
    assert_roundtrip(&t, "TOKEN", "still-mine");
}

#[test]
fn test_rekey_with_empty_roster_fails() {
    let t = Test::init("demo");
    let key = stdout(&t.whoami());
    assert_success(&t.users_remove(key.trim()));
    let before = t.secrets_file();

    let output = t.rekey();
    assert_failure(&output);
    assert_stderr_contains(&output, "recipients list cannot be empty");
    assert_eq!(t.secrets_file(), before);
}
