//! Tests for `envseal set/get/unset/print`.

use envseal::core::seal;

use crate::support::*;

#[test]
fn test_set_get_roundtrip() {
    let t = Test::init("demo");
    for (k, v) in STANDARD_SECRETS {
        assert_roundtrip(&t, k, v);
    }
}

#[test]
fn test_set_multiple_pairs() {
    let t = Test::init("demo");

    let output = t
        .cmd()
        .args(["set", "A=1", "B=two=2", "EMPTY="])
        .output()
        .unwrap();
    assert_success(&output);

    assert_eq!(stdout(&t.get("A")).trim(), "1");
    assert_eq!(stdout(&t.get("B")).trim(), "two=2");
    assert_eq!(stdout(&t.get("EMPTY")).trim(), "");
}

#[test]
fn test_set_rejects_bad_input_without_writing() {
    let t = Test::init("demo");
    let before = t.secrets_file();

    for pair in ["NOEQUALS", "1ABC=x", "BAD-NAME=x", "secrets=x", "_envseal=x"] {
        let output = t.cmd().args(["set", "GOOD=1", pair]).output().unwrap();
        assert_failure(&output);
    }
    assert_eq!(t.secrets_file(), before);
}

#[test]
fn test_values_are_sealed_on_disk() {
    let t = Test::with_secrets("demo", STANDARD_SECRETS);
    assert_sealed_at_rest(&t, STANDARD_SECRETS);
}

#[test]
fn test_get_missing_key() {
    let t = Test::init("demo");
    let output = t.get("NOPE");
    assert_failure(&output);
    assert_stderr_contains(&output, "key not found");
}

#[test]
fn test_unset_removes_and_warns_on_missing() {
    let t = Test::with_secrets("demo", &[("A", "1"), ("B", "2")]);

    let output = t.unset(&["A", "MISSING"]);
    assert_success(&output);
    assert_stderr_contains(&output, "MISSING not found");

    assert_failure(&t.get("A"));
    assert_success(&t.get("B"));
}

#[test]
fn test_unset_nothing_found_leaves_file() {
    let t = Test::init("demo");
    let before = t.secrets_file();

    assert_success(&t.unset(&["MISSING"]));
    assert_eq!(t.secrets_file(), before);
}

#[test]
fn test_print_lists_all() {
    let t = Test::with_secrets("demo", STANDARD_SECRETS);

    let output = t.print();
    assert_success(&output);
    for (k, v) in STANDARD_SECRETS {
        assert_stdout_contains(&output, &format!("{}={}", k, v));
    }
    assert_stdout_contains(&output, "HELLO=world");
}

#[test]
fn test_print_json() {
    let t = Test::with_secrets("demo", &[("TOKEN", "abc")]);

    let output = t.print_json();
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    assert_eq!(parsed["secrets"]["TOKEN"], "abc");
    assert_eq!(parsed["secrets"]["HELLO"], "world");
    assert!(parsed["unsealable"].as_object().unwrap().is_empty());
}

#[test]
fn test_print_flags_legacy_plaintext_as_readable() {
    let t = Test::init("demo");
    let contents = format!("LEGACY = \"old\"\n{}", t.secrets_file());
    std::fs::write(t.secrets_path(), contents).unwrap();

    let output = t.print();
    assert_success(&output);
    assert_stdout_contains(&output, "LEGACY=old");
}

#[test]
fn test_print_strict_fails_on_unsealable_value() {
    let t = Test::init("demo");
    let foreign = seal::seal_str("from another vault", &seal::Dek::generate()).unwrap();
    let contents = format!("BROKEN = \"{}\"\n{}", foreign, t.secrets_file());
    std::fs::write(t.secrets_path(), contents).unwrap();

    let output = t.print();
    assert_success(&output);
    assert_stdout_contains(&output, "HELLO=world");
    assert_stdout_excludes(&output, "BROKEN");
    assert_stderr_contains(&output, "BROKEN could not be unsealed");

    let output = t.cmd().args(["print", "--strict"]).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to decrypt value");
    assert_stdout_excludes(&output, "HELLO=world");
}

#[test]
fn test_file_flag_selects_secrets_file() {
    let t = Test::init("demo");
    std::fs::copy(t.secrets_path(), t.dir.path().join("prod.enc.toml")).unwrap();

    let output = t
        .cmd()
        .args(["-f", "prod.enc.toml", "set", "ONLY_PROD=1"])
        .output()
        .unwrap();
    assert_success(&output);

    assert_failure(&t.get("ONLY_PROD"));
    let output = t
        .cmd()
        .args(["--file", "prod.enc.toml", "get", "ONLY_PROD"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "1");
}
