//! Assertions over envseal invocations and the files they leave behind.

use std::process::Output;

/// Captured stdout, lossily decoded.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Captured stderr, lossily decoded.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "envseal exited with {}:\n{}",
        output.status,
        stderr(output)
    );
}

pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "envseal should have failed, stdout:\n{}",
        stdout(output)
    );
}

pub fn assert_stdout_contains(output: &Output, expected: &str) {
    let out = stdout(output);
    assert!(out.contains(expected), "stdout lacks {:?}:\n{}", expected, out);
}

pub fn assert_stdout_excludes(output: &Output, excluded: &str) {
    let out = stdout(output);
    assert!(!out.contains(excluded), "stdout has {:?}:\n{}", excluded, out);
}

pub fn assert_stderr_contains(output: &Output, expected: &str) {
    let err = stderr(output);
    assert!(err.contains(expected), "stderr lacks {:?}:\n{}", expected, err);
}

pub fn assert_stderr_excludes(output: &Output, excluded: &str) {
    let err = stderr(output);
    assert!(!err.contains(excluded), "stderr has {:?}:\n{}", excluded, err);
}

/// The invocation was refused because the identity holds no wrapped key.
pub fn assert_denied(output: &Output) {
    assert_failure(output);
    assert_stderr_contains(output, "access denied");
    assert!(output.stdout.is_empty(), "denied run wrote to stdout");
}

/// Every value is stored sealed and none appears in the clear.
pub fn assert_sealed_at_rest(t: &super::Test, secrets: &[(&str, &str)]) {
    let contents = t.secrets_file();
    for (key, value) in secrets {
        assert!(
            !contents.contains(value),
            "plaintext of {} found in the secrets file",
            key
        );
    }
    assert!(contents.contains("ENC[age,chacha20,"), "no sealed values:\n{}", contents);
}

/// `set` then `get` returns the value byte for byte.
pub fn assert_roundtrip(t: &super::Test, key: &str, value: &str) {
    assert_success(&t.set(key, value));

    let output = t.get(key);
    assert_success(&output);
    assert_eq!(stdout(&output).trim_end_matches('\n'), value);
}
