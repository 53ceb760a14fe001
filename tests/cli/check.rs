//! Tests for the check command.

use crate::support::*;

#[test]
fn test_check_reports_repository() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.enroll("a.txt", "alpha");

    let output = t.check();
    assert_success(&output);
    assert_stdout_contains(&output, "git");
    assert_stdout_contains(&output, "age");
    assert_stdout_contains(&output, "keyrings/live");
    assert_stdout_contains(&output, "no private keys");
}

#[test]
fn test_check_without_file_registry() {
    crate::skip_without_git!();
    let t = Test::repo();

    let output = t.check();
    assert_success(&output);
    assert_stdout_contains(&output, "missing");
}

#[test]
fn test_legacy_keyring_dir_detected() {
    crate::skip_without_git!();
    let t = Test::repo();
    std::fs::rename(t.path("keyrings/live"), t.path(".blackbox")).unwrap();

    let output = t.check();
    assert_success(&output);
    assert_stdout_contains(&output, ".blackbox");
    assert_success(&t.list_admins());
}
