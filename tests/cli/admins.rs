//! Tests for admin management and listing.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_list_admins() {
    crate::skip_without_git!();
    let t = Test::repo();

    let output = t.list_admins();
    assert_success(&output);
    assert_eq!(
        stdout(&output),
        format!("{}\n{}\n", t.alice.recipient(), t.bob.recipient())
    );
}

#[test]
fn test_list_admins_json() {
    crate::skip_without_git!();
    let t = Test::repo();

    let output = t.cmd().args(["list-admins", "--json"]).output().unwrap();
    assert_success(&output);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["count"], 2);
    assert_eq!(json["admins"][0], t.alice.recipient());
}

#[test]
fn test_list_files() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.enroll("b.txt", "b");
    t.enroll("a.txt", "a");

    let output = t.list_files();
    assert_success(&output);
    assert_eq!(stdout(&output), "a.txt\nb.txt\n");

    let output = t.cmd().args(["list-files", "--json"]).output().unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["files"], serde_json::json!(["a.txt", "b.txt"]));
}

#[test]
fn test_add_admin_commits() {
    crate::skip_without_git!();
    let t = Test::repo();
    let carol = t.carol.recipient();

    let output = t.add_admin(&carol);
    assert_success(&output);
    assert_stderr_contains(&output, "reencrypt-all");

    let (subject, files) = t.last_commit();
    assert_eq!(subject, format!("NEW ADMIN: {}", carol));
    assert_eq!(files, vec!["keyrings/live/blackbox-admins.txt"]);
    assert!(t.read("keyrings/live/blackbox-admins.txt").ends_with(&format!("{}\n", carol)));
}

#[test]
fn test_add_existing_admin_is_noop() {
    crate::skip_without_git!();
    let t = Test::repo();
    let before = t.commit_count();

    t.cmd()
        .arg("add-admin")
        .arg(t.alice.recipient())
        .assert()
        .success()
        .stdout(predicate::str::contains("already an admin"));
    assert_eq!(t.commit_count(), before);
}

#[test]
fn test_add_invalid_admin_fails() {
    crate::skip_without_git!();
    let t = Test::repo();

    t.cmd()
        .args(["add-admin", "not-a-key"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not-a-key"));
    assert!(!t.read("keyrings/live/blackbox-admins.txt").contains("not-a-key"));
}

#[test]
fn test_remove_admin_commits() {
    crate::skip_without_git!();
    let t = Test::repo();
    let bob = t.bob.recipient();

    let output = t.remove_admin(&bob);
    assert_success(&output);
    assert_stderr_contains(&output, "reencrypt-all");

    let (subject, _) = t.last_commit();
    assert_eq!(subject, format!("REMOVED ADMIN: {}", bob));
    assert_eq!(
        t.read("keyrings/live/blackbox-admins.txt"),
        format!("{}\n", t.alice.recipient())
    );
}

#[test]
fn test_remove_unknown_admin_fails() {
    crate::skip_without_git!();
    let t = Test::repo();

    t.cmd()
        .arg("remove-admin")
        .arg(t.carol.recipient())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not listed"))
        .stdout(predicate::str::is_empty());
}
