//! Tests for postdeploy, reencrypt-all and shred-all.

use crate::support::*;

#[test]
fn test_postdeploy_decrypts_everything() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.enroll("a.txt", "alpha");
    t.enroll("conf/b.txt", "beta");

    let output = t.postdeploy();
    assert_success(&output);
    assert_stdout_contains(&output, "decrypted a.txt");
    assert_stdout_contains(&output, "2 updated, 0 unchanged, 0 failed");
    assert_eq!(t.read("a.txt"), "alpha");
    assert_eq!(t.read("conf/b.txt"), "beta");

    let output = t.postdeploy();
    assert_success(&output);
    assert_stdout_contains(&output, "0 updated, 2 unchanged, 0 failed");
}

#[test]
fn test_postdeploy_as_second_admin() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.enroll("a.txt", "alpha");

    let output = t.cmd_as(&t.bob).arg("postdeploy").output().unwrap();
    assert_success(&output);
    assert_eq!(t.read("a.txt"), "alpha");
}

#[test]
fn test_postdeploy_overwrites_local_changes() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.enroll("a.txt", "alpha");
    assert_success(&t.postdeploy());
    t.write("a.txt", "tampered");

    let output = t.postdeploy();
    assert_success(&output);
    assert_stdout_contains(&output, "1 updated");
    assert_eq!(t.read("a.txt"), "alpha");
}

#[test]
fn test_postdeploy_continues_past_failures() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.enroll("a.txt", "alpha");
    t.enroll("b.txt", "beta");
    t.enroll("c.txt", "gamma");
    t.write("b.txt.age", "garbage");

    let output = t.postdeploy();
    assert_failure(&output);
    assert_stderr_contains(&output, "b.txt");
    assert_stdout_contains(&output, "2 updated, 0 unchanged, 1 failed");
    assert_eq!(t.read("a.txt"), "alpha");
    assert_eq!(t.read("c.txt"), "gamma");
    assert!(!t.exists("b.txt"));
}

#[test]
fn test_postdeploy_without_registered_files() {
    crate::skip_without_git!();
    let t = Test::repo();

    let output = t.postdeploy();
    assert_failure(&output);
    assert_stderr_contains(&output, "registry missing");
}

#[test]
fn test_reencrypt_all_admits_new_admin() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.enroll("a.txt", "alpha");

    let carol = t.carol.recipient();
    assert_success(&t.add_admin(&carol));
    assert_failure(&t.cat_as(&t.carol, "a.txt"));

    let output = t.reencrypt_all();
    assert_success(&output);
    assert_stdout_contains(&output, "re-encrypted a.txt");
    assert!(!t.exists("a.txt"));

    let (subject, files) = t.last_commit();
    assert_eq!(subject, "Re-encrypted keys");
    assert_eq!(files, vec!["a.txt.age"]);

    let output = t.cat_as(&t.carol, "a.txt");
    assert_success(&output);
    assert_eq!(stdout(&output), "alpha");
}

#[test]
fn test_reencrypt_all_locks_out_removed_admin() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.enroll("a.txt", "alpha");

    assert_success(&t.remove_admin(&t.bob.recipient()));
    assert_success(&t.cat_as(&t.bob, "a.txt"));

    assert_success(&t.reencrypt_all());
    assert_failure(&t.cat_as(&t.bob, "a.txt"));
    assert_success(&t.cat_as(&t.alice, "a.txt"));
}

#[test]
fn test_shred_all_removes_plaintexts() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.enroll("a.txt", "alpha");
    t.enroll("b.txt", "beta");
    assert_success(&t.postdeploy());

    let output = t.cmd().arg("shred-all").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "2 erased");
    assert!(!t.exists("a.txt"));
    assert!(!t.exists("b.txt"));
    assert!(t.exists("a.txt.age"));
}
