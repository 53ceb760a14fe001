//! Tests for the register command.

use crate::support::*;

#[test]
fn test_register_end_to_end() {
    crate::skip_without_git!();
    let t = Test::repo();
    let before = t.commit_count();
    t.write("secrets/api.key", "X");

    let output = t.register("secrets/api.key");
    assert_success(&output);
    assert_stdout_contains(&output, "registered secrets/api.key as secrets/api.key.age");

    assert!(!t.exists("secrets/api.key"));
    assert!(t.exists("secrets/api.key.age"));
    assert_eq!(t.read("keyrings/live/blackbox-files.txt"), "secrets/api.key\n");

    assert_eq!(t.commit_count(), before + 1);
    let (subject, mut files) = t.last_commit();
    files.sort();
    assert_eq!(subject, "registered in blackbox: secrets/api.key");
    assert_eq!(
        files,
        vec!["keyrings/live/blackbox-files.txt", "secrets/api.key.age"]
    );

    for user in [&t.alice, &t.bob] {
        let output = t.cat_as(user, "secrets/api.key");
        assert_success(&output);
        assert_eq!(stdout(&output), "X");
    }
}

#[test]
fn test_register_reports_stages() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.write("token", "t");

    let output = t.register("token");
    assert_success(&output);
    assert_stdout_contains(&output, "encrypted");
    assert_stdout_contains(&output, "list updated");
    assert_stdout_contains(&output, "plaintext purged");
}

#[test]
fn test_register_already_registered_keeps_plaintext() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.enroll("app.env", "A=1");
    t.write("app.env", "A=2");
    let before = t.commit_count();

    let output = t.register("app.env");
    assert_failure(&output);
    assert_stderr_contains(&output, "already registered");
    assert_eq!(t.read("app.env"), "A=2");
    assert_eq!(t.commit_count(), before);
}

#[test]
fn test_register_missing_file() {
    crate::skip_without_git!();
    let t = Test::repo();

    let output = t.register("nope.txt");
    assert_failure(&output);
    assert_stderr_contains(&output, "file not found: nope.txt");
    assert!(!t.exists("keyrings/live/blackbox-files.txt"));
}

#[test]
fn test_register_envelope_name_rejected() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.write("app.env.age", "sealed");

    let output = t.register("app.env.age");
    assert_failure(&output);
    assert_stderr_contains(&output, "register app.env instead");
}

#[test]
fn test_register_previously_committed_plaintext() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.write("db.conf", "password=hunter2");
    t.git(&["add", "db.conf"]);
    t.git(&["commit", "-q", "-m", "oops"]);

    let output = t.register("db.conf");
    assert_success(&output);
    assert_stderr_contains(&output, "committed in plaintext earlier");

    let tracked = t.tracked();
    assert!(!tracked.contains(&"db.conf".to_string()));
    assert!(tracked.contains(&"db.conf.age".to_string()));
    let (_, files) = t.last_commit();
    assert!(files.contains(&"db.conf".to_string()));
}

#[test]
fn test_register_from_subdirectory() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.write("config/prod/key.pem", "pem");

    let output = t
        .cmd()
        .current_dir(t.path("config/prod"))
        .args(["register", "key.pem"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(
        t.read("keyrings/live/blackbox-files.txt"),
        "config/prod/key.pem\n"
    );
}

#[test]
fn test_register_keeps_file_list_sorted() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.enroll("zeta.txt", "z");
    t.enroll("alpha.txt", "a");
    t.enroll("mid/beta.txt", "b");

    assert_eq!(
        t.read("keyrings/live/blackbox-files.txt"),
        "alpha.txt\nmid/beta.txt\nzeta.txt\n"
    );
}

#[test]
fn test_register_with_ignore_plaintext() {
    crate::skip_without_git!();
    let t = Test::repo();
    t.write(
        ".blackbox.toml",
        &format!("{}ignore_plaintext = true\n", AGE_CONFIG),
    );
    t.write("token", "t");

    assert_success(&t.register("token"));
    assert!(t.read(".gitignore").contains("/token"));
    let (_, files) = t.last_commit();
    assert!(files.contains(&".gitignore".to_string()));
}
