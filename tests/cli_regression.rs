// Regression tests for the testique binary running the bundled demo suite.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn testique() -> Command {
    let mut cmd = Command::cargo_bin("testique").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn full_demo_run_fails_and_lists_errors() {
    testique()
        .arg("--no-color")
        .assert()
        .failure()
        .stdout(
            contains("SETUP-ERROR")
                .and(contains("TEST-TEARDOWN-ERROR"))
                .and(contains("Error in test 'bar': Setup bar exception."))
                .and(contains("NameError in test 'foobarfoo': FooBarFoo weird name.")),
        );
}

#[test]
fn selected_passing_tests_exit_successfully() {
    testique()
        .args(["--no-color", "-k", "not_exist"])
        .assert()
        .success()
        .stdout(contains("matched by pattern 'not_exist', 2 ran").and(contains("\x1b[").not()));
}

#[test]
fn list_prints_registered_names_only() {
    testique()
        .arg("--list")
        .assert()
        .success()
        .stdout(contains("foobarfoo\n").and(contains("read_file\n").not()));
}

#[test]
fn json_format_from_config_file() {
    let path = std::env::temp_dir().join(format!("testique-cli-{}.yaml", std::process::id()));
    fs::write(&path, "format: json\nuse_colors: false\n").unwrap();

    testique()
        .arg("--config")
        .arg(&path)
        .args(["-k", "foo"])
        .assert()
        .failure()
        .stdout(contains("\"pattern\": \"foo\"").and(contains("\"test-teardown-error\": 1")));

    let _ = fs::remove_file(path);
}

#[test]
fn broken_config_is_reported_as_diagnostic() {
    testique()
        .args(["--config", "/definitely/not/here.yaml"])
        .assert()
        .failure()
        .stderr(contains("testique::config::io").or(contains("failed to read config file")));
}

#[test]
fn configured_select_flag_replaces_k() {
    let path = std::env::temp_dir().join(format!("testique-flag-{}.yaml", std::process::id()));
    fs::write(&path, "select_flag: \"--only\"\nuse_colors: false\n").unwrap();

    testique()
        .arg("--config")
        .arg(&path)
        .args(["--only", "not_exist"])
        .assert()
        .success()
        .stdout(contains("matched by pattern 'not_exist', 2 ran"));

    let _ = fs::remove_file(path);
}

#[test]
fn panicking_test_is_reported_without_default_hook_output() {
    testique()
        .args(["--no-color", "-k", "barfoo"])
        .assert()
        .failure()
        .stdout(contains("panic in test 'barfoo': index out of bounds"))
        .stderr(contains("panicked at").not());
}
