//! End-to-end contract tests for the `fx` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn fx(temp: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fx").unwrap();
    // Keep config and function storage away from the host account.
    cmd.env("XDG_CONFIG_HOME", temp.path().join("config"));
    cmd.env("XDG_DATA_HOME", temp.path().join("data"));
    cmd.env("HOME", temp.path());
    cmd
}

#[test]
fn evaluates_a_closed_expression() {
    let temp = tempfile::tempdir().unwrap();
    fx(&temp)
        .arg("4*4")
        .assert()
        .success()
        .stdout(predicate::str::contains("4*4 = 16"));
}

#[test]
fn precedence_pins() {
    let temp = tempfile::tempdir().unwrap();
    fx(&temp)
        .arg("1+2*3")
        .assert()
        .success()
        .stdout(predicate::str::contains("1+2*3 = 7"));

    fx(&temp)
        .arg("1+2^2")
        .assert()
        .success()
        .stdout(predicate::str::contains("1+2^2 = 5"));
}

#[test]
fn mode_flag_reaches_trig_evaluation() {
    let temp = tempfile::tempdir().unwrap();
    fx(&temp)
        .args(["--mode", "rad", "sin(90)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sin(90) = 1"));
}

#[test]
fn prompts_for_unbound_variables() {
    let temp = tempfile::tempdir().unwrap();
    fx(&temp)
        .arg("x+1")
        .write_stdin("5\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("input x>")
                .and(predicate::str::contains("x = 5"))
                .and(predicate::str::contains(" = 6")),
        );
}

#[test]
fn constants_need_no_prompt() {
    let temp = tempfile::tempdir().unwrap();
    fx(&temp)
        .arg("pi*0")
        .assert()
        .success()
        .stdout(predicate::str::contains("pi*0 = 0"));
}

#[test]
fn parse_errors_fail_the_run() {
    let temp = tempfile::tempdir().unwrap();
    fx(&temp).arg("1+*2").assert().failure();
}
