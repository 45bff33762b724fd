// Exercises the ',' instruction in both input modes.
use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.env("BF_CONFIG", "/nonexistent/bf.toml")
        .env_remove("BF_CELL_LIMIT")
        .env_remove("BF_LOG");
    cmd
}

#[test]
fn reads_from_stdin_and_echoes_byte() {
    cargo_bin()
        .args(["run", ",."])
        .write_stdin("Z")
        .assert()
        .success()
        .stdout("Z\n");
}

#[test]
fn exhausted_stdin_is_an_input_error() {
    cargo_bin()
        .args(["run", ",.,."])
        .write_stdin("Z")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("Z"))
        .stderr(predicate::str::contains("Input error: no input available")
            .and(predicate::str::contains("at instruction 2")));
}

#[test]
fn line_input_prompts_and_takes_first_character() {
    cargo_bin()
        .args(["run", "--line-input", ",.,."])
        .write_stdin("hello\nworld\n")
        .assert()
        .success()
        .stdout("\n> h\n> w\n");
}

#[test]
fn line_input_rejects_empty_line() {
    cargo_bin()
        .args(["run", "--line-input", ",."])
        .write_stdin("\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input error"));
}
