use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BUILTIN_TABLE: &str = include_str!("../data/dictionary.json");

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

fn pascheck() -> Command {
    let mut cmd = Command::cargo_bin("pascheck").expect("binary is built");
    cmd.env_remove("PASCHECK_LOG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn clean_program_succeeds() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "ok.pas", "program\nvar int x ;\nbegin\n  x := 5 ;\nend\n");

    pascheck()
        .arg("check")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Success run"));
}

#[test]
fn diagnostic_is_printed_with_position() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "bad.pas", "program\nvar foo x ;\nbegin end\n");

    pascheck()
        .args(["check", "--no-color"])
        .arg(&input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Error: Unknown data type, At: (row:2, col:4)"))
        .stdout(predicate::str::contains("While reading \"foo\" of type <wtf>"))
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn missing_file_is_an_infrastructure_error() {
    let dir = TempDir::new().unwrap();

    pascheck()
        .arg("check")
        .arg(dir.path().join("nope.pas"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn custom_dictionary_changes_type_names() {
    let dir = TempDir::new().unwrap();
    let table = BUILTIN_TABLE.replace(r#""data types": ["int", "float", "bool"]"#, r#""data types": ["integer"]"#);
    let dictionary = write_file(&dir, "dict.json", &table);
    let input = write_file(&dir, "prog.pas", "program var integer x ; begin x := 1 end");

    pascheck()
        .arg("check")
        .arg(&input)
        .arg("--dictionary")
        .arg(&dictionary)
        .assert()
        .success();

    pascheck()
        .arg("check")
        .arg(&input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Unknown data type"));
}

#[test]
fn malformed_dictionary_is_rejected() {
    let dir = TempDir::new().unwrap();
    let dictionary = write_file(&dir, "dict.json", r#"{ "program": ["program"] }"#);
    let input = write_file(&dir, "prog.pas", "program begin end");

    pascheck()
        .arg("check")
        .arg(&input)
        .arg("--dictionary")
        .arg(&dictionary)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("category \"var\" is missing"));
}

#[test]
fn tokens_lists_positions_and_categories() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "prog.pas", "program\nx:=5;");

    pascheck()
        .arg("tokens")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("program"))
        .stdout(predicate::str::contains("appropriation"))
        .stdout(predicate::str::contains("2:1"));
}

#[test]
fn categories_lists_builtin_table() {
    pascheck()
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("conditional cycle"))
        .stdout(predicate::str::contains("while"));
}
