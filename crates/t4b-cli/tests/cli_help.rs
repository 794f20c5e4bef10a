use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("t4b")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("bikes"))
        .stdout(predicate::str::contains("maintenances"))
        .stdout(predicate::str::contains("cep"))
        .stdout(predicate::str::contains("weather"));
}

#[test]
fn test_bikes_help_shows_subcommands() {
    cargo_bin_cmd!("t4b")
        .args(["bikes", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("new"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn test_maintenances_list_help_shows_filters() {
    cargo_bin_cmd!("t4b")
        .args(["maintenances", "list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bike"))
        .stdout(predicate::str::contains("--type"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("t4b")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
