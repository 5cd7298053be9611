//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn pgdeck(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pgdeck").unwrap();
    // Keep developer .env files out of the picture
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    pgdeck(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("--env-file"));
}

#[test]
fn test_serve_help() {
    let home = tempfile::tempdir().unwrap();
    pgdeck(&home)
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Browser origin allowed by CORS"))
        .stdout(predicate::str::contains("--acquire-timeout"))
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_inspect_help() {
    let home = tempfile::tempdir().unwrap();
    pgdeck(&home)
        .arg("inspect")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Only report the schema of this table"));
}

#[test]
fn test_serve_without_database_url_fails() {
    let home = tempfile::tempdir().unwrap();
    pgdeck(&home)
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

#[test]
fn test_dotenv_feeds_database_url() {
    let home = tempfile::tempdir().unwrap();
    std::fs::write(
        home.path().join(".env"),
        "DATABASE_URL=postgres://pgdeck@127.0.0.1:1/pgdeck\n",
    )
    .unwrap();

    // URL is picked up from ./.env, so the failure is the connection,
    // not missing configuration
    pgdeck(&home)
        .arg("inspect")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set").not())
        .stderr(predicate::str::contains("Failed to create database pool"));
}

#[test]
fn test_env_file_flag_feeds_database_url() {
    let home = tempfile::tempdir().unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    let env_file = elsewhere.path().join("deck.env");
    std::fs::write(&env_file, "DATABASE_URL=postgres://pgdeck@127.0.0.1:1/pgdeck\n").unwrap();

    pgdeck(&home)
        .arg("--env-file")
        .arg(&env_file)
        .arg("inspect")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set").not())
        .stderr(predicate::str::contains("Failed to create database pool"));
}

#[test]
fn test_env_file_after_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let env_file = home.path().join("custom.env");
    std::fs::write(&env_file, "DATABASE_URL=postgres://pgdeck@127.0.0.1:1/pgdeck\n").unwrap();

    pgdeck(&home)
        .arg("serve")
        .arg("--env-file")
        .arg(&env_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create database pool"));
}

#[test]
fn test_missing_env_file_fails() {
    let home = tempfile::tempdir().unwrap();
    pgdeck(&home)
        .args(["--env-file", "does-not-exist.env", "inspect"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load env file"));
}
