// registrant-alert/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to build a command isolated from the user's config files and environment
fn isolated_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("registrant-alert").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("REGISTRANT_ALERT_API_KEY")
        .env_remove("REGISTRANT_ALERT_BASE_URL")
        .env_remove("REGISTRANT_ALERT_TIMEOUT")
        .env_remove("REGISTRANT_ALERT_PUNYCODE")
        .env_remove("REGISTRANT_ALERT_RESPONSE_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_subcommands_and_flags() {
    let mut cmd = Command::cargo_bin("registrant-alert").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("basic"))
        .stdout(predicate::str::contains("advanced"))
        .stdout(predicate::str::contains("--api-key"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_basic_help_shows_search_flags() {
    let mut cmd = Command::cargo_bin("registrant-alert").unwrap();
    cmd.args(["basic", "--help"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--include"))
        .stdout(predicate::str::contains("--since-date"))
        .stdout(predicate::str::contains("--no-punycode"))
        .stdout(predicate::str::contains("--expired-to"));
}

#[test]
fn test_missing_api_key_fails() {
    let home = TempDir::new().unwrap();
    let mut cmd = isolated_cmd(&home);
    cmd.args(["basic", "preview", "--include", "whois"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("API key is required"));
}

#[test]
fn test_too_many_excludes_fails_before_request() {
    let home = TempDir::new().unwrap();
    let mut cmd = isolated_cmd(&home);
    // Port 9 has no listener; an attempted request would fail differently.
    cmd.args([
        "--api-key",
        "at_test",
        "--base-url",
        "http://127.0.0.1:9/api/v2",
        "basic",
        "preview",
        "--include",
        "whois",
        "--exclude",
        "1,2,3,4,5",
    ]);

    cmd.assert().failure().code(1).stderr(predicate::str::contains(
        r#"invalid argument: "basicSearchTerms.exclude" must have between 0 and 4 items."#,
    ));
}

#[test]
fn test_missing_include_fails() {
    let home = TempDir::new().unwrap();
    let mut cmd = isolated_cmd(&home);
    cmd.args(["--api-key", "at_test", "basic", "purchase"]);

    cmd.assert().failure().code(1).stderr(predicate::str::contains(
        r#"invalid argument: "basicSearchTerms.include" must have between 1 and 4 items."#,
    ));
}

#[test]
fn test_advanced_empty_term_fails() {
    let home = TempDir::new().unwrap();
    let mut cmd = isolated_cmd(&home);
    cmd.args([
        "--api-key",
        "at_test",
        "advanced",
        "raw",
        "--term",
        "RegistrantContact.Name=whois",
        "--term",
        "RegistrantContact.Email=",
    ]);

    cmd.assert().failure().code(1).stderr(predicate::str::contains(
        r#"invalid argument: "advancedSearchTerms.1.Term" is required."#,
    ));
}

#[test]
fn test_malformed_term_rejected_by_parser() {
    let mut cmd = Command::cargo_bin("registrant-alert").unwrap();
    cmd.args(["advanced", "preview", "--term", "no-separator"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("expected FIELD=TERM"));
}

#[test]
fn test_invalid_date_rejected() {
    let mut cmd = Command::cargo_bin("registrant-alert").unwrap();
    cmd.args(["basic", "preview", "--include", "whois", "--since-date", "yesterday"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid date 'yesterday'"));
}

#[test]
fn test_api_key_from_local_config_file() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("registrant-alert.toml"),
        "[client]\napi_key = \"at_from_file\"\nbase_url = \"http://127.0.0.1:9/api/v2\"\n",
    )
    .unwrap();

    let mut cmd = isolated_cmd(&home);
    cmd.args(["basic", "preview"]);

    // The key is found, so the failure comes from argument validation instead.
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("API key is required").not())
        .stderr(predicate::str::contains("basicSearchTerms.include"));
}

#[test]
fn test_invalid_explicit_config_fails() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("broken.toml");
    fs::write(&config_path, "[client]\ntimeout = \"soon\"\n").unwrap();

    let mut cmd = isolated_cmd(&home);
    cmd.args(["--config", config_path.to_str().unwrap(), "basic", "preview", "--include", "whois"]);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("configuration error"));
}
