use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("whoami-check").unwrap();
    cmd.env_remove("AWS_PROFILE").env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_flags() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--profile"))
        .stdout(predicate::str::contains("--trusted-account"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn version_prints_name() {
    bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("whoami-check"));
}

#[test]
fn invalid_trusted_account_fails_before_aws() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "").unwrap();

    bin()
        .args(["--config"])
        .arg(&config)
        .args(["--trusted-account", "not-an-account"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("12-digit"));
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    bin()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading config"));
}
