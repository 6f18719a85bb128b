use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn logconf() -> Command {
    let mut cmd = Command::cargo_bin("logconf").unwrap();
    cmd.env_remove("LOGGER_RESOURCE")
        .env_remove("LOGGER_FILE")
        .env_remove("LOGGER_URL")
        .env_remove("APPLICATION_HOME");
    cmd
}

#[test]
fn test_resolve_falls_back_to_mode_default() {
    let dir = tempfile::tempdir().unwrap();

    logconf()
        .args(["resolve", "--mode", "dev", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("resource:logging-dev.yml"))
        .stdout(predicate::str::contains("application.home"));
}

#[test]
fn test_resolve_prefers_documented_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("conf")).unwrap();
    fs::write(dir.path().join("conf/logging.yml"), "root: { level: info }\n").unwrap();

    logconf()
        .args(["resolve", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("conf/logging.yml"));
}

#[test]
fn test_resolve_rejects_malformed_url_override() {
    let dir = tempfile::tempdir().unwrap();

    logconf()
        .env("LOGGER_URL", "not a url")
        .args(["resolve", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed logger URL"));
}

#[test]
fn test_check_reports_document_errors() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("conf")).unwrap();
    fs::write(
        dir.path().join("conf/logging.yml"),
        "root:\n  level: info\n  appenders: [ghost]\n",
    )
    .unwrap();

    logconf()
        .args(["check", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Could not find an appender named [ghost]"));
}

#[test]
fn test_check_accepts_bundled_default() {
    let dir = tempfile::tempdir().unwrap();

    logconf()
        .args(["check", "--mode", "test", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration is valid"));
}

#[test]
fn test_emit_writes_through_every_api() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("emit.log");
    fs::create_dir(dir.path().join("conf")).unwrap();
    fs::write(
        dir.path().join("conf/logging.yml"),
        "appenders:\n  file:\n    kind: file\n    path: ${OUT}\n    target: true\nroot:\n  level: info\n  appenders: [file]\n",
    )
    .unwrap();

    logconf()
        .args(["emit", "--root"])
        .arg(dir.path())
        .arg("-D")
        .arg(format!("OUT={}", log_file.display()))
        .assert()
        .success();

    let written = fs::read_to_string(&log_file).unwrap();
    assert!(written.contains("sample event through tracing"));
    assert!(written.contains("sample record through the log facade"));
    assert!(written.contains("sample record through the logconf facade"));
    assert!(written.contains("sample failure: simulated disk failure"));
    assert!(!written.contains("caused by"));
    assert!(!written.contains("verbose event"));
}
