use assert_cmd::Command;

fn wsecho() -> Command {
    Command::cargo_bin("wsecho").unwrap()
}

#[test]
fn help_lists_options() {
    let output = wsecho().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--endpoint"));
    assert!(stdout.contains("--connect"));
}

#[test]
fn rejects_non_websocket_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let output = wsecho()
        .args(["--endpoint", "http://127.0.0.1:8008"])
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid endpoint"), "stderr: {stderr}");
}

#[test]
fn rejects_bad_endpoint_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[connection]\nendpoint = \"tcp://nowhere\"\n").unwrap();
    let output = wsecho().arg("--config").arg(&config).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported URL scheme"));
}

#[test]
fn malformed_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[connection\n").unwrap();
    let output = wsecho().arg("--config").arg(&config).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse config"));
}

#[test]
fn startup_errors_go_to_stderr_before_logging_starts() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("logs").join("wsecho.log");
    let output = wsecho()
        .args(["--endpoint", "udp://127.0.0.1:8008"])
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .arg("--log-file")
        .arg(&log)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.starts_with("wsecho: invalid endpoint"),
        "stderr: {stderr}"
    );
    assert!(!log.exists());
}
