// Drives the compiled binary in its non-interactive modes.

use assert_cmd::Command;
use tempfile::tempdir;

fn feierabend(config: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("feierabend").unwrap();
    cmd.arg("--config").arg(config);
    // keep the log file out of the real home directory
    if let Some(home) = config.parent() {
        cmd.env("HOME", home);
    }
    cmd
}

#[test]
fn shift_prints_end_time() {
    let dir = tempdir().unwrap();
    feierabend(&dir.path().join("config.json"))
        .args(["--shift", "09:00"])
        .assert()
        .success()
        .stdout("17:42\n");
}

#[test]
fn shift_past_midnight_wraps() {
    let dir = tempdir().unwrap();
    feierabend(&dir.path().join("config.json"))
        .args(["-s", "23:30"])
        .assert()
        .success()
        .stdout("08:12 (next day)\n");
}

#[test]
fn invalid_shift_start_fails() {
    let dir = tempdir().unwrap();
    for start in ["25:00", "9:5"] {
        let output = feierabend(&dir.path().join("config.json"))
            .args(["-s", start])
            .output()
            .unwrap();
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("invalid format"), "stderr: {stderr}");
    }
}

#[test]
fn shift_length_comes_from_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "shift_hours": 4, "shift_minutes": 0 }"#).unwrap();

    feierabend(&path)
        .args(["-s", "9:00"])
        .assert()
        .success()
        .stdout("13:00\n");
}

#[test]
fn write_config_persists_overrides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    feierabend(&path)
        .args(["--write-config", "-m", "25"])
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(written["timer_minutes"], 25);
    assert_eq!(written["shift_hours"], 8);
    assert_eq!(written["shift_minutes"], 42);
}

#[test]
fn interactive_mode_requires_tty() {
    let dir = tempdir().unwrap();
    let output = feierabend(&dir.path().join("config.json"))
        .write_stdin("")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("tty"));
}
