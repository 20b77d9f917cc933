use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

// Minimal valid config for the simulated backend; zero step delays keep runs fast.
fn write_config(dir: &Path, api_key: &str) -> PathBuf {
    let toml = format!(
        r#"
[observation]
api_key = "{api_key}"

[setting]
file = "{setting}"

[motor]
normal_delay_ms = 0.0
slow_delay_ms = 0.0

[log]
dir = "{log_dir}"

[runner]
idle_ms = 1
pending_poll_ms = 1
backoff_s = 1
"#,
        setting = dir.join("setting.txt").display(),
        log_dir = dir.display(),
    );
    let path = dir.join("weather_dial.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn dial(cfg: &Path) -> Command {
    let mut cmd = Command::cargo_bin("weather_dial").unwrap();
    cmd.arg("--config").arg(cfg).env_remove("DIAL_SIM_BUTTONS").env_remove("DIAL_SIM_PAYLOAD");
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["self-check"], 0, "relative_humidity = 63", "stdout")]
#[case(&["jog", "--steps", "-3"], 0, "jogged -3 steps", "stdout")]
#[case(&["jog"], 2, "--steps", "stderr")]
#[case(&["run", "--max-ticks", "2"], 0, "parked after 2 ticks", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "testkey");

    let assert = dial(&cfg).args(args).assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
#[case::missing_key("")]
#[case::blank_key("   ")]
fn missing_api_key_is_a_config_error(#[case] key: &str) {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), key);
    dial(&cfg)
        .arg("self-check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("api_key"));
}

#[test]
fn missing_config_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    dial(&dir.path().join("nope.toml"))
        .arg("self-check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration is invalid"));
}

#[test]
fn service_error_payload_fails_self_check() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "testkey");
    dial(&cfg)
        .env(
            "DIAL_SIM_PAYLOAD",
            r#"{"response":{"error":{"type":"keynotfound","description":"this key does not exist"}}}"#,
        )
        .arg("self-check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("this key does not exist"));
}

#[test]
fn run_journals_banner_and_observation() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "testkey");
    let out = dial(&cfg)
        .args(["--json", "run", "--max-ticks", "3"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["ticks"], 3);
    assert_eq!(summary["failures"], 0);
    assert_eq!(summary["parked_steps"], -242);

    let journal = fs::read_to_string(dir.path().join("weather_clock.log")).unwrap();
    let lines: Vec<&str> = journal.lines().collect();
    assert_eq!(lines.first(), Some(&"weather dial log started"));
    assert!(lines.contains(&"63%"));
    assert_eq!(lines.last(), Some(&"parked"));
}

#[test]
fn scripted_jog_then_interrupt_parks_without_moving() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "testkey");
    dial(&cfg)
        .env("DIAL_SIM_BUTTONS", "L*5")
        .args(["--json", "run", "--max-ticks", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""parked_steps":0"#));
}

#[test]
fn metric_setting_file_selects_metric() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "testkey");
    fs::write(dir.path().join("setting.txt"), "dewpoint_f\n").unwrap();
    // 58 on the dewpoint scale parks 223 steps forward.
    dial(&cfg)
        .args(["--json", "run", "--max-ticks", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""parked_steps":-223"#));
}

#[test]
fn bad_button_script_is_reported() {
    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "testkey");
    dial(&cfg)
        .env("DIAL_SIM_BUTTONS", "Q")
        .args(["run", "--max-ticks", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("simulated button script"));
}

#[cfg(unix)]
#[test]
fn sigterm_parks_and_exits_cleanly() {
    use std::time::{Duration, Instant};

    let dir = tempdir().unwrap();
    let cfg = write_config(dir.path(), "testkey");
    let journal = dir.path().join("weather_clock.log");
    let mut child = dial(&cfg)
        .arg("run")
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap();

    // The first observation lands in the journal after the signal handler is installed.
    let deadline = Instant::now() + Duration::from_secs(20);
    while !fs::read_to_string(&journal).is_ok_and(|j| j.lines().any(|l| l == "63%")) {
        assert!(Instant::now() < deadline, "dial never indicated");
        std::thread::sleep(Duration::from_millis(20));
    }

    let status = Command::new("kill")
        .arg("-TERM")
        .arg(child.id().to_string())
        .status()
        .unwrap();
    assert!(status.success());

    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("-242 steps to zero"));
    let journal = fs::read_to_string(&journal).unwrap();
    assert_eq!(journal.lines().last(), Some("parked"));
}
