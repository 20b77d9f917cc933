use dial_config::{load_file, load_toml};
use rstest::rstest;
use std::fs;
use tempfile::tempdir;

const MINIMAL: &str = r#"
[observation]
api_key = "abc123"
"#;

#[test]
fn minimal_config_takes_documented_defaults() {
    let cfg = load_toml(MINIMAL).expect("parse TOML");
    cfg.validate().expect("valid");

    assert_eq!(cfg.observation.location, "IL/O'Fallon.json");
    assert_eq!(cfg.observation.default_metric, "relative_humidity");
    assert_eq!(cfg.motor.steps, 512);
    assert!((cfg.motor.scale - 133.3333).abs() < 1e-9);
    assert!((cfg.motor.normal_delay_ms - 7.0).abs() < f64::EPSILON);
    assert!((cfg.motor.slow_delay_ms - 45.0).abs() < f64::EPSILON);
    assert!((cfg.wait.indicator_mode_s - 4.0).abs() < f64::EPSILON);
    assert!((cfg.wait.slow_mode_s - 1.0).abs() < f64::EPSILON);
    assert_eq!(cfg.wait.observation_s, 240);
    assert_eq!(cfg.pins.left, 24);
    assert_eq!(cfg.pins.right, 25);
    assert_eq!(cfg.pins.coil_a1, 15);
    assert_eq!(cfg.pins.coil_a2, 23);
    assert_eq!(cfg.pins.coil_b1, 14);
    assert_eq!(cfg.pins.coil_b2, 18);
    assert_eq!(cfg.log.rotate_wait_s, 10_800);
    assert_eq!(cfg.log.path(), std::path::Path::new("./weather_clock.log"));
    assert_eq!(cfg.runner.backoff_s, 30);
    assert_eq!(cfg.setting.poll_s, 8);
}

#[test]
fn api_key_is_mandatory() {
    let err = load_toml("[motor]\nsteps = 512\n").expect_err("missing [observation]");
    assert!(err.to_string().contains("observation"));

    let cfg = load_toml("[observation]\napi_key = \"  \"\n").expect("parse TOML");
    let err = cfg.validate().expect_err("blank key");
    assert!(format!("{err}").contains("api_key"));
}

#[rstest]
#[case("[motor]\nsteps = 1", "motor.steps")]
#[case("[motor]\nscale = 0.0", "motor.scale")]
#[case("[motor]\nnormal_delay_ms = -1.0", "motor.normal_delay_ms")]
#[case("[motor]\nslow_delay_ms = nan", "motor.slow_delay_ms")]
#[case("[wait]\nobservation_s = 0", "wait.observation_s")]
#[case("[wait]\nindicator_mode_s = -4.0", "wait.indicator_mode_s")]
#[case("[pins]\nleft = 15", "both use GPIO 15")]
#[case("[log]\nrotate_wait_s = 0", "log.rotate_wait_s")]
#[case("[runner]\nbackoff_s = 0", "runner.backoff_s")]
fn rejects_out_of_range_values(#[case] section: &str, #[case] needle: &str) {
    let toml = format!("{MINIMAL}\n{section}\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "expected {needle:?} in {err}"
    );
}

#[test]
fn load_file_reports_path_and_validation() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let err = load_file(&missing).expect_err("missing file");
    assert!(format!("{err}").contains("absent.toml"));

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, format!("{MINIMAL}\n[motor]\nsteps = 0\n")).unwrap();
    let err = load_file(&bad).expect_err("invalid steps");
    assert!(format!("{err}").contains("motor.steps"));

    let good = dir.path().join("good.toml");
    fs::write(&good, MINIMAL).unwrap();
    assert!(load_file(&good).is_ok());
}

#[test]
fn shipped_sample_config_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../etc/weather_dial.toml");
    let cfg = dial_config::load_file(&path).unwrap();
    assert_eq!(cfg.pins.coil_b2, 18);
    assert_eq!(cfg.log.path(), std::path::Path::new("./weather_clock.log"));
}
