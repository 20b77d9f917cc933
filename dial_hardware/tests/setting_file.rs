use std::fs;

use dial_hardware::FileMetricSetting;
use dial_traits::MetricSetting;
use rstest::rstest;
use tempfile::tempdir;

#[rstest]
#[case("dewpoint_f\n", "dewpoint_f")]
#[case("wind_gust_mph\r\nignored second line\n", "wind_gust_mph")]
#[case("feelslike_f   \n", "feelslike_f")]
fn reads_first_line_trimmed(#[case] contents: &str, #[case] expected: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("setting.txt");
    fs::write(&path, contents).unwrap();

    let mut setting = FileMetricSetting::new(&path);
    assert_eq!(setting.read().unwrap(), expected);
}

#[rstest]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let mut setting = FileMetricSetting::new(dir.path().join("nope.txt"));
    assert!(setting.read().is_err());
}

#[rstest]
fn blank_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("setting.txt");
    fs::write(&path, "\n").unwrap();
    let mut setting = FileMetricSetting::new(&path);
    let err = setting.read().unwrap_err();
    assert!(err.to_string().contains("empty"));
}
