mod support;

use std::process::Command;

use metrics_visualiser::config::{self, AppSettings};
use metrics_visualiser::dashboard::PlotMode;
use support::env::ConfigHomeGuard;
use support::fixtures::{TESTING_JSON, TRAINING_JSON, write_json};

const EXPORT_BIN: &str = env!("CARGO_BIN_EXE_metrics-visualiser-export");

#[test]
fn writes_one_svg_per_individual_chart() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let _env = ConfigHomeGuard::set(temp.path().join("config"));
    let train = write_json(temp.path(), "train.json", TRAINING_JSON);
    let test = write_json(temp.path(), "test.json", TESTING_JSON);
    let out = temp.path().join("charts");

    let output = Command::new(EXPORT_BIN)
        .arg("--train")
        .arg(&train)
        .arg("--test")
        .arg(&test)
        .args(["--mode", "individual", "--width", "640", "--height", "480"])
        .arg("--out")
        .arg(&out)
        .output()
        .expect("run export");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let written: Vec<&str> = stdout.lines().collect();
    assert_eq!(written.len(), 2);
    for path in written {
        let svg = std::fs::read_to_string(path).expect("read svg");
        assert!(svg.contains("<svg"));
    }
}

#[test]
fn configured_mode_applies_without_mode_flag() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let _env = ConfigHomeGuard::set(temp.path().join("config"));
    let mut settings = AppSettings::default();
    settings.display.default_mode = PlotMode::Individual;
    config::save(&settings).expect("save settings");
    let train = write_json(temp.path(), "train.json", TRAINING_JSON);
    let out = temp.path().join("charts");

    let output = Command::new(EXPORT_BIN)
        .arg("--train")
        .arg(&train)
        .arg("--out")
        .arg(&out)
        .output()
        .expect("run export");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 2);
}

#[test]
fn empty_selection_exits_with_warning() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let _env = ConfigHomeGuard::set(temp.path().join("config"));
    let train = write_json(temp.path(), "train.json", TRAINING_JSON);

    let output = Command::new(EXPORT_BIN)
        .arg("--train")
        .arg(&train)
        .args(["--metric", "perplexity"])
        .arg("--out")
        .arg(temp.path())
        .output()
        .expect("run export");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Please select at least one metric to plot."));
}

#[test]
fn no_inputs_prints_info_and_succeeds() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let _env = ConfigHomeGuard::set(temp.path().join("config"));
    let output = Command::new(EXPORT_BIN).output().expect("run export");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Please upload at least one JSON file to proceed."));
}
