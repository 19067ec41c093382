#![cfg(feature = "cli")]

use std::path::Path;

use assert_cmd::Command;
use image::{GrayImage, Luma};
use predicates::prelude::*;

fn dist_to_segment(px: f64, py: f64, a: (f64, f64), b: (f64, f64)) -> f64 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let t = (((px - a.0) * abx + (py - a.1) * aby) / (abx * abx + aby * aby)).clamp(0.0, 1.0);
    (px - (a.0 + t * abx)).hypot(py - (a.1 + t * aby))
}

/// Writes `count` copies of a 100x100 frame with a rod from (25, 70) to (75, 30).
fn write_rod_frames(dir: &Path, count: usize) {
    let (a, b): ((f64, f64), (f64, f64)) = ((25.0, 70.0), (75.0, 30.0));
    let radius = 0.1 * (b.0 - a.0).hypot(b.1 - a.1);
    let img = GrayImage::from_fn(100, 100, |x, y| {
        let d = dist_to_segment(x as f64, y as f64, a, b);
        let cover = (radius + 0.5 - d).clamp(0.0, 1.0);
        Luma([(20.0 + 180.0 * cover).round() as u8])
    });
    for i in 0..count {
        img.save(dir.join(format!("frame{:02}.png", i + 1)))
            .expect("write png");
    }
}

fn rodfit() -> Command {
    Command::cargo_bin("rodfit").expect("binary")
}

#[test]
fn info_counts_frames() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_rod_frames(dir.path(), 4);
    let pattern = format!("{}/frame%02d.png", dir.path().display());

    rodfit()
        .args(["info", pattern.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains(": 4 frames"));

    rodfit()
        .args(["info", pattern.as_str(), "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(": 2 frames"));
}

#[test]
fn info_reports_missing_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pattern = format!("{}/none%d.png", dir.path().display());
    rodfit()
        .args(["info", pattern.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NoFrames"));
}

#[test]
fn fit_writes_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_rod_frames(dir.path(), 2);
    let pattern = format!("{}/frame%02d.png", dir.path().display());
    let out = dir.path().join("report.json");

    rodfit()
        .args(["fit", pattern.as_str(), "--frame", "1", "--filter", "blur-sobel", "--ksize", "5"])
        .args(["--drag", "27", "73", "73", "28"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).expect("report")).expect("json");
    let initial = report["initial_objective"].as_f64().expect("initial");
    let last = report["final_objective"].as_f64().expect("final");
    assert!(last < initial);
    assert!(report["status"].is_string());
    assert!(report["shape"]["scale"].as_f64().expect("scale") > 0.5);
}

#[test]
fn fit_reads_config_and_prints_to_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_rod_frames(dir.path(), 1);
    let pattern = format!("{}/frame%02d.png", dir.path().display());
    let config = dir.path().join("fit.json");
    std::fs::write(&config, r#"{ "points": 400, "powell": { "max_evaluations": 50 } }"#)
        .expect("config");

    rodfit()
        .args(["fit", pattern.as_str(), "--drag", "27", "73", "73", "28"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"evaluations\": 50"));
}

#[test]
fn fit_rejects_unknown_filter() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_rod_frames(dir.path(), 1);
    let pattern = format!("{}/frame%02d.png", dir.path().display());
    rodfit()
        .args(["fit", pattern.as_str(), "--filter", "median", "--drag", "1", "2", "3", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown filter kind"));
}
