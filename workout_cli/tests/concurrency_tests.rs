//! Concurrency tests for nextworkout.
//!
//! Imports take an exclusive lock on `customWorkouts.lock` around their
//! load and rewrite, and writes land by rename. These tests check that:
//! - Imports one after another into the same data dir all persist
//! - Imports racing in parallel processes all persist
//! - Readers never see a half-written file while another process rewrites it

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn cli(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nextworkout"));
    cmd.env("XDG_CONFIG_HOME", root.join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(root.join("data"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn plan_json(id: &str) -> String {
    serde_json::json!({
        "id": id,
        "title": format!("Plan {}", id),
        "description": "Generated",
        "level": "advanced",
        "duration": "30 min",
        "instructions": {"rounds": "3", "reps": "12", "rest": "45s"},
        "exercises": [{
            "name": "Burpee",
            "targetMuscles": ["Full Body"],
            "videoUrls": ["https://www.youtube.com/embed/dZgVxmf6jkA"],
            "instructions": ["Drop", "Jump"],
            "altering": false
        }]
    })
    .to_string()
}

#[test]
fn test_sequential_imports_all_persist() {
    let temp_dir = setup_test_dir();

    // Imports with slight delays (more realistic than thundering herd)
    for i in 0..5u64 {
        thread::sleep(Duration::from_millis(i * 5));
        cli(temp_dir.path())
            .args(["import", "-"])
            .write_stdin(plan_json(&format!("plan-{}", i)))
            .assert()
            .success();
    }

    let stored =
        std::fs::read_to_string(temp_dir.path().join("data/customWorkouts.json")).unwrap();
    let plans: Vec<serde_json::Value> = serde_json::from_str(&stored).unwrap();
    assert_eq!(plans.len(), 5, "Expected 5 plans, got {}", plans.len());
}

#[test]
fn test_parallel_imports_all_persist() {
    let temp_dir = setup_test_dir();
    let root = temp_dir.path().to_path_buf();

    let importers: Vec<_> = (0..4)
        .map(|i| {
            let importer_root = root.clone();
            thread::spawn(move || {
                cli(&importer_root)
                    .args(["import", "-"])
                    .write_stdin(plan_json(&format!("racer-{}", i)))
                    .assert()
                    .success();
            })
        })
        .collect();

    for importer in importers {
        importer.join().expect("importer panicked");
    }

    cli(&root)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 workouts (4 imported)"));
}

#[test]
fn test_readers_never_see_partial_writes() {
    let temp_dir = setup_test_dir();
    let root = temp_dir.path().to_path_buf();

    cli(&root)
        .args(["import", "-"])
        .write_stdin(plan_json("seed"))
        .assert()
        .success();

    let writer_root = root.clone();
    let writer = thread::spawn(move || {
        for i in 0..5 {
            cli(&writer_root)
                .args(["import", "-"])
                .write_stdin(plan_json(&format!("w-{}", i)))
                .assert()
                .success();
        }
    });

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let reader_root = root.clone();
            thread::spawn(move || {
                for _ in 0..5 {
                    cli(&reader_root)
                        .arg("list")
                        .assert()
                        .success()
                        .stdout(predicate::str::contains("seed  [imported]"))
                        .stderr(predicate::str::contains("Failed to parse").not());
                }
            })
        })
        .collect();

    writer.join().expect("writer panicked");
    for reader in readers {
        reader.join().expect("reader panicked");
    }

    cli(&root)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("7 workouts (6 imported)"));
}
