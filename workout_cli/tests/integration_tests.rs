//! Integration tests for the nextworkout binary.
//!
//! These tests verify end-to-end behavior including:
//! - Listing and showing plans
//! - Importing and deleting custom plans
//! - Prompt generation
//! - Running a guided session with a fast tick source

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI bound to an isolated data dir and config home
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nextworkout"));
    cmd.env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(dir.path().join("data"));
    cmd
}

fn plan_json(id: &str) -> String {
    serde_json::json!({
        "id": id,
        "title": "Evening Mobility",
        "description": "Loosen up before bed",
        "level": "beginner",
        "duration": "10 min",
        "instructions": {
            "rounds": "1 round",
            "reps": "10 reps",
            "rest": "15 seconds"
        },
        "exercises": [{
            "name": "Cat Cow",
            "targetMuscles": ["Back"],
            "videoUrls": ["https://www.youtube.com/watch?v=kqnua4rHVVA"],
            "instructions": ["Arch and round your back"]
        }]
    })
    .to_string()
}

fn import(dir: &TempDir, id: &str) {
    cli(dir)
        .arg("import")
        .arg("-")
        .write_stdin(plan_json(id))
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Guided interval workouts from built-in and imported plans",
        ));
}

#[test]
fn test_list_shows_builtin_plan() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 workouts (0 imported)"))
        .stdout(predicate::str::contains("full-body-beginner"))
        .stdout(predicate::str::contains("[imported]").not());
}

#[test]
fn test_show_builtin_plan() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["show", "full-body-beginner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alternating Bicep Curls (alternating)"))
        .stdout(predicate::str::contains("https://www.youtube.com/watch?v="));
}

#[test]
fn test_show_unknown_plan_fails() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Workout not found: nope"));
}

#[test]
fn test_import_from_file_persists() {
    let dir = setup_test_dir();
    let file = dir.path().join("pasted.json");
    fs::write(&file, plan_json("evening")).unwrap();

    cli(&dir)
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 'Evening Mobility' as evening"));

    let stored = fs::read_to_string(dir.path().join("data/customWorkouts.json")).unwrap();
    let plans: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(plans.as_array().map(|a| a.len()), Some(1));
    assert_eq!(plans[0]["exercises"][0]["altering"], false);

    cli(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 workouts (1 imported)"))
        .stdout(predicate::str::contains("evening  [imported]"));
}

#[test]
fn test_import_same_id_twice_rekeys() {
    let dir = setup_test_dir();
    import(&dir, "evening");

    cli(&dir)
        .args(["import", "-"])
        .write_stdin(plan_json("evening"))
        .assert()
        .success()
        .stdout(predicate::str::contains("as evening-"));

    cli(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 workouts (2 imported)"));
}

#[test]
fn test_import_rejects_non_json() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["import", "-"])
        .write_stdin("Sure! Here is your workout:")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid JSON format. Please paste the complete JSON response from the chat.",
        ));

    assert!(!dir.path().join("data/customWorkouts.json").exists());
}

#[test]
fn test_import_reports_every_schema_issue() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["import", "-"])
        .write_stdin(r#"{"id": "x"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"))
        .stderr(predicate::str::contains("title: Required"))
        .stderr(predicate::str::contains("exercises: Required"));
}

#[test]
fn test_delete_builtin_is_refused() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["delete", "full-body-beginner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot delete default workouts"));
}

#[test]
fn test_delete_imported_plan() {
    let dir = setup_test_dir();
    import(&dir, "evening");

    cli(&dir)
        .args(["delete", "evening"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted workout evening"));

    cli(&dir)
        .args(["show", "evening"])
        .assert()
        .failure();

    cli(&dir)
        .args(["delete", "evening"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Workout not found"));
}

#[test]
fn test_prompt_defaults() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("prompt")
        .assert()
        .success()
        .stdout(predicate::str::contains("- Title: [Generate an appropriate title]"))
        .stdout(predicate::str::contains("- Duration: 15-20 minutes"))
        .stdout(predicate::str::contains("- Target Muscle Areas: Full Body"))
        .stdout(predicate::str::contains(
            "- Available Equipment: No equipment (bodyweight only)",
        ))
        .stdout(predicate::str::contains("Additional Notes").not());
}

#[test]
fn test_prompt_labels_follow_option_order() {
    let dir = setup_test_dir();
    cli(&dir)
        .args([
            "prompt",
            "--level",
            "advanced",
            "--focus",
            "legs,chest",
            "--equipment",
            "bench,dumbbells",
            "--notes",
            "bad knee",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Fitness Level: advanced"))
        .stdout(predicate::str::contains("- Target Muscle Areas: Chest, Legs"))
        .stdout(predicate::str::contains("- Available Equipment: Dumbbells, Bench"))
        .stdout(predicate::str::contains("- Additional Notes: bad knee"));
}

#[test]
fn test_prompt_rejects_unknown_focus() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["prompt", "--focus", "toes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown focus area 'toes'"));
}

#[test]
fn test_prompt_chat_url() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["prompt", "--url"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "https://chat.openai.com/?model=gpt-4o-mini&q=I%20need%20you",
        ))
        .stdout(predicate::str::contains("&temporary-chat=true"));
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["--verbose", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Using data directory").not())
        .stderr(predicate::str::contains("Using data directory"));

    cli(&dir)
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("Using data directory").not());
}

fn quick_session(dir: &TempDir) -> Command {
    let mut cmd = cli(dir);
    cmd.args([
        "start",
        "full-body-beginner",
        "--exercise",
        "Goblet Squat",
        "--exercise",
        "Dumbbell Shoulder Press",
        "--rounds",
        "1",
        "--reps",
        "1",
        "--rest",
        "5",
        "--time-per-rep",
        "1",
        "--tick-ms",
        "0",
    ]);
    cmd
}

#[test]
fn test_start_runs_to_completion() {
    let dir = setup_test_dir();
    quick_session(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("♪ Get ready!"))
        .stdout(predicate::str::contains("▶ Goblet Squat: https://www.youtube.com/watch?v="))
        .stdout(predicate::str::contains("[Active] Goblet Squat · Set 1/1 · Rep 1/1"))
        .stdout(predicate::str::contains("Next: Dumbbell Shoulder Press"))
        .stdout(predicate::str::contains("♪ Done!"))
        .stdout(predicate::str::contains("Workout complete!"))
        .stdout(predicate::str::contains("Reps: 2/2"));
}

#[test]
fn test_start_circuit_without_audio() {
    let dir = setup_test_dir();
    quick_session(&dir)
        .args(["--mode", "circuit", "--no-audio"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Round 1/1"))
        .stdout(predicate::str::contains("♪").not())
        .stdout(predicate::str::contains("Workout complete!"));
}

#[test]
fn test_start_with_overlay_playlist() {
    let dir = setup_test_dir();
    quick_session(&dir)
        .arg("--zyzz")
        .assert()
        .success()
        .stdout(predicate::str::contains("Overlay playlist:"))
        .stdout(predicate::str::contains(
            "https://www.youtube.com/watch?v=5OZ-JOSWx1Q",
        ));
}

#[test]
fn test_start_quit_reports_exit() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["start", "full-body-beginner", "--tick-ms", "1000"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout exited."))
        .stdout(predicate::str::contains("Reps: 0/"));
}

#[test]
fn test_start_rejects_out_of_range_settings() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["start", "full-body-beginner", "--rounds", "11", "--rest", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rounds must be between 1 and 10"))
        .stderr(predicate::str::contains("Rest period must be between 5 and 120"));
}

#[test]
fn test_start_rejects_unknown_exercise() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["start", "full-body-beginner", "--exercise", "Burpees"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'Burpees' is not an exercise in this workout",
        ));
}

#[test]
fn test_start_selects_exercise_with_comma_in_name() {
    let dir = setup_test_dir();
    let plan = serde_json::json!({
        "id": "paused-squats",
        "title": "Paused Squats",
        "description": "Slow tempo lower body",
        "level": "intermediate",
        "duration": "15 min",
        "instructions": {"rounds": "2", "reps": "8", "rest": "60s"},
        "exercises": [
            {
                "name": "Squat, Pause",
                "targetMuscles": ["Quads"],
                "videoUrls": ["https://www.youtube.com/watch?v=MeIiIdhvXT4"],
                "instructions": ["Hold at the bottom"]
            },
            {
                "name": "Lunge",
                "targetMuscles": ["Glutes"],
                "videoUrls": ["https://www.youtube.com/watch?v=QOVaHwm-Q6U"],
                "instructions": ["Step forward"]
            }
        ]
    });
    cli(&dir)
        .args(["import", "-"])
        .write_stdin(plan.to_string())
        .assert()
        .success();

    cli(&dir)
        .args([
            "start",
            "paused-squats",
            "--exercise",
            "Squat, Pause",
            "--rounds",
            "1",
            "--reps",
            "1",
            "--rest",
            "5",
            "--time-per-rep",
            "1",
            "--tick-ms",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("  • Squat, Pause"))
        .stdout(predicate::str::contains("  • Lunge").not())
        .stdout(predicate::str::contains("Workout complete!"))
        .stdout(predicate::str::contains("Reps: 1/1"));
}

#[test]
fn test_config_file_supplies_session_defaults() {
    let dir = setup_test_dir();
    let config = dir.path().join("custom.toml");
    fs::write(
        &config,
        r#"
[session]
rounds = 1
reps_per_exercise = 1
rest_period = 5
time_per_rep = 1
workout_mode = "circuit"

[audio]
enabled = false
"#,
    )
    .unwrap();

    cli(&dir)
        .arg("--config")
        .arg(&config)
        .args([
            "start",
            "full-body-beginner",
            "--exercise",
            "Goblet Squat",
            "--tick-ms",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("circuit · 1 rounds × 1 reps"))
        .stdout(predicate::str::contains("♪").not())
        .stdout(predicate::str::contains("Reps: 1/1"));
}
