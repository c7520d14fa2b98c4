//! Integration tests for the intake binary.
//!
//! These tests verify end-to-end behavior including:
//! - Profile setup and norm derivation
//! - Water and workout logging
//! - Progress reporting
//! - The daily reset
//!
//! Weather lookups run with the --temperature override so no network or
//! API key is needed.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("intake"));
    cmd.env_remove("WEATHER_API_KEY");
    cmd
}

fn set_profile(data_dir: &std::path::Path, user: &str, temperature: &str) {
    cli()
        .arg("profile")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--user")
        .arg(user)
        .args(["--weight", "70"])
        .args(["--height", "175"])
        .args(["--age", "30"])
        .args(["--gender", "male"])
        .args(["--activity", "60"])
        .args(["--city", "Lisbon"])
        .args(["--temperature", temperature])
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Daily water and calorie tracking assistant",
        ));
}

#[test]
fn test_profile_prints_derived_norms() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("profile")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["--weight", "70"])
        .args(["--height", "175"])
        .args(["--age", "30"])
        .args(["--gender", "male"])
        .args(["--activity", "60"])
        .args(["--city", "Lisbon"])
        .args(["--temperature", "28"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily water norm: 3600 ml"))
        .stdout(predicate::str::contains("Daily calorie norm: 2123 kcal"));

    assert!(temp_dir.path().join("storage.json").exists());
}

#[test]
fn test_profile_rejects_unknown_gender() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("profile")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["--weight", "70"])
        .args(["--height", "175"])
        .args(["--age", "30"])
        .args(["--gender", "attack-helicopter"])
        .args(["--activity", "60"])
        .args(["--city", "Lisbon"])
        .args(["--temperature", "20"])
        .assert()
        .failure();

    // Nothing was stored
    assert!(!temp_dir.path().join("storage.json").exists());
}

#[test]
fn test_water_logging_accumulates_across_runs() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("water")
        .arg("300")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total today: 300 ml"));

    cli()
        .arg("water")
        .arg("200")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total today: 500 ml"));
}

#[test]
fn test_water_rejects_zero() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("water")
        .arg("0")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_workout_logs_burned_calories() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("workout")
        .arg("running")
        .arg("30")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Burned: 300 kcal"))
        .stdout(predicate::str::contains("extra 200 ml"));
}

#[test]
fn test_workout_unknown_type_lists_known_types() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("workout")
        .arg("quidditch")
        .arg("45")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown workout type: quidditch"))
        .stdout(predicate::str::contains("running"));

    // Nothing was stored
    assert!(!temp_dir.path().join("storage.json").exists());
}

#[test]
fn test_progress_before_profile_gives_guidance() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("progress")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No profile found"));
}

#[test]
fn test_full_day_scenario() {
    let temp_dir = setup_test_dir();
    set_profile(temp_dir.path(), "default", "28");

    cli()
        .arg("water")
        .arg("600")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("3000 ml to go"));

    cli()
        .arg("workout")
        .arg("walking")
        .arg("30")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("progress")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("600 / 3600 ml"))
        // 2122.76 norm + 120 burned
        .stdout(predicate::str::contains("0 / 2243 kcal"));
}

#[test]
fn test_users_are_isolated() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("water")
        .arg("400")
        .arg("--user")
        .arg("alice")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("water")
        .arg("150")
        .arg("--user")
        .arg("bob")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total today: 150 ml"));
}

#[test]
fn test_reset_zeroes_counters_and_recomputes_norms() {
    let temp_dir = setup_test_dir();
    set_profile(temp_dir.path(), "default", "22");

    cli()
        .arg("water")
        .arg("500")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("reset")
        .args(["--temperature", "35"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 norms recomputed"));

    // Counters back to zero, water norm now carries the full heat bonus
    cli()
        .arg("progress")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 / 4100 ml"));
}

#[test]
fn test_reset_without_weather_source_keeps_norms() {
    let temp_dir = setup_test_dir();
    set_profile(temp_dir.path(), "default", "22");

    cli()
        .arg("water")
        .arg("500")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    // No API key and no --temperature: counters roll over, norms stay
    cli()
        .arg("reset")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 users reset"))
        .stdout(predicate::str::contains("0 norms recomputed"));

    cli()
        .arg("progress")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 / 3100 ml"));
}

#[test]
fn test_chat_profile_setup_flow() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("chat")
        .args(["--temperature", "28"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("/set_profile\n70\n175\n30\nmale\n60\nLisbon\n/progress\n/quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Your profile is set"))
        .stdout(predicate::str::contains("0 / 3600 ml"));
}

#[test]
fn test_chat_reprompts_on_invalid_input() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("chat")
        .args(["--temperature", "20"])
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("/log_water\nnot-a-number\n250\n/quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("positive whole number"))
        .stdout(predicate::str::contains("Total today: 250 ml"));
}
