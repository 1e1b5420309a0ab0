use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo_bin!("flightdesk"))
}

fn desk() -> Command {
    let mut cmd = cmd();
    cmd.args(["--scenario", "data/default.json", "--date", "2024-01-10"]);
    cmd
}

#[test]
fn top_level_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Flight school booking desk"))
        .stdout(predicate::str::contains("--scenario <FILE>"))
        .stdout(predicate::str::contains("--window <MINUTES>"))
        .stdout(predicate::str::contains("--log-level"));
}

#[test]
fn top_level_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flightdesk 0.1.0"));
}

#[test]
fn missing_scenario_fails() {
    cmd()
        .args(["--scenario", "data/does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scenario file could not be read"));
}

#[test]
fn invalid_window_fails() {
    desk()
        .args(["--window", "0"])
        .assert()
        .failure();
}

#[test]
fn stats_for_loaded_scenario() {
    desk()
        .write_stdin("stats\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 5 flights"))
        .stdout(predicate::str::contains("Flights:   5"))
        .stdout(predicate::str::contains("Total hours: 1.4"));
}

#[test]
fn conflicting_booking_is_rejected() {
    desk()
        .write_stdin("book N172PA 1 10:00 12:00\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("already booked by flight F1"));
}

#[test]
fn booking_after_existing_flight() {
    desk()
        .write_stdin("book N172PA 3 11:00 +2 dual Pat Doe\nls d\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Booked"))
        .stdout(predicate::str::contains("F6"))
        .stdout(predicate::str::contains("Pat Doe"));
}

#[test]
fn unauthorized_instructor_is_rejected() {
    desk()
        .write_stdin("book N51204 3 16:00 17:00\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("not authorized to fly N51204"));
}

#[test]
fn slots_need_a_filter() {
    desk()
        .write_stdin("slots\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No filter applied"));
}

#[test]
fn aircraft_first_filter_then_slots() {
    desk()
        .write_stdin("filter mode a\nfilter pick N172PA\nfilter next\nfilter pick 3\nfilter apply\nslots\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Filter applied: 1 aircraft, 1 instructors"))
        .stdout(predicate::str::contains("11:00 AM"));
}

#[test]
fn filter_rejects_confirm_before_mode() {
    desk()
        .write_stdin("filter next\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("confirm is not allowed while selecting mode"));
}

#[test]
fn cancel_requires_reason() {
    desk()
        .write_stdin("cancel F1\ncancel F1 Weather -- gusty\nls x\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("a cancellation reason is required"))
        .stdout(predicate::str::contains("Flight F1 cancelled."));
}

#[test]
fn instructor_profile_by_name() {
    desk()
        .write_stdin("instructor Justin Marvin\ninstructor 5\ninstructor Nobody\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("765-418-5504"))
        .stdout(predicate::str::contains("Spin Training/Spin Endorsement"))
        .stdout(predicate::str::contains("Flights on 2024-01-10: 1"))
        .stdout(predicate::str::contains("Ciara Hoyt"))
        .stdout(predicate::str::contains("unknown instructor Nobody"));
}

#[test]
fn oversized_duration_is_rejected() {
    desk()
        .write_stdin("book N172PA 3 11:00 +1e12\nbook N172PA 3 +9:00 10:00\nstats\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("is not before end"))
        .stdout(predicate::str::contains("malformed time \"+9:00\""))
        .stdout(predicate::str::contains("Flights:   5"));
}
