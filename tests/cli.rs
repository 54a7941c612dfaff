//! Command line surface of the binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn seismoscope() -> Command {
    Command::cargo_bin("seismoscope").unwrap()
}

#[test]
fn help_describes_the_dashboard() {
    seismoscope()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("earthquake"))
        .stdout(predicate::str::contains("--timeframe"))
        .stdout(predicate::str::contains("--min-magnitude"));
}

#[test]
fn rejects_unknown_timeframe() {
    seismoscope()
        .args(["--timeframe", "all_year"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown timeframe 'all_year'"));
}

#[test]
fn rejects_out_of_range_magnitude() {
    seismoscope()
        .args(["--min-magnitude", "9.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be between 0.0 and 8.0"));
}

#[test]
fn rejects_dates_outside_the_window() {
    let log = tempfile::NamedTempFile::new().unwrap();

    seismoscope()
        .args(["--date", "1999-01-01", "--log"])
        .arg(log.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the allowed range"));

    let contents = std::fs::read_to_string(log.path()).unwrap();
    assert!(contents.contains("Starting SeismoScope"));
}

#[test]
fn date_conflicts_with_timeframe() {
    seismoscope()
        .args(["--date", "2024-01-01", "--timeframe", "all_week"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
