use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

fn viewer() -> Command {
    Command::cargo_bin("prism-viewer").expect("binary exists")
}

#[test]
fn missing_side_count_prints_usage() {
    viewer()
        .assert()
        .success()
        .stdout(contains("Usage: prism-viewer <sides>"));
}

#[test]
fn extra_positional_argument_prints_usage() {
    viewer()
        .args(["4", "5", "--summary-only"])
        .assert()
        .success()
        .stdout(contains("Usage: prism-viewer <sides>"));
}

#[test]
fn summary_reports_square_prism() {
    viewer()
        .args(["4", "--summary-only"])
        .assert()
        .success()
        .stdout(contains(
            "Generated 4-sided prism (half length 0.50): 16 triangles, 48 vertices",
        ))
        .stdout(contains(" - rim 0: (0.50, 0.00)"))
        .stdout(contains(" - rim 1: (0.00, 0.50)"));
}

#[test]
fn summary_honours_half_length() {
    viewer()
        .args(["6", "--half-length", "1.25", "--summary-only"])
        .assert()
        .success()
        .stdout(contains(
            "Generated 6-sided prism (half length 1.25): 24 triangles, 72 vertices",
        ));
}

#[test]
fn caps_only_mode_generates_single_polygon() {
    viewer()
        .args(["5", "--caps-only", "--summary-only"])
        .assert()
        .success()
        .stdout(contains(
            "Generated 5-sided cap polygon drawn at z = +/-0.50: 5 triangles, 15 vertices",
        ));
}

#[test]
fn degenerate_side_count_is_rejected() {
    viewer()
        .args(["2", "--summary-only"])
        .assert()
        .failure()
        .stderr(contains("a prism needs at least 3 sides, got 2"));
}

#[test]
fn non_numeric_side_count_is_rejected() {
    viewer()
        .args(["many", "--summary-only"])
        .assert()
        .failure()
        .stderr(contains("invalid side count"));
}

#[test]
fn invalid_half_length_is_rejected() {
    viewer()
        .args(["4", "--half-length", "0", "--summary-only"])
        .assert()
        .failure()
        .stderr(contains("half length must be a positive finite number"));
}

#[test]
fn unknown_flag_is_rejected() {
    viewer()
        .args(["4", "--wireframe"])
        .assert()
        .failure()
        .stderr(contains("Unknown argument: --wireframe"));
}

#[test]
fn negative_side_count_is_rejected_as_degenerate() {
    viewer()
        .args(["-5", "--summary-only"])
        .assert()
        .failure()
        .stderr(contains("a prism needs at least 3 sides, got -5"));
}

#[test]
fn oversized_side_count_is_rejected_without_allocating() {
    viewer()
        .args(["1000000000", "--summary-only"])
        .assert()
        .failure()
        .stderr(contains("a prism can have at most 932067 sides, got 1000000000"));
}
