use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("hvac_duct_calculator_cli").unwrap();
    cmd.env_remove("RUST_LOG").arg("--lang").arg("en-us");
    cmd
}

#[test]
fn calc_prints_velocity_and_loss() {
    cli()
        .args(["calc", "--diameter", "6", "--flow", "1000", "--length", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Air Velocity: 5,093.0 FPM"))
        .stdout(predicate::str::contains("in. w.g."));
}

#[test]
fn calc_full_report_lists_details() {
    cli()
        .args([
            "calc", "-d", "8", "-f", "600", "-l", "25", "--bends-90", "2", "-r", "High", "--full",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- INPUTS ---"))
        .stdout(predicate::str::contains("Equivalent Length (ft):"))
        .stdout(predicate::str::contains("High (0.015)"));
}

#[test]
fn zero_diameter_reports_invalid_velocity() {
    cli()
        .args(["calc", "-d", "0", "-f", "1000", "-l", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid (zero area)"));
}

#[test]
fn negative_length_is_rejected_with_field_name() {
    cli()
        .args(["calc", "-d", "6", "-f", "1000", "--length=-4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duct Length (ft) must be non-negative."));
}

#[test]
fn unknown_roughness_is_rejected() {
    cli()
        .args(["calc", "-d", "6", "-f", "1000", "-l", "10", "-r", "Polished"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown duct roughness: Polished"));
}

#[test]
fn interactive_exits_on_zero() {
    cli()
        .arg("interactive")
        .write_stdin("0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exiting application."));
}
