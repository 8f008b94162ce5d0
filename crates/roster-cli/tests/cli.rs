//! End-to-end runs of the `roster` binary.

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

fn roster(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_roster"))
        .args(args)
        .output()
        .expect("failed to run roster")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "roster failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

const CSV: &str = "\
lrn,last_name,first_name,middle_name,sex,age,grade_level,section,track_and_strand
100,Dela Cruz,Juan,Santos,Male,15,Grade 10,Rizal,N/A
101,Reyes,Maria,,Female,16,Grade 11,Luna,STEM
102,Santos,Ana,Reyes,Female,17,Grade 12,Luna,ABM
103,Lim,Ben,,Male,13,Grade 7,Mabini,N/A
";

#[test]
fn list_sample_defaults() {
    let out = stdout(&roster(&["--sample", "30", "list"]));
    assert!(out.starts_with("LRN"));
    assert!(out.contains("Page 1 of 2 (rows 1-25 of 30)"));
    assert!(out.contains("Showing All Records: 30 Records Found"));
}

#[test]
fn sample_is_deterministic() {
    let first = stdout(&roster(&["--sample", "40", "--seed", "3", "list", "-o", "json"]));
    let second = stdout(&roster(&["--sample", "40", "--seed", "3", "list", "-o", "json"]));
    assert_eq!(first, second);
}

#[test]
fn list_json_reports_totals() {
    let out = stdout(&roster(&[
        "--sample", "30", "-o", "json", "list", "--page-size", "10", "-p", "3",
    ]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["total"], 30);
    assert_eq!(value["page"], 3);
    assert_eq!(value["total_pages"], 3);
    assert_eq!(value["records"].as_array().map(Vec::len), Some(10));
}

#[test]
fn page_past_end_is_clamped() {
    let out = stdout(&roster(&["--sample", "12", "-o", "json", "list", "-p", "10"]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["page"], 1);
    assert_eq!(value["records"].as_array().map(Vec::len), Some(12));
}

#[test]
fn unknown_page_size_is_rejected() {
    let output = roster(&["--sample", "10", "list", "--page-size", "7"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("page size 7"));
}

#[test]
fn csv_source_filters_and_counts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("students.csv");
    fs::write(&path, CSV).unwrap();
    let path = path.to_str().unwrap();

    let out = stdout(&roster(&["--csv", path, "count", "--search", "santos"]));
    assert_eq!(out.trim(), "Search Active | 2 Records Found");

    let out = stdout(&roster(&["--csv", path, "count", "--sex", "none"]));
    assert_eq!(out.trim(), "1 Active Filter | 0 Records Found");

    let out = stdout(&roster(&[
        "--csv", path, "count", "--grade", "Grade 11", "--sex", "female",
    ]));
    assert_eq!(out.trim(), "2 Active Filters | 1 Record Found");
}

#[test]
fn facets_exclude_missing_track() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("students.csv");
    fs::write(&path, CSV).unwrap();

    let out = stdout(&roster(&["--csv", path.to_str().unwrap(), "facets"]));
    assert!(out.contains("Tracks/strands: ABM, STEM\n"));
    assert!(out.contains("Ages:           13-17\n"));
}

#[test]
fn show_and_print() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("students.csv");
    fs::write(&path, CSV).unwrap();
    let path = path.to_str().unwrap();

    let out = stdout(&roster(&["--csv", path, "show", "102"]));
    assert!(out.contains("Full Name:      Santos, Ana R."));

    let missing = roster(&["--csv", path, "show", "102", "--sex", "male"]);
    assert!(!missing.status.success());

    let out = stdout(&roster(&["--csv", path, "print", "103", "999", "100"]));
    assert_eq!(
        out,
        "LRN: 103, Name: Lim, Ben\nLRN: 100, Name: Dela Cruz, Juan S.\n"
    );
}

#[test]
fn import_then_export_round_trip() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("students.csv");
    let db_path = dir.path().join("roster.db");
    let out_path = dir.path().join("export.csv");
    fs::write(&csv_path, CSV).unwrap();

    let out = stdout(&roster(&[
        "import",
        csv_path.to_str().unwrap(),
        "--into",
        db_path.to_str().unwrap(),
    ]));
    assert!(out.starts_with("Imported 4 students"));

    stdout(&roster(&[
        "--db",
        db_path.to_str().unwrap(),
        "export",
        "--min-age",
        "15",
        "--out",
        out_path.to_str().unwrap(),
    ]));
    let exported = fs::read_to_string(&out_path).unwrap();
    let lrns: Vec<&str> = exported
        .lines()
        .skip(1)
        .filter_map(|line| line.split(',').next())
        .collect();
    assert_eq!(lrns, vec!["100", "101", "102"]);
}

#[test]
fn import_needs_a_target() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("students.csv");
    fs::write(&csv_path, CSV).unwrap();
    let output = roster(&["import", csv_path.to_str().unwrap()]);
    assert!(!output.status.success());
}
