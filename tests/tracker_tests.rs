//! Tracker CSV and catalog files on disk

use gpa_insight::core::aggregate::GpaAggregator;
use gpa_insight::core::catalog::{Catalog, CourseCatalog};
use gpa_insight::core::models::{Classification, CourseRecord, GradingScale};
use gpa_insight::core::tracker::{read_tracker, write_tracker, TrackerError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn tracker_survives_a_write_and_read() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("out").join("course_tracker.csv");
    let scale = GradingScale::nus();

    let records = vec![
        CourseRecord::completed("CS1101S", "Programming Methodology", 4.0, "A-", "2024/2025"),
        CourseRecord::completed("GEA1000", "Quantitative Reasoning, with Data", 4.0, "S", "2024/2025"),
        CourseRecord::planned("CS2103T", "Software Engineering", 4.0, "2025/2026"),
    ];
    write_tracker(&records, &scale, &path).expect("write");

    let content = fs::read_to_string(&path).expect("read back");
    assert!(content.starts_with("Course Code,Course Title,No. of CUs,Grade,Grade Points,AY Taken"));
    assert!(content.contains("CS1101S,Programming Methodology,4.0,A-,4.5,2024/2025"));

    let loaded = read_tracker(&path, &scale).expect("read");
    assert_eq!(loaded, records);
}

#[test]
fn tracker_with_wrong_headers_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("tracker.csv");
    fs::write(&path, "Code,Title,Units,Grade\nCS1010,Intro,4,A\n").expect("write");

    let err = read_tracker(&path, &GradingScale::nus()).expect_err("bad headers");
    assert!(matches!(err, TrackerError::HeaderMismatch(_)));
    assert!(err.to_string().contains("Course Code, Course Title, No. of CUs"));
}

#[test]
fn tracker_with_unknown_grade_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("tracker.csv");
    fs::write(
        &path,
        "Course Code,Course Title,No. of CUs,Grade,Grade Points,AY Taken\n\
         CS1010,Intro,4,A,5.0,2024/2025\n\
         CS1231,Discrete,4,Q,,2024/2025\n",
    )
    .expect("write");

    let err = read_tracker(&path, &GradingScale::nus()).expect_err("unknown grade");
    assert!(matches!(err, TrackerError::InvalidRow { line: 3, .. }));
}

#[test]
fn sample_tracker_summarizes() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("samples/course_tracker.csv");
    let scale = GradingScale::nus();
    let records = read_tracker(&path, &scale).expect("sample tracker");

    let result = GpaAggregator::new(&scale)
        .aggregate(&records)
        .expect("aggregate");

    // 4.5 + 4.0 + 5.0 + 3.5 + 5.0 + 3.5 over six 4-CU courses
    assert!((result.gpa - 25.5 / 6.0).abs() < 1e-12);
    assert!((result.gpa_3dp - 4.25).abs() < 1e-12);
    assert_eq!(result.classification, Classification::Distinction);
    assert_eq!(result.counts.attempted, 9);
    assert_eq!(result.counts.satisfactory_unsatisfactory, 1);
    assert_eq!(result.counts.completed_or_overseas, 1);
    assert_eq!(result.counts.unresolved, 1);
    // IP awards no units; CFG1002 carries none
    assert!((result.total_completed_units - 28.0).abs() < 1e-12);
}

#[test]
fn sample_catalogs_load() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("samples/catalog");
    for name in ["2025-2026.json", "2026-2027.json"] {
        let catalog = Catalog::from_path(dir.join(name)).expect("sample catalog");
        assert!(!catalog.is_empty());
        assert!(catalog.lookup("CS2103T").is_some());
        assert!(catalog.forecastable().all(|e| e.credit_units > 0.0));
    }
}

#[test]
fn missing_catalog_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    assert!(Catalog::from_path(dir.path().join("2030-2031.json")).is_err());
}
