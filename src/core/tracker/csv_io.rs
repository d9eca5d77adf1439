//! Tracker CSV reading and writing

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::core::models::{CourseRecord, GradingScale};

/// Column headers of a tracker file, in order
pub const EXPECTED_HEADERS: [&str; 6] = [
    "Course Code",
    "Course Title",
    "No. of CUs",
    "Grade",
    "Grade Points",
    "AY Taken",
];

/// Errors raised while reading or writing a tracker file
#[derive(Debug)]
pub enum TrackerError {
    /// Underlying CSV or I/O failure
    Csv(csv::Error),
    /// Header row differs from [`EXPECTED_HEADERS`]
    HeaderMismatch(Vec<String>),
    /// A data row failed validation (1-based line number)
    InvalidRow {
        /// Line in the file
        line: u64,
        /// What was wrong
        reason: String,
    },
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv(e) => write!(f, "CSV error: {e}"),
            Self::HeaderMismatch(found) => write!(
                f,
                "Incorrect column headers [{}]. Please use the exact format: {}",
                found.join(", "),
                EXPECTED_HEADERS.join(", ")
            ),
            Self::InvalidRow { line, reason } => write!(f, "Line {line}: {reason}"),
        }
    }
}

impl Error for TrackerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for TrackerError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl From<io::Error> for TrackerError {
    fn from(e: io::Error) -> Self {
        Self::Csv(csv::Error::from(e))
    }
}

/// One tracker row as it appears in the file
#[derive(Debug, Serialize, Deserialize)]
struct TrackerRow {
    #[serde(rename = "Course Code")]
    code: String,
    #[serde(rename = "Course Title")]
    title: String,
    #[serde(rename = "No. of CUs")]
    credit_units: f64,
    #[serde(rename = "Grade")]
    grade: Option<String>,
    #[serde(rename = "Grade Points")]
    grade_points: Option<f64>,
    #[serde(rename = "AY Taken")]
    term: String,
}

/// Read a tracker file
///
/// # Errors
/// Returns an error if the file cannot be read, the headers differ from
/// [`EXPECTED_HEADERS`], or a row has an unknown grade or negative units
pub fn read_tracker<P: AsRef<Path>>(
    path: P,
    scale: &GradingScale,
) -> Result<Vec<CourseRecord>, TrackerError> {
    let file = fs::File::open(path.as_ref())?;
    read_tracker_from(file, scale)
}

/// Read tracker rows from any reader, see [`read_tracker`]
///
/// # Errors
/// Same as [`read_tracker`]
pub fn read_tracker_from<R: io::Read>(
    reader: R,
    scale: &GradingScale,
) -> Result<Vec<CourseRecord>, TrackerError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers != EXPECTED_HEADERS {
        return Err(TrackerError::HeaderMismatch(headers));
    }

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<TrackerRow>().enumerate() {
        // header is line 1
        let line = idx as u64 + 2;
        let row = row?;

        if !row.credit_units.is_finite() || row.credit_units < 0.0 {
            return Err(TrackerError::InvalidRow {
                line,
                reason: format!("invalid number of CUs: {}", row.credit_units),
            });
        }

        let grade = row.grade.filter(|g| !g.is_empty());
        if let Some(letter) = grade.as_deref() {
            let entry = scale.entry(letter).map_err(|e| TrackerError::InvalidRow {
                line,
                reason: e.to_string(),
            })?;
            if let (Some(stored), Some(expected)) = (row.grade_points, entry.points) {
                if (stored - expected).abs() > f64::EPSILON {
                    crate::warn!(
                        "Line {line}: grade points {stored} for '{letter}' do not match the scale ({expected}); using the scale"
                    );
                }
            }
        }

        records.push(CourseRecord {
            code: row.code,
            title: row.title,
            credit_units: row.credit_units,
            grade,
            term: row.term,
        });
    }

    crate::debug!("Read {} tracker rows", records.len());
    Ok(records)
}

/// Write records to a tracker file, creating parent directories as needed
///
/// `Grade Points` is filled from `scale`; it is left empty for non-counting
/// grades and planned courses.
///
/// # Errors
/// Returns an error if the file cannot be written
pub fn write_tracker<P: AsRef<Path>>(
    records: &[CourseRecord],
    scale: &GradingScale,
    path: P,
) -> Result<(), TrackerError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_tracker_to(records, scale, file)
}

/// Write tracker rows to any writer, see [`write_tracker`]
///
/// # Errors
/// Returns an error if writing fails
pub fn write_tracker_to<W: io::Write>(
    records: &[CourseRecord],
    scale: &GradingScale,
    writer: W,
) -> Result<(), TrackerError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(EXPECTED_HEADERS)?;

    for record in records {
        let grade_points = record
            .grade
            .as_deref()
            .and_then(|letter| scale.grade_point(letter).ok())
            .and_then(|point| point.value());
        writer.serialize(TrackerRow {
            code: record.code.clone(),
            title: record.title.clone(),
            credit_units: record.credit_units,
            grade: record.grade.clone(),
            grade_points,
            term: record.term.clone(),
        })?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Course Code,Course Title,No. of CUs,Grade,Grade Points,AY Taken
CS1101S,Programming Methodology,4.0,A,5.0,2023/2024
GEA1000,Quantitative Reasoning with Data,4.0,S,,2023/2024
MA1521,Calculus for Computing,4.0,,,2024/2025
";

    #[test]
    fn reads_rows_and_planned_courses() {
        let scale = GradingScale::nus();
        let records = read_tracker_from(SAMPLE.as_bytes(), &scale).expect("read tracker");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].grade.as_deref(), Some("A"));
        assert_eq!(records[1].grade.as_deref(), Some("S"));
        assert!(records[2].is_planned());
        assert_eq!(records[2].term, "2024/2025");
    }

    #[test]
    fn rejects_wrong_headers() {
        let scale = GradingScale::nus();
        let csv = "Code,Title,Units,Grade,Points,Year\nCS1010,Intro,4,A,5,2023/2024\n";
        let err = read_tracker_from(csv.as_bytes(), &scale).expect_err("bad headers");
        assert!(matches!(err, TrackerError::HeaderMismatch(_)));
        assert!(err.to_string().contains("Course Code, Course Title"));
    }

    #[test]
    fn rejects_unknown_grade_with_line_number() {
        let scale = GradingScale::nus();
        let csv = format!("{}\nCS1010,Intro,4.0,Q,,2023/2024\n", EXPECTED_HEADERS.join(","));
        let err = read_tracker_from(csv.as_bytes(), &scale).expect_err("unknown grade");
        match err {
            TrackerError::InvalidRow { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("'Q'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn writes_grade_points_from_scale() {
        let scale = GradingScale::nus();
        let records = vec![
            CourseRecord::completed("CS2030S", "Programming Methodology II", 4.0, "B+", "2024/2025"),
            CourseRecord::completed("GEC1000", "Some GE", 4.0, "CS", "2024/2025"),
        ];
        let mut out = Vec::new();
        write_tracker_to(&records, &scale, &mut out).expect("write tracker");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], EXPECTED_HEADERS.join(","));
        assert_eq!(lines[1], "CS2030S,Programming Methodology II,4.0,B+,4.0,2024/2025");
        assert_eq!(lines[2], "GEC1000,Some GE,4.0,CS,,2024/2025");
    }

    #[test]
    fn empty_tracker_still_has_headers() {
        let scale = GradingScale::nus();
        let mut out = Vec::new();
        write_tracker_to(&[], &scale, &mut out).expect("write tracker");
        let records = read_tracker_from(out.as_slice(), &scale).expect("read back");
        assert!(records.is_empty());
    }
}
