//! Course record model

use serde::{Deserialize, Serialize};

/// One taken or planned course
///
/// A planned course differs from a completed one only in lacking a grade.
/// Records are immutable once created; collections of them live in
/// [`RecordSet`](super::RecordSet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Course code (e.g., "CS2030S"); unique within a term, not globally
    pub code: String,
    /// Course title
    pub title: String,
    /// Credit units (can be fractional)
    pub credit_units: f64,
    /// Letter grade; `None` for a planned course
    pub grade: Option<String>,
    /// Academic year label (e.g., "2024/2025")
    pub term: String,
}

impl CourseRecord {
    /// Create a record for a completed course
    #[must_use]
    pub fn completed(
        code: impl Into<String>,
        title: impl Into<String>,
        credit_units: f64,
        grade: impl Into<String>,
        term: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            credit_units,
            grade: Some(grade.into()),
            term: term.into(),
        }
    }

    /// Create a record for a course that has not been graded yet
    #[must_use]
    pub fn planned(
        code: impl Into<String>,
        title: impl Into<String>,
        credit_units: f64,
        term: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            credit_units,
            grade: None,
            term: term.into(),
        }
    }

    /// Whether the course has no grade yet
    #[must_use]
    pub const fn is_planned(&self) -> bool {
        self.grade.is_none()
    }
}

/// A future course entering a forecast; only its credit units matter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedCourse {
    /// Course code, empty when only units were supplied
    pub code: String,
    /// Course title, empty when only units were supplied
    pub title: String,
    /// Credit units
    pub credit_units: f64,
}

impl PlannedCourse {
    /// Create a planned course
    #[must_use]
    pub fn new(code: impl Into<String>, title: impl Into<String>, credit_units: f64) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            credit_units,
        }
    }

    /// A planned course known only by its credit units
    #[must_use]
    pub const fn units_only(credit_units: f64) -> Self {
        Self {
            code: String::new(),
            title: String::new(),
            credit_units,
        }
    }
}

impl From<&CourseRecord> for PlannedCourse {
    fn from(record: &CourseRecord) -> Self {
        Self::new(record.code.clone(), record.title.clone(), record.credit_units)
    }
}
