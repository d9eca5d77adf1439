//! Data models for `GpaInsight`

pub mod grade;
pub mod record;
pub mod record_set;

pub use grade::{
    Classification, GradeCategory, GradeEntry, GradePoint, GradingScale, HonoursThresholds,
};
pub use record::{CourseRecord, PlannedCourse};
pub use record_set::RecordSet;
