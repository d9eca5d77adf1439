//! Error types for GPA aggregation and forecasting

use std::error::Error;
use std::fmt;

/// Recoverable conditions reported by the aggregator and the forecast solver
///
/// An unreachable honours tier is not an error; it is reported per tier as
/// [`TierOutcome::Infeasible`](crate::core::forecast::TierOutcome::Infeasible).
#[derive(Debug, Clone, PartialEq)]
pub enum GpaError {
    /// A grade letter that is not on the grading scale
    UnknownGrade(String),
    /// No record has a grade that counts toward GPA, so the GPA is undefined
    EmptyCountedSet,
    /// A forecast was requested without any planned credit units
    ZeroNewUnits,
    /// A baseline or credit-unit value outside its valid range
    InvalidInput(String),
}

impl fmt::Display for GpaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGrade(letter) => write!(f, "Unknown grade: '{letter}'"),
            Self::EmptyCountedSet => {
                write!(f, "No courses with a GPA-counting grade; GPA is undefined")
            }
            Self::ZeroNewUnits => write!(f, "No planned course units selected for the forecast"),
            Self::InvalidInput(reason) => write!(f, "Invalid input: {reason}"),
        }
    }
}

impl Error for GpaError {}
