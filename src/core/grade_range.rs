//! Translate a required grade-point average back into letter grades

use crate::core::models::GradingScale;
use crate::core::round_to;

/// Two grade-point values closer than this are treated as equal.
///
/// Inputs are rounded to 4 d.p. first, so anything below 1e-4 is float noise.
const TOLERANCE: f64 = 1e-9;

/// Describes a numeric grade point as a letter-grade range
///
/// The reverse table is built once from the grading scale, so forward lookups
/// and descriptions always agree.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeRangeTranslator {
    /// Distinct grade points, highest first, with their letters
    points: Vec<(f64, String)>,
}

impl GradeRangeTranslator {
    /// Build the reverse table for `scale`
    #[must_use]
    pub fn new(scale: &GradingScale) -> Self {
        Self {
            points: scale.letters_for_points(),
        }
    }

    /// Distinct grade points with their letters, highest first
    #[must_use]
    pub fn points(&self) -> &[(f64, String)] {
        &self.points
    }

    /// Describe `required` as a letter-grade range
    ///
    /// - a discrete grade point: `"exactly B-"`
    /// - midway between two: `"exactly between B- and B"`
    /// - otherwise: `"between B- and B, closer to B-"`
    /// - beyond the scale: `"at least A+/A"` or `"at most F"`
    #[must_use]
    pub fn describe(&self, required: f64) -> String {
        let required = round_to(required, 4);

        if let Some((_, letters)) = self
            .points
            .iter()
            .find(|(value, _)| (value - required).abs() < TOLERANCE)
        {
            return format!("exactly {letters}");
        }

        for pair in self.points.windows(2) {
            let (upper, upper_letters) = &pair[0];
            let (lower, lower_letters) = &pair[1];
            if *lower < required && required < *upper {
                let d_low = required - lower;
                let d_high = upper - required;
                if (d_low - d_high).abs() < TOLERANCE {
                    return format!("exactly between {lower_letters} and {upper_letters}");
                }
                let closer = if d_low < d_high {
                    lower_letters
                } else {
                    upper_letters
                };
                return format!("between {lower_letters} and {upper_letters}, closer to {closer}");
            }
        }

        match (self.points.first(), self.points.last()) {
            (Some((top, top_letters)), _) if required > *top => format!("at least {top_letters}"),
            (_, Some((_, bottom_letters))) => format!("at most {bottom_letters}"),
            _ => "no grades available".to_string(),
        }
    }
}
