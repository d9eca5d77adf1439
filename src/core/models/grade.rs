//! Grading scale: letter grades, grade points, and honours thresholds

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::core::error::GpaError;

/// Numeric value of a letter grade, or the marker for grades outside the GPA
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GradePoint {
    /// Counts toward GPA with this many grade points
    Counted(f64),
    /// Does not enter the GPA numerator or denominator
    NonCounting,
}

impl GradePoint {
    /// The numeric value, if the grade counts toward GPA
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Counted(points) => Some(points),
            Self::NonCounting => None,
        }
    }
}

/// Reporting bucket for a grade
///
/// Every grade falls in exactly one bucket, so summary counts never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeCategory {
    /// Letter grades with grade points (A+ .. F)
    Graded,
    /// S and U
    SatisfactoryUnsatisfactory,
    /// CS, CU, OVS and OVU
    CompletedOrOverseas,
    /// EXE, IC, OVI, IP and W
    Unresolved,
}

/// One row of the grading scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    /// Letter grade as written on a transcript (e.g. "B+", "CS")
    pub letter: String,
    /// Grade points; `None` for non-counting grades
    #[serde(default)]
    pub points: Option<f64>,
    /// Human-readable meaning (e.g. "Satisfactory")
    #[serde(default)]
    pub description: String,
    /// Reporting bucket
    pub category: GradeCategory,
    /// Whether the course's units count as successfully completed
    #[serde(default = "awards_units_default")]
    pub awards_units: bool,
}

const fn awards_units_default() -> bool {
    true
}

impl GradeEntry {
    fn counted(letter: &str, points: f64) -> Self {
        Self {
            letter: letter.to_string(),
            points: Some(points),
            description: String::new(),
            category: GradeCategory::Graded,
            awards_units: true,
        }
    }

    fn non_counting(
        letter: &str,
        description: &str,
        category: GradeCategory,
        awards_units: bool,
    ) -> Self {
        Self {
            letter: letter.to_string(),
            points: None,
            description: description.to_string(),
            category,
            awards_units,
        }
    }

    /// Grade point of this entry
    #[must_use]
    pub const fn grade_point(&self) -> GradePoint {
        match self.points {
            Some(points) => GradePoint::Counted(points),
            None => GradePoint::NonCounting,
        }
    }
}

/// Degree classification, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Honours (Highest Distinction)
    HighestDistinction,
    /// Honours (Distinction)
    Distinction,
    /// Honours (Merit)
    Merit,
    /// Honours
    Honours,
    /// Pass
    Pass,
    /// Below the minimum GPA for graduation
    BelowGraduationThreshold,
}

impl Classification {
    /// Tiers with a GPA threshold, evaluated top-down
    pub const TIERS: [Self; 5] = [
        Self::HighestDistinction,
        Self::Distinction,
        Self::Merit,
        Self::Honours,
        Self::Pass,
    ];

    /// Label used in reports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighestDistinction => "Honours (Highest Distinction)",
            Self::Distinction => "Honours (Distinction)",
            Self::Merit => "Honours (Merit)",
            Self::Honours => "Honours",
            Self::Pass => "Pass",
            Self::BelowGraduationThreshold => "Below Graduation Threshold",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Minimum GPA (closed lower bound) for each classification tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HonoursThresholds {
    /// Honours (Highest Distinction)
    pub highest_distinction: f64,
    /// Honours (Distinction)
    pub distinction: f64,
    /// Honours (Merit)
    pub merit: f64,
    /// Honours
    pub honours: f64,
    /// Pass
    pub pass: f64,
}

impl Default for HonoursThresholds {
    fn default() -> Self {
        Self {
            highest_distinction: 4.50,
            distinction: 4.00,
            merit: 3.50,
            honours: 3.00,
            pass: 2.00,
        }
    }
}

impl HonoursThresholds {
    /// Threshold for a tier; `None` for [`Classification::BelowGraduationThreshold`]
    #[must_use]
    pub const fn threshold(&self, tier: Classification) -> Option<f64> {
        match tier {
            Classification::HighestDistinction => Some(self.highest_distinction),
            Classification::Distinction => Some(self.distinction),
            Classification::Merit => Some(self.merit),
            Classification::Honours => Some(self.honours),
            Classification::Pass => Some(self.pass),
            Classification::BelowGraduationThreshold => None,
        }
    }
}

/// A complete grading scale: the grade table plus honours thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingScale {
    /// Grade table in display order
    pub grades: Vec<GradeEntry>,
    /// Classification thresholds
    #[serde(default)]
    pub thresholds: HonoursThresholds,
}

impl Default for GradingScale {
    fn default() -> Self {
        Self::nus()
    }
}

impl GradingScale {
    /// The NUS 5-point scale: 11 letter grades and 11 non-counting grades
    #[must_use]
    pub fn nus() -> Self {
        use GradeCategory::{CompletedOrOverseas, SatisfactoryUnsatisfactory, Unresolved};

        let grades = vec![
            GradeEntry::counted("A+", 5.0),
            GradeEntry::counted("A", 5.0),
            GradeEntry::counted("A-", 4.5),
            GradeEntry::counted("B+", 4.0),
            GradeEntry::counted("B", 3.5),
            GradeEntry::counted("B-", 3.0),
            GradeEntry::counted("C+", 2.5),
            GradeEntry::counted("C", 2.0),
            GradeEntry::counted("D+", 1.5),
            GradeEntry::counted("D", 1.0),
            GradeEntry::counted("F", 0.0),
            GradeEntry::non_counting("S", "Satisfactory", SatisfactoryUnsatisfactory, true),
            GradeEntry::non_counting("U", "Unsatisfactory", SatisfactoryUnsatisfactory, false),
            GradeEntry::non_counting("CS", "Completed Satisfactorily", CompletedOrOverseas, true),
            GradeEntry::non_counting("CU", "Completed Unsatisfactorily", CompletedOrOverseas, false),
            GradeEntry::non_counting("OVS", "Overseas Satisfactory", CompletedOrOverseas, true),
            GradeEntry::non_counting("OVU", "Overseas Unsatisfactory", CompletedOrOverseas, false),
            GradeEntry::non_counting("OVI", "Overseas Incomplete", Unresolved, false),
            GradeEntry::non_counting("EXE", "Exempted", Unresolved, true),
            GradeEntry::non_counting("IC", "Incomplete", Unresolved, false),
            GradeEntry::non_counting("IP", "In Progress", Unresolved, false),
            GradeEntry::non_counting("W", "Withdrawn", Unresolved, false),
        ];

        Self {
            grades,
            thresholds: HonoursThresholds::default(),
        }
    }

    /// Parse and validate a scale from TOML (`[[grades]]` tables plus `[thresholds]`)
    ///
    /// # Errors
    /// Returns an error if the TOML does not parse or the scale is inconsistent
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let scale: Self = toml::from_str(toml_str)?;
        scale.validate()?;
        Ok(scale)
    }

    /// Read a scale file, see [`from_toml`](Self::from_toml)
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the scale is invalid
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read grading scale {}: {e}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Check internal consistency of the scale
    ///
    /// # Errors
    /// Returns a message naming the first problem found
    pub fn validate(&self) -> Result<(), String> {
        let mut seen: Vec<String> = Vec::with_capacity(self.grades.len());
        for entry in &self.grades {
            let key = normalize_letter(&entry.letter);
            if key.is_empty() {
                return Err("Grade letter must not be empty".to_string());
            }
            if seen.contains(&key) {
                return Err(format!("Duplicate grade letter: '{}'", entry.letter));
            }
            seen.push(key);

            match (entry.points, entry.category) {
                (Some(points), GradeCategory::Graded) => {
                    if !points.is_finite() || points < 0.0 {
                        return Err(format!(
                            "Grade '{}' has invalid grade points: {points}",
                            entry.letter
                        ));
                    }
                }
                (Some(_), _) => {
                    return Err(format!(
                        "Grade '{}' has grade points but is not in the graded category",
                        entry.letter
                    ));
                }
                (None, GradeCategory::Graded) => {
                    return Err(format!(
                        "Graded grade '{}' is missing grade points",
                        entry.letter
                    ));
                }
                (None, _) => {}
            }
        }

        if self.max_points().is_none() {
            return Err("Grading scale has no grades that count toward GPA".to_string());
        }

        let tiers: Vec<f64> = Classification::TIERS
            .iter()
            .filter_map(|tier| self.thresholds.threshold(*tier))
            .collect();
        if tiers.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err("Honours thresholds must be strictly descending".to_string());
        }

        Ok(())
    }

    /// Number of grades in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.grades.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }

    /// Look up a grade entry (letters are matched case-insensitively)
    ///
    /// # Errors
    /// Returns [`GpaError::UnknownGrade`] if the letter is not in the table
    pub fn entry(&self, letter: &str) -> Result<&GradeEntry, GpaError> {
        let key = normalize_letter(letter);
        self.grades
            .iter()
            .find(|entry| normalize_letter(&entry.letter) == key)
            .ok_or_else(|| GpaError::UnknownGrade(letter.trim().to_string()))
    }

    /// Grade point for a letter grade
    ///
    /// # Errors
    /// Returns [`GpaError::UnknownGrade`] if the letter is not in the table
    pub fn grade_point(&self, letter: &str) -> Result<GradePoint, GpaError> {
        self.entry(letter).map(GradeEntry::grade_point)
    }

    /// Grades that count toward GPA
    pub fn counted(&self) -> impl Iterator<Item = &GradeEntry> {
        self.grades.iter().filter(|entry| entry.points.is_some())
    }

    /// Grades that do not count toward GPA
    pub fn non_counting(&self) -> impl Iterator<Item = &GradeEntry> {
        self.grades.iter().filter(|entry| entry.points.is_none())
    }

    /// Highest grade point on the scale
    #[must_use]
    pub fn max_points(&self) -> Option<f64> {
        self.counted().filter_map(|e| e.points).reduce(f64::max)
    }

    /// Lowest grade point on the scale
    #[must_use]
    pub fn min_points(&self) -> Option<f64> {
        self.counted().filter_map(|e| e.points).reduce(f64::min)
    }

    /// Distinct grade points, highest first, each with the letters that earn it
    ///
    /// Letters sharing a point value are joined with `/` in table order (5.0 maps
    /// to "A+/A" on the NUS scale).
    #[must_use]
    pub fn letters_for_points(&self) -> Vec<(f64, String)> {
        let mut points: Vec<(f64, Vec<&str>)> = Vec::new();
        for entry in self.counted() {
            let Some(value) = entry.points else { continue };
            match points.iter_mut().find(|(p, _)| (*p - value).abs() < f64::EPSILON) {
                Some((_, letters)) => letters.push(entry.letter.as_str()),
                None => points.push((value, vec![entry.letter.as_str()])),
            }
        }
        points.sort_by(|a, b| b.0.total_cmp(&a.0));
        points
            .into_iter()
            .map(|(value, letters)| (value, letters.join("/")))
            .collect()
    }

    /// Classify a GPA already rounded to 3 decimal places
    #[must_use]
    pub fn classify(&self, gpa_3dp: f64) -> Classification {
        Classification::TIERS
            .into_iter()
            .find(|tier| {
                self.thresholds
                    .threshold(*tier)
                    .is_some_and(|threshold| gpa_3dp >= threshold)
            })
            .unwrap_or(Classification::BelowGraduationThreshold)
    }
}

fn normalize_letter(letter: &str) -> String {
    letter.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nus_scale_has_22_grades() {
        let scale = GradingScale::nus();
        assert_eq!(scale.len(), 22);
        assert_eq!(scale.counted().count(), 11);
        assert_eq!(scale.non_counting().count(), 11);
        assert!(scale.validate().is_ok());
    }

    #[test]
    fn looks_up_grade_points() {
        let scale = GradingScale::nus();
        assert_eq!(scale.grade_point("A+"), Ok(GradePoint::Counted(5.0)));
        assert_eq!(scale.grade_point("b-"), Ok(GradePoint::Counted(3.0)));
        assert_eq!(scale.grade_point("F"), Ok(GradePoint::Counted(0.0)));
        assert_eq!(scale.grade_point("S"), Ok(GradePoint::NonCounting));
        assert_eq!(scale.grade_point(" ip "), Ok(GradePoint::NonCounting));
    }

    #[test]
    fn unknown_grade_is_rejected() {
        let scale = GradingScale::nus();
        assert_eq!(
            scale.grade_point("E"),
            Err(GpaError::UnknownGrade("E".to_string()))
        );
    }

    #[test]
    fn reverse_table_joins_shared_points() {
        let reverse = GradingScale::nus().letters_for_points();
        assert_eq!(reverse.len(), 10);
        assert_eq!(reverse[0], (5.0, "A+/A".to_string()));
        assert_eq!(reverse[5], (2.5, "C+".to_string()));
        assert_eq!(reverse[9], (0.0, "F".to_string()));
    }

    #[test]
    fn classification_boundaries_are_closed_below() {
        let scale = GradingScale::nus();
        assert_eq!(scale.classify(4.5), Classification::HighestDistinction);
        assert_eq!(scale.classify(4.499), Classification::Distinction);
        assert_eq!(scale.classify(3.5), Classification::Merit);
        assert_eq!(scale.classify(3.499), Classification::Honours);
        assert_eq!(scale.classify(2.0), Classification::Pass);
        assert_eq!(scale.classify(1.999), Classification::BelowGraduationThreshold);
    }

    #[test]
    fn completion_flags_match_nus_policy() {
        let scale = GradingScale::nus();
        let no_units: Vec<&str> = scale
            .grades
            .iter()
            .filter(|e| !e.awards_units)
            .map(|e| e.letter.as_str())
            .collect();
        assert_eq!(no_units, vec!["U", "CU", "OVU", "OVI", "IC", "IP", "W"]);
    }

    #[test]
    fn parses_substitute_scale_from_toml() {
        let toml_str = r#"
[[grades]]
letter = "A"
points = 4.0
category = "graded"

[[grades]]
letter = "B"
points = 3.0
category = "graded"

[[grades]]
letter = "P"
description = "Pass"
category = "satisfactory_unsatisfactory"

[thresholds]
highest_distinction = 3.8
distinction = 3.5
merit = 3.2
honours = 3.0
pass = 2.0
"#;
        let scale = GradingScale::from_toml(toml_str).expect("valid scale");
        assert_eq!(scale.len(), 3);
        assert_eq!(scale.max_points(), Some(4.0));
        assert_eq!(scale.min_points(), Some(3.0));
        assert!(scale.entry("P").expect("P exists").awards_units);
        assert_eq!(scale.classify(3.6), Classification::Distinction);
    }

    #[test]
    fn rejects_inconsistent_scales() {
        let duplicate = r#"
[[grades]]
letter = "A"
points = 4.0
category = "graded"

[[grades]]
letter = "a"
points = 3.0
category = "graded"
"#;
        assert!(GradingScale::from_toml(duplicate).is_err());

        let no_counted = r#"
[[grades]]
letter = "S"
category = "satisfactory_unsatisfactory"
"#;
        assert!(GradingScale::from_toml(no_counted).is_err());

        let mut scale = GradingScale::nus();
        scale.thresholds.merit = 4.2;
        assert!(scale.validate().is_err());
    }
}
