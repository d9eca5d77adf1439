//! GPA aggregation over completed course records

use serde::Serialize;

use crate::core::models::{Classification, CourseRecord, GradeCategory, GradingScale};
use crate::core::{round_to, GpaError};

/// Per-category course counts over the whole record set
///
/// `attempted == counted + satisfactory_unsatisfactory + completed_or_overseas + unresolved`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    /// Graded courses (planned courses excluded)
    pub attempted: usize,
    /// Courses whose grade counts toward GPA
    pub counted: usize,
    /// S/U courses
    pub satisfactory_unsatisfactory: usize,
    /// CS/CU/OVS/OVU courses
    pub completed_or_overseas: usize,
    /// EXE/IC/OVI/IP/W courses
    pub unresolved: usize,
}

/// Unit totals and counts, defined even when the GPA is not
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Tally {
    /// Course counts per category
    pub counts: CategoryCounts,
    /// Credit units of courses that count toward GPA
    pub counted_units: f64,
    /// Credit units completed successfully
    pub completed_units: f64,
    /// Σ credit units × grade points over counted courses
    pub weighted_points: f64,
}

/// Summary of a record collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Unrounded GPA
    pub gpa: f64,
    /// GPA rounded to 3 d.p.; used for classification
    pub gpa_3dp: f64,
    /// GPA rounded to 4 d.p. from the unrounded value; used for display
    pub gpa_4dp: f64,
    /// Degree classification from `gpa_3dp`
    pub classification: Classification,
    /// Credit units used to calculate the GPA
    pub total_counted_units: f64,
    /// Credit units completed successfully
    pub total_completed_units: f64,
    /// Course counts per category
    pub counts: CategoryCounts,
}

/// Reduces course records into a GPA and classification under a grading scale
#[derive(Debug, Clone, Copy)]
pub struct GpaAggregator<'a> {
    scale: &'a GradingScale,
}

impl<'a> GpaAggregator<'a> {
    /// Create an aggregator for `scale`
    #[must_use]
    pub const fn new(scale: &'a GradingScale) -> Self {
        Self { scale }
    }

    /// Count courses and sum units per category
    ///
    /// Planned (ungraded) records are skipped.
    ///
    /// # Errors
    /// Returns [`GpaError::UnknownGrade`] for the first record whose grade is not
    /// on the scale; the whole input is rejected.
    pub fn tally(&self, records: &[CourseRecord]) -> Result<Tally, GpaError> {
        let mut tally = Tally::default();

        for record in records {
            let Some(letter) = record.grade.as_deref() else {
                continue;
            };
            let entry = self.scale.entry(letter)?;

            tally.counts.attempted += 1;
            match entry.category {
                GradeCategory::Graded => tally.counts.counted += 1,
                GradeCategory::SatisfactoryUnsatisfactory => {
                    tally.counts.satisfactory_unsatisfactory += 1;
                }
                GradeCategory::CompletedOrOverseas => tally.counts.completed_or_overseas += 1,
                GradeCategory::Unresolved => tally.counts.unresolved += 1,
            }

            if let Some(points) = entry.points {
                tally.counted_units += record.credit_units;
                tally.weighted_points += record.credit_units * points;
            }
            if entry.awards_units {
                tally.completed_units += record.credit_units;
            }
        }

        Ok(tally)
    }

    /// Compute GPA, classification, unit totals and category counts
    ///
    /// `gpa = Σ(cu × gp) / Σ cu` over records with a GPA-counting grade. The
    /// 3 d.p. and 4 d.p. figures are both rounded from the unrounded GPA.
    ///
    /// # Errors
    /// - [`GpaError::UnknownGrade`] if any grade is not on the scale
    /// - [`GpaError::EmptyCountedSet`] if no record (or only zero-unit records)
    ///   count toward GPA
    pub fn aggregate(&self, records: &[CourseRecord]) -> Result<AggregateResult, GpaError> {
        let tally = self.tally(records)?;

        if tally.counts.counted == 0 || tally.counted_units <= 0.0 {
            return Err(GpaError::EmptyCountedSet);
        }

        let gpa = tally.weighted_points / tally.counted_units;
        let gpa_3dp = round_to(gpa, 3);
        let gpa_4dp = round_to(gpa, 4);
        let classification = self.scale.classify(gpa_3dp);

        crate::debug!(
            "Aggregated {} records: gpa={gpa:.6} over {} units ({classification})",
            records.len(),
            tally.counted_units
        );

        Ok(AggregateResult {
            gpa,
            gpa_3dp,
            gpa_4dp,
            classification,
            total_counted_units: tally.counted_units,
            total_completed_units: tally.completed_units,
            counts: tally.counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(code: &str, units: f64, grade: &str) -> CourseRecord {
        CourseRecord::completed(code, "Course", units, grade, "2024/2025")
    }

    #[test]
    fn weighted_average_over_counted_courses() {
        let scale = GradingScale::nus();
        let records = vec![
            graded("CS1101S", 4.0, "A"),
            graded("MA1521", 4.0, "B"),
            graded("GEA1000", 2.0, "C"),
        ];

        let result = GpaAggregator::new(&scale)
            .aggregate(&records)
            .expect("aggregate");

        // (4*5.0 + 4*3.5 + 2*2.0) / 10 = 3.8
        assert!((result.gpa - 3.8).abs() < 1e-12);
        assert!((result.gpa_3dp - 3.8).abs() < 1e-12);
        assert_eq!(result.classification, Classification::Merit);
        assert!((result.total_counted_units - 10.0).abs() < 1e-12);
        assert_eq!(result.counts.counted, 3);
    }

    #[test]
    fn non_counting_grades_leave_gpa_unchanged() {
        let scale = GradingScale::nus();
        let aggregator = GpaAggregator::new(&scale);
        let base = vec![graded("CS2030S", 4.0, "A-"), graded("CS2040S", 4.0, "B+")];
        let before = aggregator.aggregate(&base).expect("aggregate");

        let mut with_su = base;
        with_su.push(graded("GEC1000", 4.0, "S"));
        let after = aggregator.aggregate(&with_su).expect("aggregate");

        assert!((before.gpa - after.gpa).abs() < f64::EPSILON);
        assert!((after.total_completed_units - before.total_completed_units - 4.0).abs() < 1e-12);
        assert!((after.total_counted_units - before.total_counted_units).abs() < 1e-12);
    }

    #[test]
    fn rounding_is_independent() {
        let scale = GradingScale::nus();
        // (3.5 * 99932 + 3.0 * 68) / 100000 = 3.49966
        let records = vec![graded("X1", 99_932.0, "B"), graded("X2", 68.0, "B-")];

        let result = GpaAggregator::new(&scale)
            .aggregate(&records)
            .expect("aggregate");

        assert!((result.gpa_3dp - 3.5).abs() < 1e-12);
        assert!((result.gpa_4dp - 3.4997).abs() < 1e-12);
        assert_eq!(result.classification, Classification::Merit);
    }

    #[test]
    fn empty_input_has_no_gpa() {
        let scale = GradingScale::nus();
        let aggregator = GpaAggregator::new(&scale);
        assert_eq!(aggregator.aggregate(&[]), Err(GpaError::EmptyCountedSet));

        let only_su = vec![graded("GEC1000", 4.0, "S"), graded("GEN2000", 2.0, "U")];
        assert_eq!(aggregator.aggregate(&only_su), Err(GpaError::EmptyCountedSet));

        let tally = aggregator.tally(&only_su).expect("tally");
        assert_eq!(tally.counts.satisfactory_unsatisfactory, 2);
        assert!((tally.completed_units - 4.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_grade_rejects_input() {
        let scale = GradingScale::nus();
        let records = vec![graded("CS1010", 4.0, "A"), graded("CS1231", 4.0, "Z")];
        assert_eq!(
            GpaAggregator::new(&scale).aggregate(&records),
            Err(GpaError::UnknownGrade("Z".to_string()))
        );
    }

    #[test]
    fn categories_partition_the_records() {
        let scale = GradingScale::nus();
        let records = vec![
            graded("A1", 4.0, "A"),
            graded("A2", 4.0, "F"),
            graded("B1", 4.0, "S"),
            graded("B2", 4.0, "U"),
            graded("C1", 4.0, "CS"),
            graded("C2", 4.0, "CU"),
            graded("C3", 4.0, "OVS"),
            graded("C4", 4.0, "OVU"),
            graded("D1", 4.0, "EXE"),
            graded("D2", 4.0, "IC"),
            graded("D3", 4.0, "OVI"),
            graded("D4", 4.0, "IP"),
            graded("D5", 4.0, "W"),
            CourseRecord::planned("P1", "Planned", 4.0, "2025/2026"),
        ];

        let result = GpaAggregator::new(&scale)
            .aggregate(&records)
            .expect("aggregate");
        let counts = result.counts;

        assert_eq!(counts.attempted, 13);
        assert_eq!(counts.counted, 2);
        assert_eq!(counts.satisfactory_unsatisfactory, 2);
        assert_eq!(counts.completed_or_overseas, 4);
        assert_eq!(counts.unresolved, 5);
        assert_eq!(
            counts.attempted,
            counts.counted
                + counts.satisfactory_unsatisfactory
                + counts.completed_or_overseas
                + counts.unresolved
        );

        // A, F, S, CS, OVS, EXE award units: 6 courses * 4 units
        assert!((result.total_completed_units - 24.0).abs() < 1e-12);
        assert!((result.gpa - 2.5).abs() < 1e-12);
        assert_eq!(result.classification, Classification::Pass);
    }
}
