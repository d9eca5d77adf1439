//! Forecast the grades needed on planned courses to reach each honours tier

use serde::Serialize;

use crate::core::grade_range::GradeRangeTranslator;
use crate::core::models::{Classification, GradingScale, PlannedCourse};
use crate::core::{round_to, GpaError};

/// Slack on the feasibility bounds; a requirement of exactly the top or bottom
/// grade point can land a few ulps outside them.
const FEASIBILITY_TOLERANCE: f64 = 1e-9;

/// Whether a tier can still be reached with the planned courses
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TierOutcome {
    /// Reachable with this unit-weighted average on the new courses
    Feasible {
        /// Minimum average grade point on the new courses, rounded to 4 d.p.
        required: f64,
        /// Letter-grade description of `required`
        grade_range: String,
    },
    /// The required average lies outside the grade-point range
    Infeasible {
        /// The unrounded required average that fell out of range
        required: f64,
    },
}

impl TierOutcome {
    /// Whether the tier is reachable
    #[must_use]
    pub const fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible { .. })
    }
}

/// Requirement for one honours tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierRequirement {
    /// The tier
    pub tier: Classification,
    /// Minimum GPA for the tier
    pub threshold: f64,
    /// Feasibility and the required average
    pub outcome: TierOutcome,
}

/// Outcome of a forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastScenario {
    /// Baseline GPA
    pub current_gpa: f64,
    /// Credit units behind the baseline GPA
    pub current_units: f64,
    /// Credit units of the planned courses
    pub new_units: f64,
    /// `current_units + new_units`
    pub total_units: f64,
    /// GPA if every new course earns the top grade
    pub best_case_gpa: f64,
    /// GPA if every new course earns the lowest grade
    pub worst_case_gpa: f64,
    /// One entry per honours tier, highest first
    pub tiers: Vec<TierRequirement>,
}

/// Solves the weighted-average equation for each honours tier
///
/// The average grade on the new courses is the only free variable once the
/// baseline and the target are fixed, so each tier is a single linear solve.
#[derive(Debug, Clone)]
pub struct ForecastSolver<'a> {
    scale: &'a GradingScale,
    translator: GradeRangeTranslator,
    min_points: f64,
    max_points: f64,
}

impl<'a> ForecastSolver<'a> {
    /// Create a solver for `scale`
    #[must_use]
    pub fn new(scale: &'a GradingScale) -> Self {
        Self {
            scale,
            translator: GradeRangeTranslator::new(scale),
            min_points: scale.min_points().unwrap_or(0.0),
            max_points: scale.max_points().unwrap_or(0.0),
        }
    }

    /// The translator used to describe required averages
    #[must_use]
    pub const fn translator(&self) -> &GradeRangeTranslator {
        &self.translator
    }

    /// GPA after the new courses if all of them earn `grade_point`, rounded to 4 d.p.
    ///
    /// Returns 0 when there are no units at all.
    #[must_use]
    pub fn scenario_gpa(
        current_gpa: f64,
        current_units: f64,
        new_units: f64,
        grade_point: f64,
    ) -> f64 {
        let total_units = current_units + new_units;
        if total_units > 0.0 {
            round_to(
                current_gpa.mul_add(current_units, grade_point * new_units) / total_units,
                4,
            )
        } else {
            0.0
        }
    }

    /// Average grade point the new courses need for the overall GPA to reach `target`
    ///
    /// # Errors
    /// Returns [`GpaError::ZeroNewUnits`] when `new_units` is not positive
    pub fn required_average(
        target: f64,
        current_gpa: f64,
        current_units: f64,
        new_units: f64,
    ) -> Result<f64, GpaError> {
        if new_units <= 0.0 {
            return Err(GpaError::ZeroNewUnits);
        }
        let total_units = current_units + new_units;
        #[allow(clippy::suboptimal_flops)]
        let required = (target * total_units - current_gpa * current_units) / new_units;
        Ok(required)
    }

    /// Forecast best/worst cases and per-tier requirements
    ///
    /// # Errors
    /// - [`GpaError::InvalidInput`] if the baseline GPA is outside the scale, a
    ///   unit count is negative, or any value is not finite
    /// - [`GpaError::ZeroNewUnits`] if the planned courses carry no units
    pub fn forecast(
        &self,
        current_gpa: f64,
        current_units: f64,
        planned: &[PlannedCourse],
    ) -> Result<ForecastScenario, GpaError> {
        if !current_gpa.is_finite() || current_gpa < 0.0 || current_gpa > self.max_points {
            return Err(GpaError::InvalidInput(format!(
                "current GPA {current_gpa} is outside 0..={}",
                self.max_points
            )));
        }
        if !current_units.is_finite() || current_units < 0.0 {
            return Err(GpaError::InvalidInput(format!(
                "current credit units {current_units} must be non-negative"
            )));
        }
        if let Some(course) = planned
            .iter()
            .find(|c| !c.credit_units.is_finite() || c.credit_units < 0.0)
        {
            return Err(GpaError::InvalidInput(format!(
                "planned course '{}' has invalid credit units {}",
                course.code, course.credit_units
            )));
        }

        let new_units: f64 = planned.iter().map(|c| c.credit_units).sum();
        if new_units <= 0.0 {
            return Err(GpaError::ZeroNewUnits);
        }
        let total_units = current_units + new_units;

        let best_case_gpa =
            Self::scenario_gpa(current_gpa, current_units, new_units, self.max_points);
        let worst_case_gpa =
            Self::scenario_gpa(current_gpa, current_units, new_units, self.min_points);

        let mut tiers = Vec::with_capacity(Classification::TIERS.len());
        for tier in Classification::TIERS {
            let Some(threshold) = self.scale.thresholds.threshold(tier) else {
                continue;
            };
            let required =
                Self::required_average(threshold, current_gpa, current_units, new_units)?;
            let feasible_range = (self.min_points - FEASIBILITY_TOLERANCE)
                ..=(self.max_points + FEASIBILITY_TOLERANCE);
            let outcome = if feasible_range.contains(&required) {
                // adding 0.0 turns -0.0 into 0.0
                let rounded =
                    round_to(required, 4).clamp(self.min_points, self.max_points) + 0.0;
                TierOutcome::Feasible {
                    required: rounded,
                    grade_range: self.translator.describe(rounded),
                }
            } else {
                TierOutcome::Infeasible { required }
            };
            crate::debug!("Tier {tier} (>= {threshold}): required average {required:.4}");
            tiers.push(TierRequirement {
                tier,
                threshold,
                outcome,
            });
        }

        Ok(ForecastScenario {
            current_gpa,
            current_units,
            new_units,
            total_units,
            best_case_gpa,
            worst_case_gpa,
            tiers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome_for(scenario: &ForecastScenario, tier: Classification) -> &TierOutcome {
        &scenario
            .tiers
            .iter()
            .find(|t| t.tier == tier)
            .expect("tier present")
            .outcome
    }

    #[test]
    fn highest_distinction_out_of_reach() {
        let scale = GradingScale::nus();
        let solver = ForecastSolver::new(&scale);
        let scenario = solver
            .forecast(4.0, 60.0, &[PlannedCourse::units_only(4.0)])
            .expect("forecast");

        // (4.5 * 64 - 4.0 * 60) / 4 = 12.0
        match outcome_for(&scenario, Classification::HighestDistinction) {
            TierOutcome::Infeasible { required } => assert!((required - 12.0).abs() < 1e-9),
            other => panic!("expected infeasible, got {other:?}"),
        }
        assert!((scenario.total_units - 64.0).abs() < 1e-12);
    }

    #[test]
    fn merit_infeasible_honours_exact() {
        let scale = GradingScale::nus();
        let solver = ForecastSolver::new(&scale);
        let planned = vec![PlannedCourse::units_only(2.0), PlannedCourse::units_only(2.0)];
        let scenario = solver.forecast(3.0, 20.0, &planned).expect("forecast");

        // (3.5 * 24 - 60) / 4 = 6.0
        assert!(!outcome_for(&scenario, Classification::Merit).is_feasible());

        // (3.0 * 24 - 60) / 4 = 3.0
        assert_eq!(
            outcome_for(&scenario, Classification::Honours),
            &TierOutcome::Feasible {
                required: 3.0,
                grade_range: "exactly B-".to_string(),
            }
        );

        // (2.0 * 24 - 60) / 4 = -3.0
        assert!(!outcome_for(&scenario, Classification::Pass).is_feasible());
    }

    #[test]
    fn best_case_not_below_worst_case() {
        let scale = GradingScale::nus();
        let solver = ForecastSolver::new(&scale);
        for (gpa, units) in [(0.0, 0.0), (2.75, 40.0), (5.0, 120.0), (3.9, 8.0)] {
            let scenario = solver
                .forecast(gpa, units, &[PlannedCourse::units_only(4.0)])
                .expect("forecast");
            assert!(scenario.best_case_gpa >= scenario.worst_case_gpa);
        }
    }

    #[test]
    fn fresh_student_needs_the_threshold_itself() {
        let scale = GradingScale::nus();
        let solver = ForecastSolver::new(&scale);
        let scenario = solver
            .forecast(0.0, 0.0, &[PlannedCourse::units_only(20.0)])
            .expect("forecast");

        assert!((scenario.best_case_gpa - 5.0).abs() < 1e-12);
        assert!(scenario.worst_case_gpa.abs() < 1e-12);
        assert!(scenario.tiers.iter().all(|t| t.outcome.is_feasible()));
        assert_eq!(
            outcome_for(&scenario, Classification::Merit),
            &TierOutcome::Feasible {
                required: 3.5,
                grade_range: "exactly B".to_string(),
            }
        );
    }

    #[test]
    fn feasible_requirement_round_trips() {
        let scale = GradingScale::nus();
        let solver = ForecastSolver::new(&scale);
        let (gpa, units, new_units) = (3.8123, 97.0, 23.0);
        let planned = vec![PlannedCourse::units_only(new_units)];
        let scenario = solver.forecast(gpa, units, &planned).expect("forecast");

        for tier in &scenario.tiers {
            if let TierOutcome::Feasible { required, .. } = tier.outcome {
                let reached = ForecastSolver::scenario_gpa(gpa, units, new_units, required);
                assert!(
                    (reached - tier.threshold).abs() < 1e-3,
                    "{} reached {reached}",
                    tier.tier
                );
            }
        }
    }

    #[test]
    fn order_of_planned_courses_does_not_matter() {
        let scale = GradingScale::nus();
        let solver = ForecastSolver::new(&scale);
        let a = vec![PlannedCourse::units_only(4.0), PlannedCourse::units_only(2.0)];
        let b = vec![PlannedCourse::units_only(2.0), PlannedCourse::units_only(4.0)];
        assert_eq!(
            solver.forecast(3.3, 50.0, &a).expect("forecast a"),
            solver.forecast(3.3, 50.0, &b).expect("forecast b")
        );
    }

    #[test]
    fn rejects_empty_basket_and_bad_baseline() {
        let scale = GradingScale::nus();
        let solver = ForecastSolver::new(&scale);
        assert_eq!(solver.forecast(3.0, 20.0, &[]), Err(GpaError::ZeroNewUnits));
        assert_eq!(
            solver.forecast(3.0, 20.0, &[PlannedCourse::units_only(0.0)]),
            Err(GpaError::ZeroNewUnits)
        );
        assert!(matches!(
            solver.forecast(5.5, 20.0, &[PlannedCourse::units_only(4.0)]),
            Err(GpaError::InvalidInput(_))
        ));
        assert!(matches!(
            solver.forecast(3.0, -1.0, &[PlannedCourse::units_only(4.0)]),
            Err(GpaError::InvalidInput(_))
        ));
        assert_eq!(
            ForecastSolver::required_average(3.0, 3.0, 20.0, 0.0),
            Err(GpaError::ZeroNewUnits)
        );
    }

    #[test]
    fn requirement_of_exactly_the_top_grade_is_feasible() {
        let scale = GradingScale::nus();
        let solver = ForecastSolver::new(&scale);

        // (4.0 * 12 - 3.8 * 10) / 2 = 5.0
        let scenario = solver
            .forecast(3.8, 10.0, &[PlannedCourse::units_only(2.0)])
            .expect("forecast");
        assert_eq!(
            outcome_for(&scenario, Classification::Distinction),
            &TierOutcome::Feasible {
                required: 5.0,
                grade_range: "exactly A+/A".to_string(),
            }
        );

        // (2.0 * 62 - 1.9 * 60) / 2 = 5.0
        let scenario = solver
            .forecast(1.9, 60.0, &[PlannedCourse::units_only(2.0)])
            .expect("forecast");
        assert_eq!(
            outcome_for(&scenario, Classification::Pass),
            &TierOutcome::Feasible {
                required: 5.0,
                grade_range: "exactly A+/A".to_string(),
            }
        );
    }

    #[test]
    fn requirement_of_exactly_the_bottom_grade_is_feasible() {
        let scale = GradingScale::nus();
        let solver = ForecastSolver::new(&scale);

        // (2.0 * 102 - 2.04 * 100) / 2 = 0.0
        let scenario = solver
            .forecast(2.04, 100.0, &[PlannedCourse::units_only(2.0)])
            .expect("forecast");
        match outcome_for(&scenario, Classification::Pass) {
            TierOutcome::Feasible {
                required,
                grade_range,
            } => {
                assert!(required.abs() < f64::EPSILON);
                assert!(required.is_sign_positive());
                assert_eq!(grade_range, "exactly F");
            }
            other => panic!("expected feasible, got {other:?}"),
        }
    }

    #[test]
    fn required_average_matches_the_plain_formula() {
        let cases = [
            (4.0, 3.8, 10.0, 2.0),
            (2.0, 1.9, 60.0, 2.0),
            (2.0, 2.04, 100.0, 2.0),
            (3.5, 3.0, 20.0, 4.0),
        ];
        for (target, gpa, units, new_units) in cases {
            let expected = (target * (units + new_units) - gpa * units) / new_units;
            let got = ForecastSolver::required_average(target, gpa, units, new_units)
                .expect("positive new units");
            assert!((got - expected).abs() < 1e-12, "{target} {gpa} {units}");
        }
    }

    #[test]
    fn scenario_gpa_with_no_units_is_zero() {
        assert!(ForecastSolver::scenario_gpa(4.2, 0.0, 0.0, 5.0).abs() < f64::EPSILON);
    }
}
