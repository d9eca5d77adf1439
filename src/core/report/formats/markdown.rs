//! Markdown report generator
//!
//! Renders GPA summaries and forecasts as Markdown tables that read well in a
//! terminal pager or on GitHub.

use std::error::Error;
use std::fmt::Write;

use crate::core::aggregate::CategoryCounts;
use crate::core::forecast::TierOutcome;
use crate::core::report::{
    EmptySummaryContext, ForecastContext, ReportGenerator, SummaryContext,
};
use crate::core::round_to;

/// Embedded summary template
const SUMMARY_TEMPLATE: &str = include_str!("../templates/summary.md");

/// Embedded summary template for when there is no GPA yet
const EMPTY_SUMMARY_TEMPLATE: &str = include_str!("../templates/summary_empty.md");

/// Embedded forecast template
const FORECAST_TEMPLATE: &str = include_str!("../templates/forecast.md");

/// Markdown report generator
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Bulleted list of planned courses
    fn planned_list(ctx: &ForecastContext) -> String {
        let mut out = String::new();
        for course in ctx.planned {
            let name = match (course.code.is_empty(), course.title.is_empty()) {
                (true, _) => "(unnamed course)".to_string(),
                (false, true) => course.code.clone(),
                (false, false) => format!("{} {}", course.code, course.title),
            };
            let _ = writeln!(out, "- {name} ({} CUs)", course.credit_units);
        }
        if out.is_empty() {
            out.push_str("_None_\n");
        }
        out
    }

    /// One section per honours tier
    fn tier_sections(ctx: &ForecastContext) -> String {
        let mut out = String::new();
        for tier in &ctx.scenario.tiers {
            let _ = writeln!(out, "### {}: GPA ≥ {:.2}\n", tier.tier, tier.threshold);
            match &tier.outcome {
                TierOutcome::Feasible {
                    required,
                    grade_range,
                } => {
                    let _ = writeln!(out, "✅ Possible\n");
                    let _ = writeln!(
                        out,
                        "Your unit-weighted average GPA among all new courses must be at least **{required:.4}**.\n"
                    );
                    let _ = writeln!(
                        out,
                        "Your unit-weighted average grade among all new courses should be **{grade_range}**.\n"
                    );
                }
                TierOutcome::Infeasible { .. } => {
                    let _ = writeln!(
                        out,
                        "❌ Impossible to achieve with current GPA and selected courses.\n"
                    );
                }
            }
        }
        out.trim_end().to_string()
    }
}

/// Fill the unit totals and category counts shared by both summary templates
fn fill_counts(
    template: &str,
    counts: &CategoryCounts,
    counted_units: f64,
    completed_units: f64,
) -> String {
    template
        .replace("{{counted_units}}", &counted_units.to_string())
        .replace("{{completed_units}}", &completed_units.to_string())
        .replace("{{attempted}}", &counts.attempted.to_string())
        .replace("{{counted}}", &counts.counted.to_string())
        .replace(
            "{{satisfactory_unsatisfactory}}",
            &counts.satisfactory_unsatisfactory.to_string(),
        )
        .replace(
            "{{completed_or_overseas}}",
            &counts.completed_or_overseas.to_string(),
        )
        .replace("{{unresolved}}", &counts.unresolved.to_string())
}

/// Signed change, rounded to 4 d.p.
fn delta(from: f64, to: f64) -> String {
    format!("{:+.4}", round_to(to - from, 4))
}

impl ReportGenerator for MarkdownReporter {
    fn render_summary(&self, ctx: &SummaryContext) -> Result<String, Box<dyn Error>> {
        let result = ctx.result;
        let output = fill_counts(
            SUMMARY_TEMPLATE,
            &result.counts,
            result.total_counted_units,
            result.total_completed_units,
        )
        .replace("{{gpa_3dp}}", &format!("{:.3}", result.gpa_3dp))
        .replace("{{classification}}", result.classification.label())
        .replace("{{gpa_4dp}}", &format!("{:.4}", result.gpa_4dp))
        .replace("{{date}}", &ctx.date_label());
        Ok(output)
    }

    fn render_empty_summary(&self, ctx: &EmptySummaryContext) -> Result<String, Box<dyn Error>> {
        let tally = ctx.tally;
        let output = fill_counts(
            EMPTY_SUMMARY_TEMPLATE,
            &tally.counts,
            tally.counted_units,
            tally.completed_units,
        )
        .replace("{{date}}", &ctx.date_label());
        Ok(output)
    }

    fn render_forecast(&self, ctx: &ForecastContext) -> Result<String, Box<dyn Error>> {
        let s = ctx.scenario;
        let output = FORECAST_TEMPLATE
            .replace("{{current_units}}", &s.current_units.to_string())
            .replace("{{current_gpa}}", &format!("{:.4}", s.current_gpa))
            .replace("{{new_units}}", &s.new_units.to_string())
            .replace("{{total_units}}", &s.total_units.to_string())
            .replace("{{top_grade}}", &ctx.top_grade)
            .replace("{{bottom_grade}}", &ctx.bottom_grade)
            .replace("{{best_case}}", &format!("{:.4}", s.best_case_gpa))
            .replace("{{best_delta}}", &delta(s.current_gpa, s.best_case_gpa))
            .replace("{{worst_case}}", &format!("{:.4}", s.worst_case_gpa))
            .replace("{{worst_delta}}", &delta(s.current_gpa, s.worst_case_gpa))
            .replace("{{planned_courses}}", Self::planned_list(ctx).trim_end())
            .replace("{{tiers}}", &Self::tier_sections(ctx));
        Ok(output)
    }
}
