//! Report generation for GPA summaries and forecasts
//!
//! Reports render the values computed by the aggregator and the forecast solver;
//! they never compute anything themselves.

pub mod formats;

use chrono::NaiveDate;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::core::aggregate::{AggregateResult, Tally};
use crate::core::forecast::ForecastScenario;
use crate::core::grade_range::GradeRangeTranslator;
use crate::core::models::PlannedCourse;

pub use formats::{JsonReporter, MarkdownReporter, ReportFormat};

/// Data needed to render a GPA summary
#[derive(Debug, Clone, Copy)]
pub struct SummaryContext<'a> {
    /// Aggregation result
    pub result: &'a AggregateResult,
    /// Date printed as "Date of Overview"
    pub generated_on: NaiveDate,
}

impl<'a> SummaryContext<'a> {
    /// Create a summary context
    #[must_use]
    pub const fn new(result: &'a AggregateResult, generated_on: NaiveDate) -> Self {
        Self {
            result,
            generated_on,
        }
    }

    /// Date in the "16 Oct 2026" style
    #[must_use]
    pub fn date_label(&self) -> String {
        self.generated_on.format("%d %b %Y").to_string()
    }
}

/// Data needed to render a summary when no course counts toward GPA
#[derive(Debug, Clone, Copy)]
pub struct EmptySummaryContext<'a> {
    /// Unit totals and category counts
    pub tally: &'a Tally,
    /// Date printed as "Date of Overview"
    pub generated_on: NaiveDate,
}

impl<'a> EmptySummaryContext<'a> {
    /// Create an empty-summary context
    #[must_use]
    pub const fn new(tally: &'a Tally, generated_on: NaiveDate) -> Self {
        Self {
            tally,
            generated_on,
        }
    }

    /// Date in the "16 Oct 2026" style
    #[must_use]
    pub fn date_label(&self) -> String {
        self.generated_on.format("%d %b %Y").to_string()
    }
}

/// Data needed to render a forecast
#[derive(Debug, Clone)]
pub struct ForecastContext<'a> {
    /// Solver output
    pub scenario: &'a ForecastScenario,
    /// Courses the forecast was run for
    pub planned: &'a [PlannedCourse],
    /// Letters of the top grade point (best case)
    pub top_grade: String,
    /// Letters of the bottom grade point (worst case)
    pub bottom_grade: String,
}

impl<'a> ForecastContext<'a> {
    /// Create a forecast context, taking best/worst grade labels from `translator`
    #[must_use]
    pub fn new(
        scenario: &'a ForecastScenario,
        planned: &'a [PlannedCourse],
        translator: &GradeRangeTranslator,
    ) -> Self {
        let points = translator.points();
        Self {
            scenario,
            planned,
            top_grade: points.first().map(|(_, l)| l.clone()).unwrap_or_default(),
            bottom_grade: points.last().map(|(_, l)| l.clone()).unwrap_or_default(),
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a GPA summary
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render_summary(&self, ctx: &SummaryContext) -> Result<String, Box<dyn Error>>;

    /// Render a summary that has counts and unit totals but no GPA
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render_empty_summary(&self, ctx: &EmptySummaryContext) -> Result<String, Box<dyn Error>>;

    /// Render a forecast
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render_forecast(&self, ctx: &ForecastContext) -> Result<String, Box<dyn Error>>;
}

/// Write rendered report content to `path`, creating parent directories
///
/// # Errors
/// Returns an error if the directory or file cannot be written
pub fn write_report(content: &str, path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    crate::info!("Report written to {}", path.display());
    Ok(())
}
