//! JSON report generator

use serde_json::json;
use std::error::Error;

use crate::core::report::{
    EmptySummaryContext, ForecastContext, ReportGenerator, SummaryContext,
};

/// JSON report generator
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for JsonReporter {
    fn render_summary(&self, ctx: &SummaryContext) -> Result<String, Box<dyn Error>> {
        let value = json!({
            "summary": ctx.result,
            "date_of_overview": ctx.generated_on,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn render_empty_summary(&self, ctx: &EmptySummaryContext) -> Result<String, Box<dyn Error>> {
        let value = json!({
            "summary": null,
            "tally": ctx.tally,
            "date_of_overview": ctx.generated_on,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn render_forecast(&self, ctx: &ForecastContext) -> Result<String, Box<dyn Error>> {
        let value = json!({
            "forecast": ctx.scenario,
            "planned_courses": ctx.planned,
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate::GpaAggregator;
    use crate::core::models::{CourseRecord, GradingScale};
    use chrono::NaiveDate;
    use serde_json::Value;

    #[test]
    fn summary_json_carries_rounded_fields() {
        let scale = GradingScale::nus();
        let records = vec![CourseRecord::completed("CS1101S", "PM", 4.0, "A-", "2024/2025")];
        let result = GpaAggregator::new(&scale)
            .aggregate(&records)
            .expect("aggregate");
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).expect("date");

        let rendered = JsonReporter::new()
            .render_summary(&SummaryContext::new(&result, date))
            .expect("render");
        let value: Value = serde_json::from_str(&rendered).expect("valid json");

        assert_eq!(value["summary"]["gpa_3dp"], json!(4.5));
        assert_eq!(value["summary"]["classification"], json!("highest_distinction"));
        assert_eq!(value["date_of_overview"], json!("2025-01-02"));
    }

    #[test]
    fn empty_summary_json_has_null_summary_and_counts() {
        let scale = GradingScale::nus();
        let records = vec![
            CourseRecord::completed("GEA1000", "Quantitative Reasoning", 4.0, "S", "2024/2025"),
            CourseRecord::completed("CS2101", "Effective Communication", 4.0, "IP", "2024/2025"),
        ];
        let tally = GpaAggregator::new(&scale).tally(&records).expect("tally");
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).expect("date");

        let rendered = JsonReporter::new()
            .render_empty_summary(&EmptySummaryContext::new(&tally, date))
            .expect("render");
        let value: Value = serde_json::from_str(&rendered).expect("valid json");

        assert!(value["summary"].is_null());
        assert_eq!(value["tally"]["counts"]["attempted"], json!(2));
        assert_eq!(value["tally"]["counts"]["satisfactory_unsatisfactory"], json!(1));
        assert_eq!(value["tally"]["counts"]["unresolved"], json!(1));
        assert_eq!(value["tally"]["completed_units"], json!(4.0));
        assert_eq!(value["date_of_overview"], json!("2025-01-02"));
    }
}
