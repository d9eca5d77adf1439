//! Summary command handler
//!
//! Aggregates a tracker CSV into a GPA overview.

use crate::commands::{emit, fail, load_records, load_scale};
use chrono::Local;
use gpa_insight::config::Config;
use gpa_insight::core::aggregate::GpaAggregator;
use gpa_insight::core::report::{
    write_report, EmptySummaryContext, ReportFormat, ReportGenerator, SummaryContext,
};
use gpa_insight::core::GpaError;
use gpa_insight::{info, verbose, warn};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Run the summary command
pub fn run(
    input_file: Option<&Path>,
    format_str: &str,
    output: Option<&Path>,
    save: bool,
    config: &Config,
) {
    let input = input_file.map_or_else(|| PathBuf::from(&config.paths.tracker_file), Path::to_path_buf);
    if let Err(err) = summarize(&input, format_str, output, save, config) {
        fail(&format!("Summary failed for {}", input.display()), &err);
    }
}

fn summarize(
    input: &Path,
    format_str: &str,
    output: Option<&Path>,
    save: bool,
    config: &Config,
) -> Result<(), String> {
    let format = ReportFormat::from_str(format_str)?;
    let scale = load_scale(config)?;
    let records = load_records(input, &scale)?;
    info!("Summarizing {} records from {}", records.len(), input.display());

    let aggregator = GpaAggregator::new(&scale);
    let generator = format.generator();
    let today = Local::now().date_naive();
    let rendered = match aggregator.aggregate(&records) {
        Ok(result) => {
            verbose!(
                "GPA {:.4} over {} CUs ({})",
                result.gpa_4dp,
                result.total_counted_units,
                result.classification
            );
            generator.render_summary(&SummaryContext::new(&result, today))
        }
        Err(GpaError::EmptyCountedSet) => {
            warn!("No courses count toward GPA yet; rendering counts only");
            let tally = aggregator.tally(&records).map_err(|e| e.to_string())?;
            generator.render_empty_summary(&EmptySummaryContext::new(&tally, today))
        }
        Err(e) => return Err(e.to_string()),
    }
    .map_err(|e| format!("Failed to render summary: {e}"))?;

    emit(&rendered, output)?;

    if save {
        let path = Path::new(&config.paths.reports_dir)
            .join(format!("gpa_overview.{}", format.extension()));
        write_report(&rendered, &path)
            .map_err(|e| format!("Failed to save {}: {e}", path.display()))?;
        println!("✓ Report saved: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn su_only_tracker(dir: &Path) -> PathBuf {
        let path = dir.join("tracker.csv");
        fs::write(
            &path,
            "Course Code,Course Title,No. of CUs,Grade,Grade Points,AY Taken\n\
             GEA1000,Quantitative Reasoning with Data,4,S,,2024/2025\n\
             CFG1002,Career Catalyst,2,U,,2024/2025\n",
        )
        .expect("write tracker");
        path
    }

    #[test]
    fn empty_summary_honours_format_and_output() {
        let dir = TempDir::new().expect("temp dir");
        let input = su_only_tracker(dir.path());
        let output = dir.path().join("out").join("overview.json");

        summarize(&input, "json", Some(&output), false, &Config::from_defaults())
            .expect("summary");

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).expect("read output"))
                .expect("valid json");
        assert!(value["summary"].is_null());
        assert_eq!(value["tally"]["counts"]["satisfactory_unsatisfactory"], 2);
        assert_eq!(value["tally"]["completed_units"], 4.0);
    }

    #[test]
    fn empty_summary_is_saved_to_reports_dir() {
        let dir = TempDir::new().expect("temp dir");
        let input = su_only_tracker(dir.path());
        let mut config = Config::from_defaults();
        config.paths.reports_dir = dir.path().join("reports").to_string_lossy().to_string();
        let output = dir.path().join("overview.md");

        summarize(&input, "md", Some(&output), true, &config).expect("summary");

        let saved = fs::read_to_string(dir.path().join("reports").join("gpa_overview.md"))
            .expect("saved report");
        assert!(saved.contains("| Final GPA | N/A |"));
        assert_eq!(fs::read_to_string(&output).expect("output"), saved);
    }
}
