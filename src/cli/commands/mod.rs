//! CLI command handlers for `gpainsight`.
//!
//! Each command is implemented in its own submodule. Handlers that can fail
//! print a `✗` line and exit with status 1.

pub mod config;
pub mod explain;
pub mod forecast;
pub mod summary;
pub mod tracker;
pub mod years;

use chrono::Local;
use gpa_insight::config::Config;
use gpa_insight::core::academic_year::AcademicYear;
use gpa_insight::core::models::{CourseRecord, GradingScale};
use gpa_insight::core::report::write_report;
use gpa_insight::core::tracker::read_tracker;
use gpa_insight::error;
use std::path::{Path, PathBuf};

/// Report a failed command and exit with status 1
pub fn fail(context: &str, err: &str) -> ! {
    error!("{context}: {err}");
    eprintln!("✗ {err}");
    std::process::exit(1);
}

/// Grading scale from config, or the NUS default
pub fn load_scale(config: &Config) -> Result<GradingScale, String> {
    config
        .grading_scale()
        .map_err(|e| format!("Failed to load grading scale: {e}"))
}

/// Parse `--ay`, defaulting to the academic year current today
pub fn resolve_year(ay: Option<&str>) -> Result<AcademicYear, String> {
    ay.map_or_else(
        || Ok(AcademicYear::current(Local::now().date_naive())),
        str::parse,
    )
}

/// Catalog file for `year` under the configured catalog directory
pub fn catalog_path(config: &Config, year: AcademicYear) -> PathBuf {
    Path::new(&config.paths.catalog_dir).join(format!("{}.json", year.catalog_key()))
}

/// Read the tracker file; a file that does not exist yet is an empty tracker
pub fn load_records(path: &Path, scale: &GradingScale) -> Result<Vec<CourseRecord>, String> {
    if !path.exists() {
        gpa_insight::info!("Tracker {} does not exist yet", path.display());
        return Ok(Vec::new());
    }
    read_tracker(path, scale).map_err(|e| format!("Failed to read {}: {e}", path.display()))
}

/// Print rendered content, or write it to `output`
pub fn emit(content: &str, output: Option<&Path>) -> Result<(), String> {
    match output {
        Some(path) => {
            write_report(content, path)
                .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
            println!("✓ Report written: {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
