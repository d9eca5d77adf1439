//! Forecast command handler
//!
//! Resolves the baseline and the planned courses, then renders the per-tier
//! requirements from the forecast solver.

use crate::commands::{catalog_path, emit, fail, load_records, load_scale, resolve_year};
use gpa_insight::config::Config;
use gpa_insight::core::aggregate::GpaAggregator;
use gpa_insight::core::catalog::{Catalog, CourseCatalog};
use gpa_insight::core::forecast::ForecastSolver;
use gpa_insight::core::models::{GradingScale, PlannedCourse};
use gpa_insight::core::report::{ForecastContext, ReportFormat, ReportGenerator};
use gpa_insight::core::GpaError;
use gpa_insight::{info, warn};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Most planned courses a single forecast accepts
pub const MAX_PLANNED_COURSES: usize = 15;

/// Options for the forecast command
#[derive(Debug, Default)]
pub struct ForecastArgs {
    /// Current GPA
    pub gpa: Option<f64>,
    /// Credit units behind the current GPA
    pub units: Option<f64>,
    /// Take the baseline from the tracker
    pub from_tracker: bool,
    /// Catalog course codes
    pub courses: Vec<String>,
    /// Credit units of unnamed planned courses
    pub credits: Vec<f64>,
    /// Explicit catalog file
    pub catalog: Option<PathBuf>,
    /// Academic year for the catalog
    pub ay: Option<String>,
    /// Report format name
    pub format: String,
    /// Output file
    pub output: Option<PathBuf>,
}

/// Run the forecast command
pub fn run(args: &ForecastArgs, config: &Config) {
    if let Err(err) = forecast(args, config) {
        fail("Forecast failed", &err);
    }
}

fn forecast(args: &ForecastArgs, config: &Config) -> Result<(), String> {
    let format = ReportFormat::from_str(&args.format)?;
    let scale = load_scale(config)?;

    let (current_gpa, current_units) = baseline(args, &scale, config)?;
    let planned = planned_courses(args, config)?;

    if planned.is_empty() {
        return Err("Select at least one planned course with --courses or --credits".to_string());
    }
    if planned.len() > MAX_PLANNED_COURSES {
        return Err(format!(
            "At most {MAX_PLANNED_COURSES} planned courses per forecast, got {}",
            planned.len()
        ));
    }

    info!(
        "Forecasting from GPA {current_gpa} over {current_units} CUs with {} planned courses",
        planned.len()
    );

    let solver = ForecastSolver::new(&scale);
    let scenario = solver
        .forecast(current_gpa, current_units, &planned)
        .map_err(|e| e.to_string())?;

    let ctx = ForecastContext::new(&scenario, &planned, solver.translator());
    let rendered = format
        .generator()
        .render_forecast(&ctx)
        .map_err(|e| format!("Failed to render forecast: {e}"))?;

    emit(&rendered, args.output.as_deref())
}

/// Current GPA and units, from flags or from the tracker
fn baseline(args: &ForecastArgs, scale: &GradingScale, config: &Config) -> Result<(f64, f64), String> {
    if !args.from_tracker {
        return Ok((args.gpa.unwrap_or(0.0), args.units.unwrap_or(0.0)));
    }

    let path = Path::new(&config.paths.tracker_file);
    let records = load_records(path, scale)?;
    match GpaAggregator::new(scale).aggregate(&records) {
        Ok(result) => {
            println!(
                "Using tracker baseline: GPA {:.4} over {} CUs",
                result.gpa_4dp, result.total_counted_units
            );
            Ok((result.gpa_4dp, result.total_counted_units))
        }
        Err(GpaError::EmptyCountedSet) => {
            warn!("No GPA-counting courses in {}; starting from 0", path.display());
            Ok((0.0, 0.0))
        }
        Err(e) => Err(e.to_string()),
    }
}

/// Catalog courses followed by unit-only courses
fn planned_courses(args: &ForecastArgs, config: &Config) -> Result<Vec<PlannedCourse>, String> {
    let mut planned = Vec::with_capacity(args.courses.len() + args.credits.len());

    if !args.courses.is_empty() {
        let path = match &args.catalog {
            Some(path) => path.clone(),
            None => catalog_path(config, resolve_year(args.ay.as_deref())?),
        };
        let catalog = Catalog::from_path(&path).map_err(|e| e.to_string())?;

        for code in &args.courses {
            let course = catalog.planned(code).map_err(|e| e.to_string())?;
            if course.credit_units > 0.0 {
                planned.push(course);
            } else {
                warn!("Skipping {}: it carries no credit units", course.code);
            }
        }
    }

    planned.extend(args.credits.iter().copied().map(PlannedCourse::units_only));
    Ok(planned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_with_catalog(dir: &Path) -> Config {
        let mut config = Config::from_defaults();
        config.paths.catalog_dir = dir.to_string_lossy().to_string();
        config.paths.tracker_file = dir.join("tracker.csv").to_string_lossy().to_string();
        config
    }

    #[test]
    fn collects_catalog_and_unit_only_courses() {
        let dir = TempDir::new().expect("temp dir");
        let catalog = dir.path().join("catalog.json");
        fs::write(
            &catalog,
            r#"[{"moduleCode": "CS2103T", "title": "Software Engineering", "moduleCredit": "4"},
                {"moduleCode": "CFG1002", "title": "Career Catalyst", "moduleCredit": "0"}]"#,
        )
        .expect("write catalog");

        let args = ForecastArgs {
            courses: vec!["cs2103t".to_string(), "CFG1002".to_string()],
            credits: vec![2.0],
            catalog: Some(catalog),
            ..ForecastArgs::default()
        };
        let planned = planned_courses(&args, &config_with_catalog(dir.path())).expect("planned");

        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].code, "CS2103T");
        assert!((planned[1].credit_units - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn baseline_defaults_to_zero_and_reads_tracker() {
        let dir = TempDir::new().expect("temp dir");
        let config = config_with_catalog(dir.path());
        let scale = GradingScale::nus();

        let args = ForecastArgs::default();
        assert_eq!(baseline(&args, &scale, &config), Ok((0.0, 0.0)));

        fs::write(
            &config.paths.tracker_file,
            "Course Code,Course Title,No. of CUs,Grade,Grade Points,AY Taken\n\
             CS1101S,Programming Methodology,4,A-,4.5,2024/2025\n",
        )
        .expect("write tracker");
        let args = ForecastArgs {
            from_tracker: true,
            ..ForecastArgs::default()
        };
        assert_eq!(baseline(&args, &scale, &config), Ok((4.5, 4.0)));
    }
}
