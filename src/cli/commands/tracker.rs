//! Tracker command handler
//!
//! Adds, removes and lists courses in the tracker CSV. Every change rewrites the
//! whole file.

use crate::args::TrackerSubcommand;
use crate::commands::{catalog_path, fail, load_records, load_scale, resolve_year};
use gpa_insight::config::Config;
use gpa_insight::core::catalog::{Catalog, CourseCatalog};
use gpa_insight::core::models::{CourseRecord, GradingScale, RecordSet};
use gpa_insight::core::tracker::write_tracker;
use gpa_insight::{info, verbose};
use std::io::{self, Write};
use std::path::Path;

/// Dispatch tracker subcommands
pub fn run(subcommand: TrackerSubcommand, config: &Config) {
    let path = Path::new(&config.paths.tracker_file);
    let outcome = load_scale(config).and_then(|scale| {
        let records = load_records(path, &scale)?;
        let mut set = RecordSet::from_records(records);
        match subcommand {
            TrackerSubcommand::Add {
                code,
                grade,
                title,
                units,
                ay,
            } => {
                let details = CourseDetails {
                    code: &code,
                    grade: grade.as_deref(),
                    title: title.as_deref(),
                    units,
                    ay: ay.as_deref(),
                };
                handle_add(&mut set, &scale, config, &details)?;
            }
            TrackerSubcommand::RemoveLast => handle_remove_last(&mut set),
            TrackerSubcommand::Clear { yes } => handle_clear(&mut set, yes),
            TrackerSubcommand::List => handle_list(&set, &scale),
        }
        save_if_changed(&set, &scale, path)
    });

    if let Err(err) = outcome {
        fail("Tracker command failed", &err);
    }
}

/// Course details supplied to `tracker add`
struct CourseDetails<'a> {
    code: &'a str,
    grade: Option<&'a str>,
    title: Option<&'a str>,
    units: Option<f64>,
    ay: Option<&'a str>,
}

/// Build a record from the catalog and/or explicit details
fn build_record(
    details: &CourseDetails,
    scale: &GradingScale,
    config: &Config,
) -> Result<CourseRecord, String> {
    let year = resolve_year(details.ay)?;
    let term = year.term_label();

    // Store the scale's spelling of the letter
    let grade = details
        .grade
        .map(|letter| scale.entry(letter).map(|e| e.letter.clone()))
        .transpose()
        .map_err(|e| e.to_string())?;

    let mut record = if let (Some(title), Some(units)) = (details.title, details.units) {
        CourseRecord::planned(details.code.to_ascii_uppercase(), title, units, term)
    } else {
        let path = catalog_path(config, year);
        let catalog = Catalog::from_path(&path).map_err(|e| e.to_string())?;
        let entry = catalog
            .planned(details.code)
            .map_err(|e| format!("{e} for {year}"))?;
        let mut record =
            CourseRecord::planned(entry.code, entry.title, entry.credit_units, term);
        if let Some(title) = details.title {
            record.title = title.to_string();
        }
        if let Some(units) = details.units {
            record.credit_units = units;
        }
        record
    };

    if !record.credit_units.is_finite() || record.credit_units < 0.0 {
        return Err(format!(
            "Invalid number of CUs for {}: {}",
            record.code, record.credit_units
        ));
    }
    record.grade = grade;
    Ok(record)
}

fn handle_add(
    set: &mut RecordSet,
    scale: &GradingScale,
    config: &Config,
    details: &CourseDetails,
) -> Result<(), String> {
    let record = build_record(details, scale, config)?;
    info!("Adding {} ({}) to tracker", record.code, record.term);
    println!(
        "✓ Added {} {} [{} CUs] {}",
        record.code,
        record.title,
        record.credit_units,
        record.grade.as_deref().unwrap_or("(planned)")
    );
    set.add(record);
    Ok(())
}

fn handle_remove_last(set: &mut RecordSet) {
    match set.remove_last() {
        Some(record) => println!("✓ Removed {} {}", record.code, record.title),
        None => println!("✗ Tracker is already empty"),
    }
}

fn handle_clear(set: &mut RecordSet, yes: bool) {
    if set.is_empty() {
        println!("✓ Tracker is already empty");
        return;
    }

    if !yes {
        print!(
            "Are you sure you want to remove all {} courses? (y/n): ",
            set.len()
        );
        io::stdout().flush().ok();

        let mut response = String::new();
        io::stdin().read_line(&mut response).ok();
        let response = response.trim();
        if !(response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes")) {
            println!("✗ Clear cancelled");
            return;
        }
    }

    set.clear();
    println!("✓ Tracker cleared");
}

fn handle_list(set: &RecordSet, scale: &GradingScale) {
    if set.is_empty() {
        println!("No courses tracked yet.");
        return;
    }

    println!(
        "{:<10} {:<40} {:>6} {:>6} {:>6} {:>10}",
        "Code", "Title", "CUs", "Grade", "GP", "AY"
    );
    for record in set.records() {
        let grade = record.grade.as_deref().unwrap_or("");
        let points = record
            .grade
            .as_deref()
            .and_then(|g| scale.entry(g).ok())
            .and_then(|e| e.points)
            .map(|p| format!("{p:.1}"))
            .unwrap_or_default();
        println!(
            "{:<10} {:<40} {:>6} {:>6} {:>6} {:>10}",
            record.code,
            truncate(&record.title, 40),
            record.credit_units,
            grade,
            points,
            record.term
        );
    }
    verbose!("{} courses listed", set.len());
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}

fn save_if_changed(set: &RecordSet, scale: &GradingScale, path: &Path) -> Result<(), String> {
    if set.version() == 0 {
        return Ok(());
    }
    write_tracker(set.records(), scale, path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))?;
    info!("Tracker saved to {} ({} courses)", path.display(), set.len());
    Ok(())
}
