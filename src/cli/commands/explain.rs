//! Explain command handler: print the grading scale and honours thresholds

use crate::commands::{fail, load_scale};
use gpa_insight::config::Config;
use gpa_insight::core::models::{Classification, GradeEntry, GradingScale};

/// Run the explain command
pub fn run(config: &Config) {
    match load_scale(config) {
        Ok(scale) => print_scale(&scale, &config.grading.scale_file),
        Err(err) => fail("Explain failed", &err),
    }
}

fn print_scale(scale: &GradingScale, source: &str) {
    let source = if source.is_empty() {
        "built-in NUS scale"
    } else {
        source
    };
    println!("\n=== Grading Scale ({source}) ===\n");
    println!(
        "{:<6} {:>6}  {:<9}  Description",
        "Grade", "Points", "CUs Given"
    );
    for entry in &scale.grades {
        println!("{}", grade_row(entry));
    }

    println!("\n=== Degree Classification ===\n");
    for tier in Classification::TIERS {
        if let Some(threshold) = scale.thresholds.threshold(tier) {
            println!("  GPA ≥ {threshold:.2}  {tier}");
        }
    }
    println!(
        "  otherwise    {}",
        Classification::BelowGraduationThreshold
    );
    println!("\nClassification uses the GPA rounded to 3 decimal places.");
    println!("Non-counting grades (\"-\") never enter the GPA.");
    println!("\"CUs Given\" tells whether the grade adds to completed credit units.");
}

/// One scale table row: letter, points, whether units are awarded, description
fn grade_row(entry: &GradeEntry) -> String {
    let points = entry
        .points
        .map_or_else(|| "-".to_string(), |p| format!("{p:.1}"));
    let units_given = if entry.awards_units { "Yes" } else { "No" };
    format!(
        "{:<6} {:>6}  {:<9}  {}",
        entry.letter, points, units_given, entry.description
    )
}
