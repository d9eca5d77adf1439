//! Years command handler: list academic years with catalog data

use crate::commands::catalog_path;
use chrono::Local;
use gpa_insight::config::Config;
use gpa_insight::core::academic_year::AcademicYear;

/// Run the years command
pub fn run(config: &Config) {
    let today = Local::now().date_naive();
    let current = AcademicYear::current(today);

    for year in AcademicYear::available(today).into_iter().rev() {
        let marker = if year == current { "*" } else { " " };
        let path = catalog_path(config, year);
        let status = if path.exists() {
            "catalog available"
        } else {
            "no local catalog"
        };
        println!("{marker} {year}  ({status}: {})", path.display());
    }
}
