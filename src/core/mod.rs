//! Core GPA analytics: aggregation, forecasting, and the supporting I/O

pub mod academic_year;
pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod forecast;
pub mod grade_range;
pub mod models;
pub mod report;
pub mod tracker;

pub use error::GpaError;

/// Round `value` to `places` decimal places (half away from zero)
#[must_use]
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(i32::try_from(places).unwrap_or(i32::MAX));
    (value * factor).round() / factor
}
