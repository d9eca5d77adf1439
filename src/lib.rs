//! Shared library for `GpaInsight`
//! GPA aggregation, honours forecasting, and the record/catalog plumbing used by the CLI

pub mod config;
pub mod core;
pub mod logger;

/// Returns the current version of the `GpaInsight` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
