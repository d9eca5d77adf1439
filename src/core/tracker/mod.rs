//! Course tracker file: the record store behind the CLI
//!
//! A tracker is a CSV file with the columns of the NUS course tracker spreadsheet.

pub mod csv_io;

pub use csv_io::{
    read_tracker, read_tracker_from, write_tracker, write_tracker_to, TrackerError,
    EXPECTED_HEADERS,
};
