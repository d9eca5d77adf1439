//! Academic year labels
//!
//! NUS academic years start in August; the catalog for a new year is treated as
//! current from 6 August.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// First academic year with catalog data
pub const FIRST_START_YEAR: i32 = 2018;

/// Month and day from which the new academic year is current
const ROLLOVER: (u32, u32) = (8, 6);

/// An academic year, identified by the calendar year it starts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AcademicYear {
    /// Calendar year in which the academic year starts
    pub start: i32,
}

impl AcademicYear {
    /// Academic year starting in `start`
    #[must_use]
    pub const fn new(start: i32) -> Self {
        Self { start }
    }

    /// Academic year that is current on `date`
    #[must_use]
    pub fn current(date: NaiveDate) -> Self {
        if (date.month(), date.day()) < ROLLOVER {
            Self::new(date.year() - 1)
        } else {
            Self::new(date.year())
        }
    }

    /// All academic years with catalog data up to the one current on `date`
    #[must_use]
    pub fn available(date: NaiveDate) -> Vec<Self> {
        (FIRST_START_YEAR..=Self::current(date).start)
            .map(Self::new)
            .collect()
    }

    /// Label stored in tracker records (e.g. "2024/2025")
    #[must_use]
    pub fn term_label(self) -> String {
        format!("{}/{}", self.start, self.start + 1)
    }

    /// Key used for catalog files (e.g. "2024-2025")
    #[must_use]
    pub fn catalog_key(self) -> String {
        format!("{}-{}", self.start, self.start + 1)
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AY {}/{}", self.start, self.start + 1)
    }
}

impl FromStr for AcademicYear {
    type Err = String;

    /// Accepts "AY 2024/2025", "2024/2025", "2024-2025" or "2024"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix("AY")
            .or_else(|| trimmed.strip_prefix("ay"))
            .unwrap_or(trimmed)
            .trim();

        let mut parts = body.split(['/', '-']);
        let start = parts
            .next()
            .and_then(|p| p.trim().parse::<i32>().ok())
            .ok_or_else(|| format!("Invalid academic year: '{s}'"))?;

        if let Some(end) = parts.next() {
            let end = end
                .trim()
                .parse::<i32>()
                .map_err(|_| format!("Invalid academic year: '{s}'"))?;
            if end != start + 1 || parts.next().is_some() {
                return Err(format!("Invalid academic year: '{s}'"));
            }
        }

        Ok(Self::new(start))
    }
}
