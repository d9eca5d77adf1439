//! Course catalog: read-only lookup of course titles and credit units by code
//!
//! The file format is the NUSMods `moduleInfo.json` array. Fetching it is left to
//! the user; this module only reads a local copy.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::core::models::{CourseRecord, PlannedCourse};

/// One catalog course
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEntry {
    /// Course code (e.g. "CS2103T")
    #[serde(rename = "moduleCode")]
    pub code: String,
    /// Course title
    pub title: String,
    /// Credit units
    #[serde(rename = "moduleCredit", deserialize_with = "credit_units")]
    pub credit_units: f64,
}

/// NUSMods publishes `moduleCredit` as a string ("4"); accept numbers too.
fn credit_units<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid moduleCredit: '{text}'"))),
    }
}

/// Errors raised by catalog lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No course with this code in the catalog
    UnknownCourse(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCourse(code) => write!(f, "Course '{code}' not found in catalog"),
        }
    }
}

impl Error for CatalogError {}

/// A read-only course lookup keyed by course code
pub trait CourseCatalog {
    /// Find a course by code
    fn lookup(&self, code: &str) -> Option<&CatalogEntry>;

    /// Build a completed-course record from a catalog entry
    ///
    /// # Errors
    /// Returns [`CatalogError::UnknownCourse`] if `code` is not in the catalog
    fn record(&self, code: &str, grade: &str, term: &str) -> Result<CourseRecord, CatalogError> {
        let entry = self
            .lookup(code)
            .ok_or_else(|| CatalogError::UnknownCourse(code.to_string()))?;
        Ok(CourseRecord::completed(
            entry.code.clone(),
            entry.title.clone(),
            entry.credit_units,
            grade,
            term,
        ))
    }

    /// Build a planned course from a catalog entry
    ///
    /// # Errors
    /// Returns [`CatalogError::UnknownCourse`] if `code` is not in the catalog
    fn planned(&self, code: &str) -> Result<PlannedCourse, CatalogError> {
        let entry = self
            .lookup(code)
            .ok_or_else(|| CatalogError::UnknownCourse(code.to_string()))?;
        Ok(PlannedCourse::new(
            entry.code.clone(),
            entry.title.clone(),
            entry.credit_units,
        ))
    }
}

/// In-memory catalog loaded from a `moduleInfo.json` file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    /// Build a catalog from entries; a later duplicate code replaces an earlier one
    #[must_use]
    pub fn from_entries<I: IntoIterator<Item = CatalogEntry>>(entries: I) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.code.to_ascii_uppercase(), entry))
                .collect(),
        }
    }

    /// Parse a `moduleInfo.json` document
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a credit value is not numeric
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Read a `moduleInfo.json` file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read catalog {}: {e}", path.display()))?;
        let catalog = Self::from_json_str(&content)
            .map_err(|e| format!("Failed to parse catalog {}: {e}", path.display()))?;
        crate::info!(
            "Loaded {} courses from catalog {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Number of courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All courses ordered by code
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Courses that can enter a forecast (non-zero credit units)
    pub fn forecastable(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries().filter(|entry| entry.credit_units > 0.0)
    }
}

impl CourseCatalog for Catalog {
    fn lookup(&self, code: &str) -> Option<&CatalogEntry> {
        self.entries.get(&code.trim().to_ascii_uppercase())
    }
}
