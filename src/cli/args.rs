//! CLI argument definitions for `gpainsight`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gpa_insight::config::ConfigOverrides;
use gpa_insight::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `tracker_file`, `scale_file`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum TrackerSubcommand {
    /// Add a course to the tracker.
    ///
    /// Title and credit units are looked up in the catalog for the academic year
    /// unless both `--title` and `--units` are given.
    Add {
        /// Course code (e.g., `CS2103T`)
        #[arg(value_name = "CODE")]
        code: String,

        /// Letter grade; omit to record a planned course
        #[arg(short, long, value_name = "GRADE")]
        grade: Option<String>,

        /// Course title (skips the catalog when given with --units)
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,

        /// Credit units (skips the catalog when given with --title)
        #[arg(long, value_name = "CUS")]
        units: Option<f64>,

        /// Academic year taken (e.g., `2024/2025`); defaults to the current one
        #[arg(long, value_name = "AY")]
        ay: Option<String>,
    },
    /// Remove the most recently added course.
    RemoveLast,
    /// Remove all courses (requires confirmation unless --yes).
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List tracked courses.
    List,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Maintain the course tracker CSV.
    Tracker {
        #[command(subcommand)]
        subcommand: TrackerSubcommand,
    },
    /// Compute GPA, classification and course counts from a tracker CSV.
    Summary {
        /// Tracker CSV (defaults to config `tracker_file`)
        #[arg(value_name = "FILE")]
        input_file: Option<PathBuf>,

        /// Report format: markdown (md) or json
        #[arg(short, long, value_name = "FORMAT", default_value = "markdown")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also save the report under config `reports_dir`
        #[arg(long)]
        save: bool,
    },
    /// Forecast the grades needed on planned courses for each honours tier.
    Forecast {
        /// Current GPA (0 when omitted)
        #[arg(long, value_name = "GPA", conflicts_with = "from_tracker")]
        gpa: Option<f64>,

        /// Credit units behind the current GPA (0 when omitted)
        #[arg(long, value_name = "CUS", conflicts_with = "from_tracker")]
        units: Option<f64>,

        /// Take the current GPA and units from the tracker CSV
        #[arg(long)]
        from_tracker: bool,

        /// Planned course codes, looked up in the catalog (comma separated)
        #[arg(short, long, value_name = "CODES", value_delimiter = ',')]
        courses: Vec<String>,

        /// Planned courses given by credit units only (comma separated)
        #[arg(long, value_name = "CUS", value_delimiter = ',')]
        credits: Vec<f64>,

        /// Catalog JSON (defaults to `<catalog_dir>/<AY>.json`)
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Academic year whose catalog to use; defaults to the current one
        #[arg(long, value_name = "AY")]
        ay: Option<String>,

        /// Report format: markdown (md) or json
        #[arg(short, long, value_name = "FORMAT", default_value = "markdown")]
        format: String,

        /// Write the report to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Show the grading scale and honours thresholds in use.
    Explain,
    /// List academic years with catalog data.
    Years,
}

#[derive(Parser, Debug)]
#[command(
    name = "gpainsight",
    about = "GPA tracking and honours forecasting for NUS students",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config tracker CSV path
    #[arg(long = "config-tracker-file", value_name = "PATH")]
    pub config_tracker_file: Option<PathBuf>,

    /// Override config tracker CSV path (short form)
    #[arg(long = "tracker-file", value_name = "PATH")]
    pub tracker_file: Option<PathBuf>,

    /// Override config catalog directory
    #[arg(long = "catalog-dir", value_name = "DIR")]
    pub catalog_dir: Option<PathBuf>,

    /// Override config reports directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Override config grading scale file
    #[arg(long = "scale-file", value_name = "PATH")]
    pub scale_file: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `--tracker-file` takes precedence over `--config-tracker-file` when both are
    /// provided. `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string().to_lowercase()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            tracker_file: path_string(self.tracker_file.as_ref())
                .or_else(|| path_string(self.config_tracker_file.as_ref())),
            catalog_dir: path_string(self.catalog_dir.as_ref()),
            reports_dir: path_string(self.reports_dir.as_ref()),
            scale_file: path_string(self.scale_file.as_ref()),
        }
    }
}
