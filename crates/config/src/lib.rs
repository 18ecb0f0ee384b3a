//! Tally Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use tally_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[paths]\nraw_data_dir = \"data/raw\"").unwrap();
//! ```
//!
//! # Example Minimal Config
//!
//! ```toml
//! [paths]
//! raw_data_dir = "data/raw"
//! aggregated_data_dir = "data/aggregated"
//! ```
//!
//! # Example Full Config
//!
//! See `configs/example.toml` for all available options.

mod error;
mod logging;
mod output;
mod paths;
mod run;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogLevel};
pub use output::OutputConfig;
pub use paths::PathsConfig;
pub use run::RunConfig;

use serde::Deserialize;
use tally_records::DateStyle;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input, output and log directories
    pub paths: PathsConfig,

    /// Rendering of the aggregated tables
    pub output: OutputConfig,

    /// Optional date window for a run
    pub run: RunConfig,

    /// Logging configuration
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Checks for:
    /// - Output date format that renders and re-parses
    /// - A well-ordered run window
    pub fn validate(&self) -> Result<()> {
        self.output.date_style()?;
        self.run.validate()
    }

    /// The validated date style for output tables
    pub fn date_style(&self) -> Result<DateStyle> {
        self.output.date_style()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
