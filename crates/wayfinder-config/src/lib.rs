//! Shared configuration for the wayfinder declaration service.
//!
//! The configuration controls how telemetry is emitted and which language
//! mode is assigned to documents opened by file extension. Every field has a
//! default, so an empty file (or no file at all) yields a usable [`Config`].

mod defaults;
mod languages;
mod logging;

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_LANGUAGE_ASSOCIATIONS, DEFAULT_LOG_FILTER, default_log_filter_string,
    default_log_format,
};
pub use languages::{LanguageAssociationError, LanguageAssociations};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration consumed by the declaration service and its telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// `tracing` filter expression, e.g. `info` or `wayfinder_declarations=debug`.
    #[serde(default = "default_log_filter_string")]
    pub log_filter: String,
    /// Output format for log records.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// File extension to language mode associations.
    #[serde(default)]
    pub languages: LanguageAssociations,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            languages: LanguageAssociations::default(),
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid TOML, names
    /// unknown fields, or carries blank language associations.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|source| ConfigError::Parse {
            origin: String::from("<inline>"),
            source: Box::new(source),
        })
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are invalid.
    pub fn load_from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            origin: path.to_string(),
            source: Box::new(source),
        })
    }

    /// Filter expression applied to the telemetry subscriber.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format applied to the telemetry subscriber.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Extension to language mode associations.
    #[must_use]
    pub const fn languages(&self) -> &LanguageAssociations {
        &self.languages
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration from {path}: {source}")]
    Read {
        /// File that failed to load.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
    /// The configuration text was malformed.
    #[error("invalid configuration in {origin}: {source}")]
    Parse {
        /// File path, or `<inline>` for text parsed directly.
        origin: String,
        /// Underlying TOML failure.
        #[source]
        source: Box<toml::de::Error>,
    },
}
