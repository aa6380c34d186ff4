//! Log record formats.
//!
//! Configuration files and `FromStr` share one parser, so `"JSON"` in a TOML
//! file is accepted exactly where it would be accepted on a command line.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr, VariantNames};
use thiserror::Error;

/// Output format for log records.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
    Deserialize,
    Serialize,
)]
#[serde(try_from = "String", into = "&'static str")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per record, with event fields flattened to the top level.
    #[default]
    Json,
    /// Single human-readable line per record.
    Compact,
}

impl LogFormat {
    /// Returns `true` when records are machine-readable objects.
    ///
    /// Structured records never carry terminal colour codes.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Raised when text names no known [`LogFormat`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown log format '{value}', expected one of: {expected}",
    expected = LogFormat::VARIANTS.join(", ")
)]
pub struct LogFormatParseError {
    value: String,
}

impl LogFormatParseError {
    /// Text that failed to parse.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.value.as_str()
    }
}

impl TryFrom<String> for LogFormat {
    type Error = LogFormatParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.trim()).map_err(|_| LogFormatParseError { value })
    }
}
