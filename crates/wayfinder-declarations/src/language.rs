//! Language mode identifiers.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Identifier of an editor language mode such as `rust` or `typescript`.
///
/// Identifiers are trimmed and lower-cased on construction so lookups and
/// selector matching are insensitive to how integrations spell them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageId(String);

impl LanguageId {
    /// Returns the normalised identifier.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors raised when parsing language identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid language mode '{0}'")]
pub struct LanguageParseError(String);

impl LanguageParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub const fn input(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for LanguageId {
    type Err = LanguageParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        let valid = !normalised.is_empty()
            && normalised
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '+'));
        if valid {
            Ok(Self(normalised))
        } else {
            Err(LanguageParseError(input.to_owned()))
        }
    }
}
