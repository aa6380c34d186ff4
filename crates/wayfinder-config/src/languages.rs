//! File extension to language mode associations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::defaults::DEFAULT_LANGUAGE_ASSOCIATIONS;

/// Errors produced when an association entry cannot be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LanguageAssociationError {
    /// The extension key was blank after normalisation.
    #[error("language association for '{language}' has an empty extension")]
    EmptyExtension {
        /// Language mode the entry pointed at.
        language: String,
    },
    /// The language mode was blank after normalisation.
    #[error("extension '{extension}' maps to an empty language mode")]
    EmptyLanguage {
        /// Extension that carried the blank mode.
        extension: String,
    },
}

/// Maps file extensions to the language mode assigned to opened documents.
///
/// Configured entries are layered over [`DEFAULT_LANGUAGE_ASSOCIATIONS`], so
/// a configuration file only needs to name the extensions it adds or changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct LanguageAssociations {
    by_extension: BTreeMap<String, String>,
}

impl LanguageAssociations {
    /// Builds an association table without the built-in defaults.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            by_extension: BTreeMap::new(),
        }
    }

    /// Stores or replaces the language mode for an extension.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageAssociationError`] when either side is blank.
    pub fn associate(
        &mut self,
        extension: &str,
        language: &str,
    ) -> Result<(), LanguageAssociationError> {
        let normalised_extension = normalise_extension(extension);
        let normalised_language = normalise_key(language);
        if normalised_extension.is_empty() {
            return Err(LanguageAssociationError::EmptyExtension {
                language: normalised_language,
            });
        }
        if normalised_language.is_empty() {
            return Err(LanguageAssociationError::EmptyLanguage {
                extension: normalised_extension,
            });
        }
        self.by_extension
            .insert(normalised_extension, normalised_language);
        Ok(())
    }

    /// Looks up the language mode for an extension, with or without a leading dot.
    #[must_use]
    pub fn language_for_extension(&self, extension: &str) -> Option<&str> {
        self.by_extension
            .get(&normalise_extension(extension))
            .map(String::as_str)
    }

    /// Looks up the language mode for the final extension of a path.
    #[must_use]
    pub fn language_for_path(&self, path: &str) -> Option<&str> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let (_, extension) = file_name.rsplit_once('.')?;
        self.language_for_extension(extension)
    }

    /// Iterates over the `(extension, language)` pairs in extension order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.by_extension
            .iter()
            .map(|(extension, language)| (extension.as_str(), language.as_str()))
    }
}

impl Default for LanguageAssociations {
    fn default() -> Self {
        let by_extension = DEFAULT_LANGUAGE_ASSOCIATIONS
            .iter()
            .map(|(extension, language)| ((*extension).to_owned(), (*language).to_owned()))
            .collect();
        Self { by_extension }
    }
}

impl TryFrom<BTreeMap<String, String>> for LanguageAssociations {
    type Error = LanguageAssociationError;

    fn try_from(entries: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut associations = Self::default();
        for (extension, language) in &entries {
            associations.associate(extension, language)?;
        }
        Ok(associations)
    }
}

impl From<LanguageAssociations> for BTreeMap<String, String> {
    fn from(associations: LanguageAssociations) -> Self {
        associations.by_extension
    }
}

fn normalise_extension(extension: &str) -> String {
    normalise_key(extension.trim().trim_start_matches('.'))
}

fn normalise_key(key: &str) -> String {
    key.trim().to_lowercase()
}
