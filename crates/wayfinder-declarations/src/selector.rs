//! Applicability criteria for registered providers.
//!
//! A [`DocumentSelector`] holds one or more [`DocumentFilter`]s. Each filter
//! can constrain the language mode, the URI scheme and a glob over the
//! document path. Scoring a selector against a document yields how
//! specifically it applies: `0` means not at all, and higher scores order
//! providers earlier in the registry.

use std::fmt;
use std::str::FromStr;

use globset::{Glob, GlobMatcher};
use thiserror::Error;

use crate::document::Document;
use crate::language::{LanguageId, LanguageParseError};
use crate::uri;

const EXACT_MATCH: u8 = 10;
const WILDCARD_MATCH: u8 = 5;
const WILDCARD: &str = "*";

/// Errors raised while building selectors.
#[derive(Debug, Error)]
pub enum SelectorError {
    /// The language constraint is neither `*` nor a valid identifier.
    #[error(transparent)]
    Language(#[from] LanguageParseError),
    /// The path pattern is not a valid glob.
    #[error("invalid document pattern '{pattern}': {source}")]
    Pattern {
        /// Pattern as supplied.
        pattern: String,
        /// Glob compilation failure.
        #[source]
        source: globset::Error,
    },
}

/// Constraint on a single document property.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Constraint<T> {
    Any,
    Exactly(T),
}

impl<T: PartialEq> Constraint<T> {
    fn score(&self, actual: Option<&T>) -> u8 {
        match (self, actual) {
            (Self::Any, _) => WILDCARD_MATCH,
            (Self::Exactly(expected), Some(actual)) if expected == actual => EXACT_MATCH,
            (Self::Exactly(_), _) => 0,
        }
    }
}

#[derive(Debug, Clone)]
struct PathPattern {
    source: String,
    matcher: GlobMatcher,
}

/// Single applicability rule; every constraint it sets must match.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    language: Option<Constraint<LanguageId>>,
    scheme: Option<Constraint<String>>,
    pattern: Option<PathPattern>,
}

impl DocumentFilter {
    /// Filter matching documents of the given language mode, or every mode for `*`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Language`] for malformed identifiers.
    pub fn language(language: &str) -> Result<Self, SelectorError> {
        Self::default().with_language(language)
    }

    /// Adds a language constraint; `*` matches every mode with a lower score.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Language`] for malformed identifiers.
    pub fn with_language(mut self, language: &str) -> Result<Self, SelectorError> {
        let constraint = if language.trim() == WILDCARD {
            Constraint::Any
        } else {
            Constraint::Exactly(LanguageId::from_str(language)?)
        };
        self.language = Some(constraint);
        Ok(self)
    }

    /// Adds a URI scheme constraint; `*` matches every scheme with a lower score.
    #[must_use]
    pub fn with_scheme(mut self, scheme: &str) -> Self {
        let normalised = scheme.trim().to_ascii_lowercase();
        self.scheme = Some(if normalised == WILDCARD {
            Constraint::Any
        } else {
            Constraint::Exactly(normalised)
        });
        self
    }

    /// Adds a glob constraint over the document path.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Pattern`] when the glob does not compile.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, SelectorError> {
        let glob = Glob::new(pattern).map_err(|source| SelectorError::Pattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        self.pattern = Some(PathPattern {
            source: pattern.to_owned(),
            matcher: glob.compile_matcher(),
        });
        Ok(self)
    }

    /// Scores how specifically this filter applies to `document`.
    #[must_use]
    pub fn score(&self, document: &Document) -> u8 {
        let mut best = 0;

        if let Some(constraint) = &self.scheme {
            let actual = uri::scheme(document.uri());
            match constraint.score(actual.as_ref()) {
                0 => return 0,
                score => best = best.max(score),
            }
        }

        if let Some(constraint) = &self.language {
            match constraint.score(Some(document.language())) {
                0 => return 0,
                score => best = best.max(score),
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.matcher.is_match(uri::match_path(document.uri()).as_std_path()) {
                return 0;
            }
            best = EXACT_MATCH;
        }

        best
    }
}

impl fmt::Display for DocumentFilter {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        match &self.language {
            Some(Constraint::Any) => parts.push(String::from("language=*")),
            Some(Constraint::Exactly(language)) => parts.push(format!("language={language}")),
            None => {}
        }
        match &self.scheme {
            Some(Constraint::Any) => parts.push(String::from("scheme=*")),
            Some(Constraint::Exactly(scheme)) => parts.push(format!("scheme={scheme}")),
            None => {}
        }
        if let Some(pattern) = &self.pattern {
            parts.push(format!("pattern={}", pattern.source));
        }
        formatter.write_str(&parts.join(","))
    }
}

/// Set of filters; a document is matched by the best-scoring filter.
#[derive(Debug, Clone, Default)]
pub struct DocumentSelector {
    filters: Vec<DocumentFilter>,
}

impl DocumentSelector {
    /// Builds a selector from filters.
    #[must_use]
    pub fn new(filters: impl IntoIterator<Item = DocumentFilter>) -> Self {
        Self {
            filters: filters.into_iter().collect(),
        }
    }

    /// Selector for a single language mode.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Language`] for malformed identifiers.
    pub fn for_language(language: &str) -> Result<Self, SelectorError> {
        Ok(Self::from(DocumentFilter::language(language)?))
    }

    /// Scores the selector against `document`; `0` when no filter applies.
    #[must_use]
    pub fn score(&self, document: &Document) -> u8 {
        self.filters
            .iter()
            .map(|filter| filter.score(document))
            .max()
            .unwrap_or(0)
    }
}

impl From<DocumentFilter> for DocumentSelector {
    fn from(filter: DocumentFilter) -> Self {
        Self {
            filters: vec![filter],
        }
    }
}

impl fmt::Display for DocumentSelector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.filters.iter().map(ToString::to_string).collect();
        write!(formatter, "[{}]", rendered.join(" | "))
    }
}
