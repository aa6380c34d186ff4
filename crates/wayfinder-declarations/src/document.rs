//! Documents and the store that resolves them.
//!
//! The editor owns document content; this crate only needs to resolve a
//! resource identifier to a live [`Document`] handle. [`DocumentStore`] is the
//! seam for that collaborator, and [`OpenDocuments`] is an in-memory store
//! that follows open/change/close notifications.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use lsp_types::{
    DidChangeTextDocumentParams, DidCloseTextDocumentParams, DidOpenTextDocumentParams, Uri,
};
use thiserror::Error;
use tracing::debug;
use wayfinder_config::LanguageAssociations;

use crate::DECLARATIONS_TARGET;
use crate::edits::{self, ChangeError};
use crate::language::{LanguageId, LanguageParseError};

/// Read-only handle to an open text document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    uri: Uri,
    language: LanguageId,
    version: i32,
    text: String,
}

impl Document {
    /// Builds a document handle.
    #[must_use]
    pub fn new(uri: Uri, language: LanguageId, version: i32, text: impl Into<String>) -> Self {
        Self {
            uri,
            language,
            version,
            text: text.into(),
        }
    }

    /// Resource identifier addressing the document.
    #[must_use]
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Language mode assigned to the document.
    #[must_use]
    pub const fn language(&self) -> &LanguageId {
        &self.language
    }

    /// Version reported by the most recent open or change.
    #[must_use]
    pub const fn version(&self) -> i32 {
        self.version
    }

    /// Current document text.
    #[must_use]
    pub const fn text(&self) -> &str {
        self.text.as_str()
    }
}

/// Resolves resource identifiers to live documents.
pub trait DocumentStore: Send + Sync {
    /// Returns the document addressed by `uri`, if it is currently open.
    fn resolve(&self, uri: &Uri) -> Option<Arc<Document>>;
}

/// Errors raised while tracking open documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// No language mode could be inferred for the document.
    #[error("no language mode is associated with {uri}")]
    UnknownLanguage {
        /// Document that could not be classified.
        uri: String,
    },
    /// The language identifier supplied by the client is invalid.
    #[error("document {uri} carries an invalid language mode: {source}")]
    InvalidLanguage {
        /// Document that carried the identifier.
        uri: String,
        /// Parse failure.
        #[source]
        source: LanguageParseError,
    },
    /// A change event could not be applied to the document text.
    #[error("cannot apply change to {uri}: {source}")]
    InvalidChange {
        /// Document that was being changed.
        uri: String,
        /// Why the change did not apply.
        #[source]
        source: ChangeError,
    },
    /// A change or close referenced a document that is not open.
    #[error("document {uri} is not open")]
    NotOpen {
        /// Document that was referenced.
        uri: String,
    },
}

/// In-memory [`DocumentStore`] fed by document synchronisation notifications.
#[derive(Debug, Default)]
pub struct OpenDocuments {
    associations: LanguageAssociations,
    documents: HashMap<String, Arc<Document>>,
}

impl OpenDocuments {
    /// Builds an empty store that classifies documents with `associations`.
    #[must_use]
    pub fn new(associations: LanguageAssociations) -> Self {
        Self {
            associations,
            documents: HashMap::new(),
        }
    }

    /// Records an opened document.
    ///
    /// A blank `language_id` falls back to the extension associations.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when no valid language mode can be assigned.
    pub fn did_open(
        &mut self,
        params: DidOpenTextDocumentParams,
    ) -> Result<Arc<Document>, DocumentError> {
        let item = params.text_document;
        let language = self.language_for(&item.uri, &item.language_id)?;
        let document = Arc::new(Document::new(item.uri, language, item.version, item.text));
        debug!(
            target: DECLARATIONS_TARGET,
            uri = %document.uri().as_str(),
            language = %document.language(),
            version = document.version(),
            "document opened"
        );
        self.documents
            .insert(key(document.uri()), Arc::clone(&document));
        Ok(document)
    }

    /// Applies full or ranged changes to an open document, in order.
    ///
    /// The stored document is left untouched when any change fails.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotOpen`] when the document is unknown and
    /// [`DocumentError::InvalidChange`] when a range does not fit the text.
    pub fn did_change(
        &mut self,
        params: DidChangeTextDocumentParams,
    ) -> Result<Arc<Document>, DocumentError> {
        let uri = params.text_document.uri;
        let entry = self
            .documents
            .get_mut(&key(&uri))
            .ok_or_else(|| DocumentError::NotOpen {
                uri: uri.as_str().to_owned(),
            })?;
        let text = edits::apply_changes(entry.text(), params.content_changes).map_err(|source| {
            DocumentError::InvalidChange {
                uri: uri.as_str().to_owned(),
                source,
            }
        })?;
        let updated = Arc::new(Document::new(
            uri,
            entry.language().clone(),
            params.text_document.version,
            text,
        ));
        *entry = Arc::clone(&updated);
        Ok(updated)
    }

    /// Forgets a closed document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotOpen`] when the document is unknown.
    pub fn did_close(&mut self, params: DidCloseTextDocumentParams) -> Result<(), DocumentError> {
        let uri = params.text_document.uri;
        match self.documents.remove(&key(&uri)) {
            Some(_) => {
                debug!(target: DECLARATIONS_TARGET, uri = %uri.as_str(), "document closed");
                Ok(())
            }
            None => Err(DocumentError::NotOpen {
                uri: uri.as_str().to_owned(),
            }),
        }
    }

    /// Number of open documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` when no documents are open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn language_for(&self, uri: &Uri, language_id: &str) -> Result<LanguageId, DocumentError> {
        let raw = if language_id.trim().is_empty() {
            self.associations
                .language_for_path(uri.path().as_str())
                .ok_or_else(|| DocumentError::UnknownLanguage {
                    uri: uri.as_str().to_owned(),
                })?
        } else {
            language_id
        };
        LanguageId::from_str(raw).map_err(|source| DocumentError::InvalidLanguage {
            uri: uri.as_str().to_owned(),
            source,
        })
    }
}

impl DocumentStore for OpenDocuments {
    fn resolve(&self, uri: &Uri) -> Option<Arc<Document>> {
        self.documents.get(&key(uri)).cloned()
    }
}

fn key(uri: &Uri) -> String {
    uri.as_str().to_owned()
}
