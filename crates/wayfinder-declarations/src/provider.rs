//! Abstractions over declaration provider implementations.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use lsp_types::{GotoDefinitionResponse, Location, Position, Uri};
use thiserror::Error;

/// Answer produced by a provider: one location, several, or location links.
///
/// Shares its shape with the `textDocument/declaration` response so providers
/// backed by a language server can forward replies unchanged.
pub type DeclarationResponse = GotoDefinitionResponse;

/// Errors reported by provider implementations.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl ProviderError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-friendly description without the optional source.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Behaviour required from declaration providers.
///
/// Implementations may answer with nothing (`Ok(None)`), with any
/// [`DeclarationResponse`] variant, or fail. Absent and empty answers are
/// treated the same by the query: neither contributes a location.
#[async_trait]
pub trait DeclarationProvider: Send + Sync {
    /// Looks up the declaration of the symbol at `position` in `uri`.
    async fn provide_declaration(
        &self,
        uri: &Uri,
        position: Position,
    ) -> Result<Option<DeclarationResponse>, ProviderError>;
}

impl fmt::Debug for dyn DeclarationProvider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("DeclarationProvider")
    }
}

/// Flattens a provider answer into declaration locations.
///
/// Location links resolve to their target selection range, which is the
/// span an editor navigates to.
#[must_use]
pub fn into_locations(response: DeclarationResponse) -> Vec<Location> {
    match response {
        GotoDefinitionResponse::Scalar(location) => vec![location],
        GotoDefinitionResponse::Array(locations) => locations,
        GotoDefinitionResponse::Link(links) => links
            .into_iter()
            .map(|link| Location {
                uri: link.target_uri,
                range: link.target_selection_range,
            })
            .collect(),
    }
}
