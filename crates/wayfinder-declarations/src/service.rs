//! Facade that owns the registry, the document store and the error sink.

use std::fmt;
use std::sync::Arc;

use lsp_types::{Location, Position};
use serde_json::Value;
use tracing::debug;
use wayfinder_config::Config;

use crate::DECLARATIONS_TARGET;
use crate::command::{EXECUTE_DECLARATION_PROVIDER, execute_declaration_command};
use crate::document::{Document, DocumentStore, OpenDocuments};
use crate::errors::CommandError;
use crate::provider::DeclarationProvider;
use crate::query::declarations_at_position;
use crate::registry::{DeclarationRegistry, ProviderId};
use crate::selector::DocumentSelector;
use crate::sink::{ErrorSink, TracingErrorSink};
use crate::telemetry::{self, TelemetryError};

/// Serves declaration lookups for one editor instance.
///
/// Language integrations register providers at startup; the command surface
/// and direct callers then query through [`DeclarationService::declarations`]
/// or [`DeclarationService::execute_command`].
pub struct DeclarationService<S = OpenDocuments> {
    registry: DeclarationRegistry,
    documents: S,
    sink: Arc<dyn ErrorSink>,
}

impl<S: fmt::Debug> fmt::Debug for DeclarationService<S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DeclarationService")
            .field("registry", &self.registry)
            .field("documents", &self.documents)
            .finish_non_exhaustive()
    }
}

impl DeclarationService<OpenDocuments> {
    /// Builds a service with an in-memory document store classified by `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(OpenDocuments::new(config.languages().clone()))
    }

    /// Installs global telemetry for `config`, then builds the service.
    ///
    /// For hosts that do not install a `tracing` subscriber of their own.
    /// Repeated calls reuse the subscriber installed by the first one.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError`] when the filter is invalid or another global
    /// subscriber is already installed.
    pub fn bootstrap(config: &Config) -> Result<Self, TelemetryError> {
        telemetry::initialise(config)?;
        Ok(Self::from_config(config))
    }
}

impl<S: DocumentStore> DeclarationService<S> {
    /// Builds a service that reports provider failures through `tracing`.
    #[must_use]
    pub fn new(documents: S) -> Self {
        Self::with_sink(documents, Arc::new(TracingErrorSink))
    }

    /// Builds a service that reports provider failures to `sink`.
    #[must_use]
    pub fn with_sink(documents: S, sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            registry: DeclarationRegistry::new(),
            documents,
            sink,
        }
    }

    /// Registers a provider; see [`DeclarationRegistry::register`].
    pub fn register_provider(
        &mut self,
        selector: DocumentSelector,
        provider: Box<dyn DeclarationProvider>,
    ) -> ProviderId {
        self.registry.register(selector, provider)
    }

    /// Removes a provider; see [`DeclarationRegistry::unregister`].
    pub fn unregister_provider(&mut self, id: ProviderId) -> bool {
        self.registry.unregister(id)
    }

    /// Registered providers.
    #[must_use]
    pub const fn registry(&self) -> &DeclarationRegistry {
        &self.registry
    }

    /// Document store used to resolve command arguments.
    #[must_use]
    pub const fn documents(&self) -> &S {
        &self.documents
    }

    /// Mutable access to the document store, e.g. to apply sync notifications.
    pub const fn documents_mut(&mut self) -> &mut S {
        &mut self.documents
    }

    /// Looks up declarations for an already resolved document.
    pub async fn declarations(&self, document: &Document, position: Position) -> Vec<Location> {
        declarations_at_position(&self.registry, document, position, self.sink.as_ref()).await
    }

    /// Executes a named command with JSON arguments and returns a JSON result.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownCommand`] for names other than
    /// [`EXECUTE_DECLARATION_PROVIDER`], usage errors for invalid arguments,
    /// and [`CommandError::SerializeResult`] if the result cannot be encoded.
    pub async fn execute_command(&self, name: &str, arguments: &Value) -> Result<Value, CommandError> {
        debug!(target: DECLARATIONS_TARGET, command = name, "dispatching command");
        match name {
            EXECUTE_DECLARATION_PROVIDER => {
                let locations = execute_declaration_command(
                    &self.registry,
                    &self.documents,
                    self.sink.as_ref(),
                    arguments,
                )
                .await?;
                Ok(serde_json::to_value(locations)?)
            }
            other => Err(CommandError::unknown_command(other)),
        }
    }
}
