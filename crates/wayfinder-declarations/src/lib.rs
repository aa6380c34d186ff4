//! Go-to-declaration lookup across pluggable providers.
//!
//! Language integrations register [`DeclarationProvider`]s against a
//! [`DocumentSelector`]. A lookup asks the [`DeclarationRegistry`] for the
//! providers applicable to a document, calls them all concurrently, and
//! concatenates their answers in registry order. A provider that fails is
//! reported to an [`ErrorSink`] and skipped, so one broken integration cannot
//! take navigation down for every other one.
//!
//! [`DeclarationService`] bundles the registry with a [`DocumentStore`] and
//! exposes the lookup as the `_executeDefinitionProvider` command.

#![deny(missing_docs)]

mod command;
mod document;
mod edits;
mod errors;
mod language;
mod provider;
mod query;
mod registry;
mod selector;
mod service;
mod sink;
pub mod telemetry;
mod uri;

#[cfg(test)]
mod tests;

pub use command::{DeclarationArgs, EXECUTE_DECLARATION_PROVIDER, execute_declaration_command};
pub use document::{Document, DocumentError, DocumentStore, OpenDocuments};
pub use edits::ChangeError;
pub use errors::CommandError;
pub use language::{LanguageId, LanguageParseError};
pub use provider::{DeclarationProvider, DeclarationResponse, ProviderError, into_locations};
pub use query::declarations_at_position;
pub use registry::{DeclarationRegistry, OrderedProviders, ProviderId, ProviderRef};
pub use selector::{DocumentFilter, DocumentSelector, SelectorError};
pub use service::DeclarationService;
pub use sink::{ErrorSink, ProviderFailure, TracingErrorSink};

/// Tracing target for declaration lookups.
pub(crate) const DECLARATIONS_TARGET: &str = concat!(module_path!(), "::declarations");
