//! Reporting of provider failures that a query recovered from.

use lsp_types::Uri;
use thiserror::Error;
use tracing::warn;

use crate::DECLARATIONS_TARGET;
use crate::provider::ProviderError;
use crate::registry::ProviderId;

/// A provider call that failed and was dropped from a query's result.
#[derive(Debug, Error)]
#[error(
    "declaration provider {provider} failed for {resource}: {source}",
    resource = .uri.as_str()
)]
pub struct ProviderFailure {
    provider: ProviderId,
    uri: Uri,
    #[source]
    source: ProviderError,
}

impl ProviderFailure {
    pub(crate) const fn new(provider: ProviderId, uri: Uri, source: ProviderError) -> Self {
        Self {
            provider,
            uri,
            source,
        }
    }

    /// Provider whose call failed.
    #[must_use]
    pub const fn provider(&self) -> ProviderId {
        self.provider
    }

    /// Document the query was issued for.
    #[must_use]
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Error returned by the provider.
    #[must_use]
    pub const fn error(&self) -> &ProviderError {
        &self.source
    }
}

/// Destination for failures that must not abort a query.
///
/// Reporting is fire-and-forget: implementations must not block and cannot
/// influence the query's result.
pub trait ErrorSink: Send + Sync {
    /// Records a recovered provider failure.
    fn report(&self, failure: ProviderFailure);
}

/// Default sink that emits each failure as a `tracing` warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, failure: ProviderFailure) {
        warn!(
            target: DECLARATIONS_TARGET,
            provider = %failure.provider(),
            uri = %failure.uri().as_str(),
            error = %failure.error(),
            "declaration provider failed; continuing without its results"
        );
    }
}
