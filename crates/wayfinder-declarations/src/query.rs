//! Fan-out declaration lookup across registered providers.

use futures::future::join_all;
use lsp_types::{Location, Position};
use tracing::debug;

use crate::DECLARATIONS_TARGET;
use crate::document::Document;
use crate::provider::into_locations;
use crate::registry::DeclarationRegistry;
use crate::sink::{ErrorSink, ProviderFailure};

/// Collects declaration locations for `position` in `document`.
///
/// Every applicable provider is called concurrently and the query waits for
/// all of them to settle. Results are concatenated in registry order, not in
/// the order calls complete. A failing provider is reported to `sink` once
/// and contributes nothing; the query itself never fails.
pub async fn declarations_at_position(
    registry: &DeclarationRegistry,
    document: &Document,
    position: Position,
    sink: &dyn ErrorSink,
) -> Vec<Location> {
    let uri = document.uri();
    let providers = registry.ordered(document);
    debug!(
        target: DECLARATIONS_TARGET,
        uri = %uri.as_str(),
        line = position.line,
        character = position.character,
        providers = providers.len(),
        "querying declaration providers"
    );

    let calls = providers.map(move |entry| async move {
        match entry.provider().provide_declaration(uri, position).await {
            Ok(response) => response,
            Err(error) => {
                sink.report(ProviderFailure::new(entry.id(), uri.clone(), error));
                None
            }
        }
    });
    let slots = join_all(calls).await;

    let locations: Vec<Location> = slots
        .into_iter()
        .flatten()
        .flat_map(into_locations)
        .collect();
    debug!(
        target: DECLARATIONS_TARGET,
        uri = %uri.as_str(),
        declarations = locations.len(),
        "declaration query settled"
    );
    locations
}
