//! Command adapter for declaration lookups.
//!
//! The editor's command framework invokes `_executeDefinitionProvider` with a
//! JSON argument object:
//!
//! ```json
//! {"resource": "file:///src/main.rs", "position": {"line": 4, "character": 10}}
//! ```
//!
//! The adapter validates the arguments, resolves the document, and delegates
//! to [`declarations_at_position`]. Every validation failure is reported
//! before any provider is invoked.

use lsp_types::{Location, Position, Uri};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::DECLARATIONS_TARGET;
use crate::document::DocumentStore;
use crate::errors::CommandError;
use crate::query::declarations_at_position;
use crate::registry::DeclarationRegistry;
use crate::sink::ErrorSink;
use crate::uri;

/// Name under which the declaration lookup is exposed.
pub const EXECUTE_DECLARATION_PROVIDER: &str = "_executeDefinitionProvider";

/// Parsed arguments for the declaration command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationArgs {
    /// Document to query.
    pub resource: Uri,
    /// Zero-based cursor position.
    pub position: Position,
}

impl DeclarationArgs {
    /// Parses the command's JSON argument object.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidArguments`] when the value is not an
    /// object, a field is missing, `resource` is not an absolute resource
    /// identifier, or `position` is not a `{line, character}` object.
    pub fn parse(arguments: &Value) -> Result<Self, CommandError> {
        let object = arguments.as_object().ok_or_else(|| {
            CommandError::invalid_arguments("expected an object with `resource` and `position`")
        })?;

        let raw_resource = object
            .get("resource")
            .ok_or_else(|| CommandError::invalid_arguments("missing required `resource`"))?
            .as_str()
            .ok_or_else(|| CommandError::invalid_arguments("`resource` must be a string"))?;
        let resource = uri::parse_resource(raw_resource).ok_or_else(|| {
            CommandError::invalid_arguments(format!("invalid resource identifier: {raw_resource}"))
        })?;

        let raw_position = object
            .get("position")
            .ok_or_else(|| CommandError::invalid_arguments("missing required `position`"))?;
        let position = Position::deserialize(raw_position).map_err(|error| {
            CommandError::invalid_arguments(format!("invalid position: {error}"))
        })?;

        Ok(Self { resource, position })
    }
}

/// Runs the declaration command against a registry and document store.
///
/// # Errors
///
/// Returns a usage error when the arguments are invalid or the resource does
/// not resolve to an open document. Provider failures are never surfaced
/// here; they go to `sink`.
pub async fn execute_declaration_command(
    registry: &DeclarationRegistry,
    documents: &dyn DocumentStore,
    sink: &dyn ErrorSink,
    arguments: &Value,
) -> Result<Vec<Location>, CommandError> {
    let args = DeclarationArgs::parse(arguments)?;
    debug!(
        target: DECLARATIONS_TARGET,
        command = EXECUTE_DECLARATION_PROVIDER,
        uri = %args.resource.as_str(),
        line = args.position.line,
        character = args.position.character,
        "handling declaration command"
    );

    let document = documents
        .resolve(&args.resource)
        .ok_or_else(|| CommandError::document_not_found(args.resource.as_str()))?;

    Ok(declarations_at_position(registry, &document, args.position, sink).await)
}
