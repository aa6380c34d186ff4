//! Shared fixtures and helpers for declaration tests.

mod captured_log;
mod recording_provider;
mod world;

use std::str::FromStr;
use std::sync::Arc;

use lsp_types::{
    DidOpenTextDocumentParams, Location, Position, Range, TextDocumentItem, Uri,
};
use rstest::fixture;

use crate::document::{Document, OpenDocuments};
use crate::language::LanguageId;

pub use captured_log::CapturedLog;
pub use recording_provider::{
    Answer, RecordedCall, RecordingProvider, RecordingProviderHandle, RecordingSink,
    ReportedFailure, SettleLog,
};
pub use world::TestWorld;

/// Common URI used by declaration tests.
#[fixture]
pub fn sample_uri() -> Uri {
    parse_uri("file:///workspace/src/main.rs")
}

/// Rust document addressed by [`sample_uri`].
#[fixture]
pub fn rust_document() -> Document {
    Document::new(
        sample_uri(),
        LanguageId::from_str("rust").expect("valid language"),
        1,
        "fn main() { helper(); }",
    )
}

/// Parses a test URI, panicking on malformed input.
#[must_use]
pub fn parse_uri(value: &str) -> Uri {
    Uri::from_str(value).unwrap_or_else(|error| panic!("invalid test URI {value}: {error}"))
}

/// Builds a location at the start of `line` in `uri`.
#[must_use]
pub fn location(uri: &str, line: u32) -> Location {
    Location::new(
        parse_uri(uri),
        Range::new(Position::new(line, 0), Position::new(line, 1)),
    )
}

/// Builds a did-open notification with an inferred language mode.
#[must_use]
pub fn did_open_params(uri: &str) -> DidOpenTextDocumentParams {
    DidOpenTextDocumentParams {
        text_document: TextDocumentItem {
            uri: parse_uri(uri),
            language_id: String::new(),
            version: 1,
            text: String::from("fn main() {}"),
        },
    }
}

/// Opens `uri` in a fresh store, returning the shared handle.
#[must_use]
pub fn open_document(store: &mut OpenDocuments, uri: &str) -> Arc<Document> {
    store
        .did_open(did_open_params(uri))
        .unwrap_or_else(|error| panic!("failed to open {uri}: {error}"))
}
