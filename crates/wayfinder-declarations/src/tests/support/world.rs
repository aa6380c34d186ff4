//! BDD test world encapsulating the service and stub providers.

use std::collections::HashMap;
use std::sync::Arc;

use lsp_types::{GotoDefinitionResponse, Location};
use serde_json::{Value, json};
use tokio::runtime::{Builder, Runtime};
use wayfinder_config::Config;

use crate::document::OpenDocuments;
use crate::errors::CommandError;
use crate::selector::DocumentSelector;
use crate::service::DeclarationService;

use super::recording_provider::{
    Answer, RecordedCall, RecordingProvider, RecordingProviderHandle, RecordingSink,
};
use super::{did_open_params, location};

/// Shared state exercised by BDD step implementations.
pub struct TestWorld {
    runtime: Runtime,
    /// Service under test.
    pub service: DeclarationService,
    /// Sink receiving provider failures.
    pub sink: RecordingSink,
    handles: HashMap<String, RecordingProviderHandle>,
    /// Outcome of the last command.
    pub last_result: Option<Result<Vec<Location>, CommandError>>,
}

impl Default for TestWorld {
    fn default() -> Self {
        let runtime = Builder::new_current_thread()
            .build()
            .unwrap_or_else(|error| panic!("failed to build test runtime: {error}"));
        let sink = RecordingSink::default();
        let service = DeclarationService::with_sink(
            OpenDocuments::new(Config::default().languages().clone()),
            Arc::new(sink.clone()),
        );
        Self {
            runtime,
            service,
            sink,
            handles: HashMap::new(),
            last_result: None,
        }
    }
}

impl TestWorld {
    /// Opens a document so commands can resolve it.
    pub fn open(&mut self, uri: &str) {
        if let Err(error) = self.service.documents_mut().did_open(did_open_params(uri)) {
            panic!("failed to open {uri}: {error}");
        }
    }

    /// Registers a stub provider under `name` for `language`.
    pub fn register(&mut self, name: &str, language: &str, answer: Answer) {
        let selector = DocumentSelector::for_language(language)
            .unwrap_or_else(|error| panic!("invalid selector for {language}: {error}"));
        let provider = RecordingProvider::new(name, answer);
        self.handles.insert(name.to_owned(), provider.handle());
        self.service.register_provider(selector, provider.boxed());
    }

    /// Registers a provider answering with a single location.
    pub fn register_answering(&mut self, name: &str, language: &str, uri: &str, line: u32) {
        let response = GotoDefinitionResponse::Array(vec![location(uri, line)]);
        self.register(name, language, Answer::Respond(Some(response)));
    }

    /// Executes `command` with the supplied JSON arguments.
    pub fn execute(&mut self, command: &str, arguments: &Value) {
        let outcome = self
            .runtime
            .block_on(self.service.execute_command(command, arguments));
        self.last_result = Some(outcome.map(|value| {
            serde_json::from_value(value)
                .unwrap_or_else(|error| panic!("command returned non-location JSON: {error}"))
        }));
    }

    /// Executes the declaration command for `resource` at `line:character`.
    pub fn request(&mut self, command: &str, resource: &str, line: u32, character: u32) {
        let arguments = json!({
            "resource": resource,
            "position": {"line": line, "character": character},
        });
        self.execute(command, &arguments);
    }

    /// Recorded calls for the provider registered as `name`.
    #[must_use]
    pub fn calls(&self, name: &str) -> Vec<RecordedCall> {
        self.handles
            .get(name)
            .map(RecordingProviderHandle::calls)
            .unwrap_or_else(|| panic!("no provider registered as {name}"))
    }

    /// Successful locations from the last command.
    #[must_use]
    pub fn locations(&self) -> &[Location] {
        match &self.last_result {
            Some(Ok(locations)) => locations,
            Some(Err(error)) => panic!("expected success but got error: {error}"),
            None => panic!("no command executed"),
        }
    }

    /// Error from the last command.
    #[must_use]
    pub fn error(&self) -> &CommandError {
        match &self.last_result {
            Some(Err(error)) => error,
            Some(Ok(locations)) => panic!("expected an error but got {locations:?}"),
            None => panic!("no command executed"),
        }
    }
}
