//! Recording declaration provider and error sink used in tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lsp_types::{Position, Uri};

use crate::provider::{DeclarationProvider, DeclarationResponse, ProviderError};
use crate::sink::{ErrorSink, ProviderFailure};

/// How a stub provider answers every request.
#[derive(Debug, Clone)]
pub enum Answer {
    /// Resolve with the given response (or nothing).
    Respond(Option<DeclarationResponse>),
    /// Reject with the given message.
    Fail(String),
}

/// A request observed by a stub provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Document the request addressed.
    pub uri: Uri,
    /// Cursor position forwarded by the query.
    pub position: Position,
}

/// Order in which providers settled, shared between providers of one test.
#[derive(Debug, Clone, Default)]
pub struct SettleLog {
    shared: Arc<Mutex<Vec<String>>>,
}

impl SettleLog {
    /// Names of the providers in the order they settled.
    #[must_use]
    pub fn order(&self) -> Vec<String> {
        with_lock(&self.shared, |entries| entries.clone())
    }

    fn record(&self, name: &str) {
        with_lock(&self.shared, |entries| entries.push(name.to_owned()));
    }
}

/// Test double that records every request routed through it.
#[derive(Clone)]
pub struct RecordingProvider {
    name: String,
    answer: Answer,
    yields: usize,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    settle_log: SettleLog,
}

impl RecordingProvider {
    /// Creates a provider that answers immediately.
    #[must_use]
    pub fn new(name: impl Into<String>, answer: Answer) -> Self {
        Self {
            name: name.into(),
            answer,
            yields: 0,
            calls: Arc::new(Mutex::new(Vec::new())),
            settle_log: SettleLog::default(),
        }
    }

    /// Suspends `yields` times before answering, delaying settlement.
    #[must_use]
    pub const fn yielding(mut self, yields: usize) -> Self {
        self.yields = yields;
        self
    }

    /// Records settlement in `log`.
    #[must_use]
    pub fn settling_into(mut self, log: &SettleLog) -> Self {
        self.settle_log = log.clone();
        self
    }

    /// Returns a handle that can be used to assert recorded calls.
    #[must_use]
    pub fn handle(&self) -> RecordingProviderHandle {
        RecordingProviderHandle {
            calls: Arc::clone(&self.calls),
        }
    }

    /// Boxes a clone for registration.
    #[must_use]
    pub fn boxed(&self) -> Box<dyn DeclarationProvider> {
        Box::new(self.clone())
    }
}

#[async_trait]
impl DeclarationProvider for RecordingProvider {
    async fn provide_declaration(
        &self,
        uri: &Uri,
        position: Position,
    ) -> Result<Option<DeclarationResponse>, ProviderError> {
        with_lock(&self.calls, |calls| {
            calls.push(RecordedCall {
                uri: uri.clone(),
                position,
            });
        });
        for _ in 0..self.yields {
            tokio::task::yield_now().await;
        }
        self.settle_log.record(&self.name);
        match &self.answer {
            Answer::Respond(response) => Ok(response.clone()),
            Answer::Fail(message) => Err(ProviderError::new(message.clone())),
        }
    }
}

/// Handle that exposes recorded requests for assertions.
#[derive(Clone)]
pub struct RecordingProviderHandle {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingProviderHandle {
    /// Returns the requests the provider observed, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        with_lock(&self.calls, |calls| calls.clone())
    }
}

/// Error sink that keeps every reported failure.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    failures: Arc<Mutex<Vec<ReportedFailure>>>,
}

/// Snapshot of a reported failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedFailure {
    /// Rendered provider identifier.
    pub provider: String,
    /// Message returned by the provider.
    pub message: String,
}

impl RecordingSink {
    /// Failures reported so far.
    #[must_use]
    pub fn failures(&self) -> Vec<ReportedFailure> {
        with_lock(&self.failures, |failures| failures.clone())
    }
}

impl ErrorSink for RecordingSink {
    fn report(&self, failure: ProviderFailure) {
        let reported = ReportedFailure {
            provider: failure.provider().to_string(),
            message: failure.error().message().to_owned(),
        };
        with_lock(&self.failures, |failures| failures.push(reported));
    }
}

fn with_lock<T, R, F>(shared: &Arc<Mutex<T>>, action: F) -> R
where
    F: FnOnce(&mut T) -> R,
{
    let mut guard = shared.lock().unwrap_or_else(|poison| poison.into_inner());
    action(&mut guard)
}
