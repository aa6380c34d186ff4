//! Error types surfaced by the command surface.

use thiserror::Error;

/// Errors returned when executing a declaration command.
///
/// Everything except [`CommandError::SerializeResult`] is a usage error: the
/// caller broke the command contract, nothing was queried, and retrying the
/// same invocation cannot succeed.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Arguments are missing, of the wrong shape, or carry a malformed resource.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        /// What was wrong with the arguments.
        message: String,
    },

    /// The resource identifier is well formed but no document is open for it.
    #[error("{resource} not found")]
    DocumentNotFound {
        /// Resource identifier supplied by the caller.
        resource: String,
    },

    /// No command with this name is exposed.
    #[error("unknown command: {name}")]
    UnknownCommand {
        /// Requested command name.
        name: String,
    },

    /// The result could not be serialised to JSON.
    #[error("failed to serialise command result: {0}")]
    SerializeResult(#[from] serde_json::Error),
}

impl CommandError {
    /// Returns `true` for caller-side contract violations.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        match self {
            Self::InvalidArguments { .. }
            | Self::DocumentNotFound { .. }
            | Self::UnknownCommand { .. } => true,
            Self::SerializeResult(_) => false,
        }
    }

    /// Creates an invalid arguments error.
    pub(crate) fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Creates a document not found error.
    pub(crate) fn document_not_found(resource: impl Into<String>) -> Self {
        Self::DocumentNotFound {
            resource: resource.into(),
        }
    }

    /// Creates an unknown command error.
    pub(crate) fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into() }
    }
}
