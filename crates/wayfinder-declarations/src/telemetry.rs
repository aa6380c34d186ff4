//! Structured telemetry for declaration lookups.
//!
//! Lookups emit debug events for registration and queries, and the default
//! error sink emits a warning for every provider failure, all under the
//! `wayfinder_declarations::declarations` target. A host either installs the
//! configured subscriber process-wide with [`initialise`] or scopes one built
//! by [`dispatch`] to a thread with `tracing::dispatcher::set_default`.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::Dispatch;
use tracing::dispatcher::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::{self, MakeWriter};
use wayfinder_config::{Config, LogFormat};

static GLOBAL_DISPATCH: OnceCell<()> = OnceCell::new();

/// Errors raised while configuring telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter expression does not parse.
    #[error("invalid log filter '{filter}': {source}")]
    Filter {
        /// Filter expression as configured.
        filter: String,
        /// Directive parse failure.
        #[source]
        source: ParseError,
    },
    /// A global subscriber was installed by someone else first.
    #[error("cannot install the global subscriber: {0}")]
    AlreadyInstalled(#[from] SetGlobalDefaultError),
}

/// Builds a dispatcher that writes records for `config` to `writer`.
///
/// Records are never coloured, which keeps captured output comparable.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the configured filter is invalid.
pub fn dispatch<W>(config: &Config, writer: W) -> Result<Dispatch, TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    build_dispatch(config, writer, false)
}

/// Installs the configured subscriber as the process-wide default, once.
///
/// Records go to stderr, coloured only for compact output on a terminal.
/// Every call validates `config`; only the first successful one installs.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an invalid filter and
/// [`TelemetryError::AlreadyInstalled`] when another global subscriber won.
pub fn initialise(config: &Config) -> Result<(), TelemetryError> {
    let dispatch = build_dispatch(config, io::stderr, io::stderr().is_terminal())?;
    GLOBAL_DISPATCH.get_or_try_init(|| tracing::dispatcher::set_global_default(dispatch))?;
    Ok(())
}

fn build_dispatch<W>(config: &Config, writer: W, terminal: bool) -> Result<Dispatch, TelemetryError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(config.log_filter()).map_err(|source| TelemetryError::Filter {
        filter: config.log_filter().to_owned(),
        source,
    })?;
    let format = config.log_format();
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .with_ansi(terminal && !format.is_structured())
        .with_timer(fmt::time::UtcTime::rfc_3339());

    Ok(match format {
        LogFormat::Json => Dispatch::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Dispatch::new(builder.compact().finish()),
    })
}
