//! Log transport selection and subscriber installation.
//!
//! # Responsibilities
//! - Pick the transport for the deployment environment
//! - Install the global `tracing` subscriber once at startup
//! - Apply the configured level, overridable through `RUST_LOG`
//!
//! # Design Decisions
//! - Development renders colorized, human-readable records
//! - Every other environment writes one flattened JSON object per line
//! - Record events are written as their serialized record; other events use
//!   the stock JSON format

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{Format, Json, JsonFields, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggerConfig;
use crate::observability::sink::{RECORD_FIELD, RECORD_TARGET};

/// Environment name that selects the pretty transport.
pub const DEVELOPMENT: &str = "development";

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Colorized multi-line rendering for local work.
    Pretty,
    /// One JSON object per line for log shippers.
    Json,
}

impl Transport {
    pub fn for_environment(environment: &str) -> Self {
        if environment == DEVELOPMENT {
            Transport::Pretty
        } else {
            Transport::Json
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct LoggingInitError(String);

/// Install the global subscriber for `config`.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &LoggerConfig) -> Result<Transport, LoggingInitError> {
    let transport = config.transport();
    let builder = tracing_subscriber::fmt().with_env_filter(filter_for(config));

    let installed = match transport {
        Transport::Pretty => builder
            .pretty()
            .with_ansi(true)
            .with_target(false)
            .try_init()
            .map_err(|e| e.to_string()),
        Transport::Json => json_subscriber(filter_for(config), std::io::stdout)
            .try_init()
            .map_err(|e| e.to_string()),
    };
    installed.map_err(LoggingInitError)?;

    tracing::debug!(
        level = %config.level,
        service = %config.service,
        environment = %config.environment,
        transport = ?transport,
        "Logging initialized"
    );
    Ok(transport)
}

fn filter_for(config: &LoggerConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
}

/// The JSON-lines subscriber, writing to `writer`.
pub fn json_subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let stock = tracing_subscriber::fmt::format()
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .fmt_fields(JsonFields::new())
        .event_format(RecordLines { stock })
        .finish()
}

/// Writes record events as the JSON object they carry.
struct RecordLines {
    stock: Format<Json>,
}

impl<S, N> FormatEvent<S, N> for RecordLines
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        if event.metadata().target() == RECORD_TARGET {
            let mut line = RecordLine(None);
            event.record(&mut line);
            if let Some(line) = line.0 {
                return writeln!(writer, "{}", line);
            }
        }
        self.stock.format_event(ctx, writer, event)
    }
}

struct RecordLine(Option<String>);

impl Visit for RecordLine {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == RECORD_FIELD {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}
