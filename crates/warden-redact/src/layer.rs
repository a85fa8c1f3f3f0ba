//! `tracing` integration.
//!
//! [`RedactingEventFormat`] plugs a [`RedactingFormatter`] into
//! `tracing-subscriber`'s fmt layer, so every event is redacted before it is
//! written. Structured fields are appended to the message as extra
//! `key=value` segments and go through the same redaction. A sensitive
//! field is redacted whole from its recorded value, so a value containing
//! the separator cannot spill into a segment of its own:
//!
//! ```text
//! tracing::info!(email = %user.email, role = "admin", "login");
//! // [WARDEN] app::auth INFO 2024-01-01 00:00:00,000: login;email=***;role=admin
//! ```

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::{DefaultFields, Writer};
use tracing_subscriber::fmt::{
    self as fmt_layer, FmtContext, FormatEvent, FormatFields, MakeWriter,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

use crate::filter::Redactor;
use crate::formatter::{LogRecord, RedactingFormatter};

/// Event formatter that renders through a [`RedactingFormatter`].
#[derive(Debug, Clone, Default)]
pub struct RedactingEventFormat {
    formatter: RedactingFormatter,
}

impl RedactingEventFormat {
    /// Wraps `formatter`.
    pub fn new(formatter: RedactingFormatter) -> Self {
        Self { formatter }
    }
}

impl<S, N> FormatEvent<S, N> for RedactingEventFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let record = event_record(event, self.formatter.redactor());
        writeln!(writer, "{}", self.formatter.format(&record))
    }
}

/// Builds a fmt layer writing redacted lines to `writer`.
pub fn redacting_layer<S, W>(
    formatter: RedactingFormatter,
    writer: W,
) -> fmt_layer::Layer<S, DefaultFields, RedactingEventFormat, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt_layer::layer()
        .event_format(RedactingEventFormat::new(formatter))
        .with_writer(writer)
}

/// Builds a standalone subscriber that redacts every event at or above
/// `level` and writes it to `writer`.
///
/// The caller owns the returned subscriber: install it with
/// `tracing::subscriber::set_global_default`, or scope it with
/// `tracing::subscriber::with_default`.
pub fn redacting_subscriber<W>(
    formatter: RedactingFormatter,
    writer: W,
    level: LevelFilter,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(level)
        .with(redacting_layer(formatter, writer))
}

fn event_record(event: &Event<'_>, redactor: &Redactor) -> LogRecord {
    let mut visitor = MessageVisitor::new(redactor);
    event.record(&mut visitor);

    let metadata = event.metadata();
    LogRecord::new(metadata.target(), *metadata.level(), visitor.finish())
}

struct MessageVisitor<'r> {
    redactor: &'r Redactor,
    message: String,
    fields: Vec<String>,
}

impl<'r> MessageVisitor<'r> {
    fn new(redactor: &'r Redactor) -> Self {
        Self {
            redactor,
            message: String::new(),
            fields: Vec::new(),
        }
    }

    fn push(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = value,
            // Bridged `log` metadata.
            name if name.starts_with("log.") => {}
            name if self.redactor.is_sensitive(name) => {
                self.fields
                    .push(format!("{name}={}", self.redactor.redaction()));
            }
            name => self.fields.push(format!("{name}={value}")),
        }
    }

    fn finish(self) -> String {
        let separator = self.redactor.separator();
        let mut message = self.message;
        for field in self.fields {
            if !message.is_empty() && !message.ends_with(separator) {
                message.push(separator);
            }
            message.push_str(&field);
        }
        message
    }
}

impl Visit for MessageVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}
