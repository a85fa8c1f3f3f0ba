//! Redacting log formatter.
//!
//! [`RedactingFormatter`] is the last step before a log line reaches its
//! sink: it redacts the record's message and renders it with a fixed
//! template,
//!
//! ```text
//! [WARDEN] <logger name> <LEVEL> <YYYY-MM-DD HH:MM:SS,mmm>: <message>
//! ```

use time::{OffsetDateTime, macros::format_description};
use tracing::Level;

use crate::filter::{MarkerError, Redactor};

/// Fields treated as personally identifiable by default.
pub const PII_FIELDS: [&str; 5] = ["name", "email", "phone", "ssn", "password"];

/// Marker substituted for redacted values.
pub const REDACTION: &str = "***";

/// Separator between `key=value` segments of a message.
pub const SEPARATOR: char = ';';

/// Tag opening every formatted line.
pub const FORMAT_TAG: &str = "WARDEN";

/// A log record on its way to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Name of the emitting logger.
    pub name: String,
    /// Severity.
    pub level: Level,
    /// Creation time.
    pub timestamp: OffsetDateTime,
    /// The raw message.
    pub message: String,
}

impl LogRecord {
    /// Creates a record stamped with the current UTC time.
    pub fn new(name: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level,
            timestamp: OffsetDateTime::now_utc(),
            message: message.into(),
        }
    }
}

/// Formatter that redacts sensitive fields before rendering.
#[derive(Debug, Clone)]
pub struct RedactingFormatter {
    redactor: Redactor,
}

impl RedactingFormatter {
    /// Creates a formatter for `fields` with the default marker and separator.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_options(fields, REDACTION, SEPARATOR)
    }

    /// Creates a formatter with an explicit marker and separator.
    ///
    /// The marker is not checked; see [`Redactor::new`]. Use
    /// [`RedactingFormatter::try_with_options`] for configured values.
    pub fn with_options<I, S>(fields: I, redaction: impl Into<String>, separator: char) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            redactor: Redactor::new(fields, redaction, separator),
        }
    }

    /// Creates a formatter with an explicit marker and separator, rejecting
    /// markers that would break idempotent redaction.
    ///
    /// # Errors
    ///
    /// Returns a [`MarkerError`] for an empty or separator-bearing marker.
    pub fn try_with_options<I, S>(
        fields: I,
        redaction: impl Into<String>,
        separator: char,
    ) -> Result<Self, MarkerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            redactor: Redactor::try_new(fields, redaction, separator)?,
        })
    }

    /// The underlying redactor.
    #[must_use]
    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    /// Returns a copy of `record` with its message redacted.
    #[must_use]
    pub fn redact(&self, record: &LogRecord) -> LogRecord {
        LogRecord {
            message: self.redactor.redact(&record.message),
            ..record.clone()
        }
    }

    /// Redacts `record` and renders it as a single line.
    #[must_use]
    pub fn format(&self, record: &LogRecord) -> String {
        let redacted = self.redact(record);
        format!(
            "[{FORMAT_TAG}] {} {} {:<15}: {}",
            redacted.name,
            redacted.level,
            asctime(redacted.timestamp),
            redacted.message
        )
    }
}

fn asctime(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second],[subsecond digits:3]"
        ))
        .unwrap_or_default()
}

impl Default for RedactingFormatter {
    fn default() -> Self {
        Self::new(PII_FIELDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn record(message: &str) -> LogRecord {
        LogRecord {
            name: "user_data".to_string(),
            level: Level::INFO,
            timestamp: datetime!(2019-11-19 18:24:25.105 UTC),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_format_template() {
        let formatter = RedactingFormatter::new(["email", "ssn", "password"]);
        let line = formatter.format(&record(
            "name=Bob;email=bob@dylan.com;ssn=000-123-0000;password=bobby2019;",
        ));
        assert_eq!(
            line,
            "[WARDEN] user_data INFO 2019-11-19 18:24:25,105: name=Bob;email=***;ssn=***;password=***;"
        );
    }

    #[test]
    fn test_redact_returns_new_record() {
        let formatter = RedactingFormatter::default();
        let original = record("email=a@b.c;role=admin");

        let redacted = formatter.redact(&original);
        assert_eq!(redacted.message, "email=***;role=admin");
        assert_eq!(original.message, "email=a@b.c;role=admin");
        assert_eq!(redacted.name, original.name);
        assert_eq!(redacted.timestamp, original.timestamp);
    }

    #[test]
    fn test_custom_options() {
        let formatter = RedactingFormatter::with_options(["phone"], "<hidden>", ',');
        let line = formatter.format(&record("phone=555-0100,city=Paris"));
        assert!(line.ends_with(": phone=<hidden>,city=Paris"), "{line}");
    }

    #[test]
    fn test_unterminated_message_does_not_fail() {
        let formatter = RedactingFormatter::default();
        let line = formatter.format(&record("role=admin;password=hunter2 and more"));
        assert!(line.ends_with(": role=admin;password=***"), "{line}");
        assert!(!line.contains("hunter2"));
    }

    #[test]
    fn try_with_options_checks_marker() {
        assert_eq!(
            RedactingFormatter::try_with_options(PII_FIELDS, "", ';').unwrap_err(),
            MarkerError::Empty
        );
        let formatter = RedactingFormatter::try_with_options(PII_FIELDS, "[x]", '|').unwrap();
        assert_eq!(formatter.redactor().redact("email=a@b.c|ip=1"), "email=[x]|ip=1");
    }
}
