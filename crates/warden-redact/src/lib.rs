//! # warden-redact
//!
//! Keeps personally identifiable information out of log output.
//!
//! - [`filter`] - redaction of `key=value` segments in a message
//! - [`formatter`] - the redacting line formatter and its default field set
//! - [`layer`] - `tracing-subscriber` event formatter, layer and subscriber
//!   factories
//!
//! Nothing here writes to a sink directly: callers choose the writer and own
//! the subscriber's lifecycle.

pub mod filter;
pub mod formatter;
pub mod layer;

pub use filter::{MarkerError, Redactor, check_marker, filter_datum};
pub use formatter::{
    FORMAT_TAG, LogRecord, PII_FIELDS, REDACTION, RedactingFormatter, SEPARATOR,
};
pub use layer::{RedactingEventFormat, redacting_layer, redacting_subscriber};
