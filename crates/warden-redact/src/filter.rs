//! Field-level redaction of `key=value` messages.
//!
//! A message is a sequence of segments separated by a single separator
//! character. A segment whose key (the text before its first `=`, ignoring
//! surrounding whitespace) is a sensitive field has everything after that
//! `=` replaced by the redaction marker. Every other byte of the message,
//! separators included, is kept as is.
//!
//! ```
//! use warden_redact::filter_datum;
//!
//! let out = filter_datum(
//!     &["email", "name"],
//!     "***",
//!     "email=alice@example.com;name=Alice;role=admin",
//!     ';',
//! );
//! assert_eq!(out, "email=***;name=***;role=admin");
//! ```

use std::collections::HashSet;

use thiserror::Error;

/// A redaction marker that would break idempotent redaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkerError {
    #[error("must not be empty")]
    Empty,

    #[error("must not contain the separator '{0}'")]
    ContainsSeparator(char),
}

/// Checks that `redaction` can mark a value without creating new segments.
///
/// Redacting an already redacted message is only a no-op when the marker is
/// non-empty and free of `separator`.
///
/// # Errors
///
/// Returns the [`MarkerError`] describing the violation.
pub fn check_marker(redaction: &str, separator: char) -> Result<(), MarkerError> {
    if redaction.is_empty() {
        return Err(MarkerError::Empty);
    }
    if redaction.contains(separator) {
        return Err(MarkerError::ContainsSeparator(separator));
    }
    Ok(())
}

/// Redacts the values of `fields` in `message`.
///
/// Keys are matched exactly and case-sensitively; `name` does not match
/// `username`. A trailing `key=` segment with no closing separator is
/// redacted to the end of the message.
#[must_use]
pub fn filter_datum<S: AsRef<str>>(
    fields: &[S],
    redaction: &str,
    message: &str,
    separator: char,
) -> String {
    if fields.is_empty() {
        return message.to_string();
    }
    redact_segments(message, separator, redaction, |key| {
        fields.iter().any(|field| field.as_ref() == key)
    })
}

/// A reusable redaction configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redactor {
    fields: HashSet<String>,
    redaction: String,
    separator: char,
}

impl Redactor {
    /// Creates a redactor for `fields`.
    ///
    /// The marker is not checked; callers must pass one accepted by
    /// [`check_marker`], or use [`Redactor::try_new`].
    pub fn new<I, S>(fields: I, redaction: impl Into<String>, separator: char) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            redaction: redaction.into(),
            separator,
        }
    }

    /// Creates a redactor for `fields`, rejecting markers that fail
    /// [`check_marker`].
    ///
    /// # Errors
    ///
    /// Returns a [`MarkerError`] for an empty or separator-bearing marker.
    pub fn try_new<I, S>(
        fields: I,
        redaction: impl Into<String>,
        separator: char,
    ) -> Result<Self, MarkerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let redaction = redaction.into();
        check_marker(&redaction, separator)?;
        Ok(Self::new(fields, redaction, separator))
    }

    /// Returns `true` if `field` is sensitive.
    #[must_use]
    pub fn is_sensitive(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// The marker substituted for sensitive values.
    #[must_use]
    pub fn redaction(&self) -> &str {
        &self.redaction
    }

    /// The segment separator.
    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Returns a copy of `message` with sensitive values redacted.
    #[must_use]
    pub fn redact(&self, message: &str) -> String {
        if self.fields.is_empty() {
            return message.to_string();
        }
        redact_segments(message, self.separator, &self.redaction, |key| {
            self.fields.contains(key)
        })
    }
}

fn redact_segments(
    message: &str,
    separator: char,
    redaction: &str,
    is_sensitive: impl Fn(&str) -> bool,
) -> String {
    let mut out = String::with_capacity(message.len());

    for (i, segment) in message.split(separator).enumerate() {
        if i > 0 {
            out.push(separator);
        }
        match segment.split_once('=') {
            Some((key, _)) if is_sensitive(key.trim()) => {
                out.push_str(key);
                out.push('=');
                out.push_str(redaction);
            }
            _ => out.push_str(segment),
        }
    }

    out
}
