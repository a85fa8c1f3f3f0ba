// Tracing initialization: every event goes through the PII redacting formatter,
// and the level filter can be swapped at runtime.
use std::sync::OnceLock;

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, prelude::*, reload};
use warden_redact::redacting_layer;

use crate::config::LoggingConfig;

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, tracing_subscriber::Registry>> =
    OnceLock::new();

/// Install the process subscriber for the binary.
///
/// Level comes from `RUST_LOG` when set, otherwise from `logging.level`.
/// Lines are redacted with the configured PII fields and written to stderr.
pub fn init_tracing(logging: &LoggingConfig) -> Result<(), TryInitError> {
    let base_filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(&logging.level));

    let (reload_layer, handle) = reload::Layer::new(base_filter);
    let _ = LOG_RELOAD_HANDLE.set(handle);

    tracing_subscriber::registry()
        .with(reload_layer)
        .with(redacting_layer(logging.formatter(), std::io::stderr))
        .try_init()
}

/// Apply a new logging level at runtime if the subscriber was installed by
/// [`init_tracing`].
pub fn apply_logging_level(level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_new(level).map_err(|e| format!("invalid log level '{level}': {e}"))?;
    let Some(handle) = LOG_RELOAD_HANDLE.get() else {
        return Ok(());
    };
    handle
        .modify(|f| *f = filter)
        .map_err(|e| format!("log filter reload failed: {e}"))?;
    tracing::info!(level, "Log level applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_level() {
        let err = apply_logging_level("warden=notalevel").unwrap_err();
        assert!(err.starts_with("invalid log level"), "{err}");
    }

    #[test]
    fn valid_level_without_subscriber_is_noop() {
        assert!(apply_logging_level("warden_auth=debug,info").is_ok());
    }
}
