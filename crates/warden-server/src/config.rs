use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use warden_auth::AuthConfig;
use warden_redact::{PII_FIELDS, REDACTION, RedactingFormatter, SEPARATOR, check_marker};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication scheme and excluded paths
    #[serde(default)]
    pub auth: AuthConfig,
    /// Log level and PII redaction
    #[serde(default)]
    pub logging: LoggingConfig,
    /// User file
    #[serde(default)]
    pub users: UsersConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if tracing_subscriber::EnvFilter::try_new(&self.logging.level).is_err() {
            return Err(format!("logging.level '{}' is not a valid filter", self.logging.level));
        }

        let separator = self.logging.separator;
        check_marker(&self.logging.redaction, separator)
            .map_err(|e| format!("logging.redaction {e}"))?;
        for field in &self.logging.pii_fields {
            if field.trim().is_empty() || field.contains('=') || field.contains(separator) {
                return Err(format!("logging.pii_fields entry '{field}' is not a valid key"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "warden_auth=debug,info"
    pub level: String,
    /// Keys whose values are redacted from every log line
    pub pii_fields: Vec<String>,
    /// Marker substituted for redacted values
    pub redaction: String,
    /// Separator between key=value segments
    pub separator: char,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            pii_fields: PII_FIELDS.iter().map(ToString::to_string).collect(),
            redaction: REDACTION.into(),
            separator: SEPARATOR,
        }
    }
}

impl LoggingConfig {
    pub fn formatter(&self) -> RedactingFormatter {
        RedactingFormatter::with_options(
            self.pii_fields.iter().cloned(),
            self.redaction.clone(),
            self.separator,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UsersConfig {
    /// JSON file holding an array of user records
    pub path: Option<PathBuf>,
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                } else {
                    return Err(format!("config file not found: {p}"));
                }
            }
            None => {
                // Try default root-level file
                let default_path = PathBuf::from("warden.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., WARDEN__AUTH__SCHEME=basic_auth
        builder = builder.add_source(
            Environment::with_prefix("WARDEN")
                .try_parsing(true)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("auth.excluded_paths")
                .with_list_parse_key("logging.pii_fields"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_auth::AuthSchemeKind;

    #[test]
    fn defaults_are_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.auth.scheme, AuthSchemeKind::None);
        assert_eq!(cfg.logging.pii_fields, PII_FIELDS);
        assert_eq!(cfg.logging.separator, ';');
    }

    #[test]
    fn rejects_marker_containing_separator() {
        let mut cfg = AppConfig::default();
        cfg.logging.redaction = "a;b".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("separator"), "{err}");
    }

    #[test]
    fn rejects_bad_pii_field() {
        let mut cfg = AppConfig::default();
        cfg.logging.pii_fields.push("token=".into());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_port() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert_eq!(cfg.validate().unwrap_err(), "server.port must be > 0");
    }

    #[test]
    fn formatter_uses_configured_marker() {
        let cfg = LoggingConfig {
            redaction: "[x]".into(),
            separator: '|',
            ..LoggingConfig::default()
        };
        let formatter = cfg.formatter();
        assert_eq!(
            formatter.redactor().redact("email=a@b.c|role=admin"),
            "email=[x]|role=admin"
        );
    }
}
