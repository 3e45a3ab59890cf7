//! # Application Configuration
//!
//! Loaded from environment variables at start-up:
//!
//! | variable                  | default | meaning |
//! |---------------------------|---------|---------|
//! | `PORT`                    | `8080`  | HTTP listen port |
//! | `DATABASE_URL`            | unset   | Postgres URL; unset runs the in-memory store |
//! | `DB_MAX_CONNECTIONS`      | `10`    | pool size |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | `5`     | pool acquire timeout |
//! | `ALLOWED_ORIGINS`         | unset   | comma-separated CORS origins; unset or `*` allows any |
//! | `LOG_FORMAT`              | `text`  | `text` or `json` |

use thiserror::Error;

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Application configuration.
///
/// Custom `Debug` redacts the password in `database_url`.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Postgres connection URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub db_max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub db_acquire_timeout_secs: u64,
    /// Allowed CORS origins. Empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "database_url",
                &self.database_url.as_deref().map(redact_url),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("allowed_origins", &self.allowed_origins)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            db_max_connections: 10,
            db_acquire_timeout_secs: 5,
            allowed_origins: Vec::new(),
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let log_format = match non_empty("LOG_FORMAT") {
            None => defaults.log_format,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "LOG_FORMAT",
                        value: raw,
                    })
                }
            },
        };

        Ok(Self {
            port: parse_var(&lookup, "PORT", defaults.port)?,
            database_url: non_empty("DATABASE_URL"),
            db_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            db_acquire_timeout_secs: parse_var(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.db_acquire_timeout_secs,
            )?,
            allowed_origins: non_empty("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            log_format,
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
    }
}

/// Mask the password component of a URL such as `postgres://user:pw@host/db`.
pub fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://").map(|i| i + 3) else {
        return url.to_string();
    };
    let rest = &url[scheme_end..];
    let Some(at) = rest.find('@') else {
        return url.to_string();
    };
    match rest[..at].find(':') {
        Some(colon) => format!(
            "{}{}:[REDACTED]{}",
            &url[..scheme_end],
            &rest[..colon],
            &rest[at..]
        ),
        None => url.to_string(),
    }
}
