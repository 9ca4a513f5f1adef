//! Service configuration loaded from environment variables.
//!
//! The configuration is built once at startup and passed explicitly into the
//! database pool and application state; handlers never read the environment.
//!
//! # Environment Variables
//!
//! ## Database (one of)
//! - `VOLUNTARIOS_DATABASE_URL` - `PostgreSQL` connection string
//! - `DATABASE_URL` - Generic fallback connection string
//! - `DB_HOST`, `DB_PORT`, `DB_NAME` (or `DB_SID`), `DB_USER`, `DB_PASS` - Discrete parts
//!
//! ## Optional
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `DB_MIN_CONNECTIONS` - Idle connections kept open (default: 1)
//! - `DB_ACQUIRE_TIMEOUT_SECS` - Pool acquire timeout (default: 10)
//! - `VOLUNTARIOS_HOST` - Bind address (default: 127.0.0.1)
//! - `VOLUNTARIOS_PORT` - Listen port (default: 8000)
//! - `CORS_ALLOWED_ORIGINS` - Comma-separated origins or `*` (default: `*`)
//! - `CORS_ALLOWED_METHODS` - Comma-separated methods or `*` (default: `*`)
//! - `CORS_ALLOWED_HEADERS` - Comma-separated headers or `*` (default: `*`)
//! - `CORS_ALLOW_CREDENTIALS` - `true`/`false` (default: false)
//! - `LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

const DEFAULT_DB_PORT: u16 = 5432;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Database target and pool tuning
    pub database: DatabaseConfig,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Cross-origin policy
    pub cors: CorsConfig,
    /// Log output format
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced by Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Where the database lives and how the pool should behave.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub target: DatabaseTarget,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

/// Database location, either as a URL or as discrete connection parts.
#[derive(Debug, Clone)]
pub enum DatabaseTarget {
    /// Full connection string (contains password)
    Url(SecretString),
    /// Host/port/database/credentials supplied separately
    Parts {
        host: String,
        port: u16,
        database: String,
        username: String,
        password: SecretString,
    },
}

/// Cross-origin resource sharing policy.
///
/// Defaults to fully permissive; narrow it per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: AllowList,
    pub allowed_methods: AllowList,
    pub allowed_headers: AllowList,
    pub allow_credentials: bool,
}

/// Either a wildcard or an explicit list of allowed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowList {
    Any,
    List(Vec<String>),
}

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        let database = DatabaseConfig::from_env(&env)?;
        let host = env.parse_or("VOLUNTARIOS_HOST", "127.0.0.1".parse::<IpAddr>().ok())?;
        let port = env.parse_or("VOLUNTARIOS_PORT", Some(8000))?;
        let cors = CorsConfig::from_env(&env)?;
        let log_format = match env.get("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "LOG_FORMAT".to_string(),
                    format!("expected 'pretty' or 'json', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            database,
            host,
            port,
            cors,
            log_format,
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", Some(1.0))?,
            sentry_traces_sample_rate: env.parse_or("SENTRY_TRACES_SAMPLE_RATE", Some(0.0))?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        let target = if let Some(url) = env.get("VOLUNTARIOS_DATABASE_URL") {
            DatabaseTarget::Url(SecretString::from(url))
        } else if let Some(url) = env.get("DATABASE_URL") {
            DatabaseTarget::Url(SecretString::from(url))
        } else {
            DatabaseTarget::Parts {
                host: env.required("DB_HOST")?,
                port: env.parse_or("DB_PORT", Some(DEFAULT_DB_PORT))?,
                // DB_SID is accepted for deployments migrated from the legacy service
                database: env
                    .get("DB_NAME")
                    .or_else(|| env.get("DB_SID"))
                    .ok_or_else(|| ConfigError::MissingEnvVar("DB_NAME".to_string()))?,
                username: env.required("DB_USER")?,
                password: SecretString::from(env.required("DB_PASS")?),
            }
        };

        Ok(Self {
            target,
            max_connections: env.parse_or("DB_MAX_CONNECTIONS", Some(10))?,
            min_connections: env.parse_or("DB_MIN_CONNECTIONS", Some(1))?,
            acquire_timeout: Duration::from_secs(env.parse_or("DB_ACQUIRE_TIMEOUT_SECS", Some(10))?),
        })
    }

    /// Build `sqlx` connect options for this target.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::Configuration` if the URL cannot be parsed.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.target {
            DatabaseTarget::Url(url) => PgConnectOptions::from_str(url.expose_secret()),
            DatabaseTarget::Parts {
                host,
                port,
                database,
                username,
                password,
            } => Ok(PgConnectOptions::new()
                .host(host)
                .port(*port)
                .database(database)
                .username(username)
                .password(password.expose_secret())),
        }
    }
}

impl CorsConfig {
    fn from_env(env: &Env<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            allowed_origins: AllowList::parse(env.get("CORS_ALLOWED_ORIGINS").as_deref()),
            allowed_methods: AllowList::parse(env.get("CORS_ALLOWED_METHODS").as_deref()),
            allowed_headers: AllowList::parse(env.get("CORS_ALLOWED_HEADERS").as_deref()),
            allow_credentials: env.parse_or("CORS_ALLOW_CREDENTIALS", Some(false))?,
        })
    }

    /// Fully permissive policy: any origin, method, and header, no credentials.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            allowed_origins: AllowList::Any,
            allowed_methods: AllowList::Any,
            allowed_headers: AllowList::Any,
            allow_credentials: false,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::permissive()
    }
}

impl AllowList {
    /// Parse a comma-separated list. Unset, empty, or `*` means any.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim) else {
            return Self::Any;
        };
        if raw.is_empty() || raw == "*" {
            return Self::Any;
        }

        let items: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if items.iter().any(|s| s == "*") {
            Self::Any
        } else {
            Self::List(items)
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Thin wrapper over a key lookup with typed accessors.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable, treating empty values as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: Option<T>) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
            None => default.ok_or_else(|| ConfigError::MissingEnvVar(key.to_string())),
        }
    }
}
