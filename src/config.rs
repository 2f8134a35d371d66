//! Configuration loading and constants.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables (`APP_VERSION`, `ENVIRONMENT`, `PORT`).
//! It is read once at startup and is immutable afterwards. `AppConfig` is the
//! root configuration struct containing all settings.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// Application Identity
// =============================================================================

/// Application name reported by the info endpoint
pub const APP_NAME: &str = "deployment-tracker";

/// Landing message returned by the index endpoint
pub const INDEX_MESSAGE: &str = "Deployment Tracker API";

/// Version reported when neither the config file nor `APP_VERSION` sets one
pub const DEFAULT_APP_VERSION: &str = "0.1.0";

/// Environment reported when neither the config file nor `ENVIRONMENT` sets one
pub const DEFAULT_ENVIRONMENT: &str = "development";

// =============================================================================
// HTTP Server Defaults
// =============================================================================

/// Default bind host (all interfaces, as expected inside a container)
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default bind address
pub const DEFAULT_BIND_ADDR: &str = formatcp!("{}:{}", DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT);

/// Extra CLI help describing the environment overrides
pub const CLI_AFTER_HELP: &str = formatcp!(
    "Environment:\n  {}  reported version (default {})\n  {}  reported environment (default {})\n  {}  listen port (default {})",
    ENV_APP_VERSION,
    DEFAULT_APP_VERSION,
    ENV_ENVIRONMENT,
    DEFAULT_ENVIRONMENT,
    ENV_PORT,
    DEFAULT_HTTP_PORT
);

/// Seconds to wait for in-flight requests after SIGTERM before exiting
pub const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 30;

/// API responses are never cached; probes and listings must always be fresh
pub const CACHE_CONTROL_API: &str = "no-store";

// =============================================================================
// Environment Variables
// =============================================================================

pub const ENV_APP_VERSION: &str = "APP_VERSION";
pub const ENV_ENVIRONMENT: &str = "ENVIRONMENT";
pub const ENV_PORT: &str = "PORT";

// =============================================================================
// Logging
// =============================================================================

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "deployment_tracker=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Version and environment reported by the status endpoints
    #[serde(default)]
    pub app: AppSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    #[serde(default)]
    pub tls: TlsConfig,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            tls: TlsConfig::default(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// TLS mode for the HTTP listener
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain HTTP; TLS is terminated by the ingress in front of the pod
    #[default]
    None,
    /// User-provided PEM certificate and key
    Manual,
}

/// TLS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub mode: TlsMode,
    /// Path to PEM certificate chain (manual mode)
    pub cert_path: Option<String>,
    /// Path to PEM private key (manual mode)
    pub key_path: Option<String>,
}

/// Metadata exposed by the health and info endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "AppSettings::default_version")]
    pub version: String,
    #[serde(default = "AppSettings::default_environment")]
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            environment: Self::default_environment(),
        }
    }
}

impl AppSettings {
    fn default_version() -> String {
        DEFAULT_APP_VERSION.to_string()
    }

    fn default_environment() -> String {
        DEFAULT_ENVIRONMENT.to_string()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Parse a TOML configuration file without applying environment overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Apply environment overrides using the given lookup, then validate.
    ///
    /// The lookup is injected so tests don't have to mutate the process environment.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(version) = lookup(ENV_APP_VERSION) {
            self.app.version = version;
        }
        if let Some(environment) = lookup(ENV_ENVIRONMENT) {
            self.app.environment = environment;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.http.port = port.trim().parse().map_err(|_| {
                ConfigError::Env(format!("{} must be a port number, got {:?}", ENV_PORT, port))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.version.trim().is_empty() {
            return Err(ConfigError::Validation("app.version must not be empty".to_string()));
        }
        if self.app.environment.trim().is_empty() {
            return Err(ConfigError::Validation(
                "app.environment must not be empty".to_string(),
            ));
        }
        if self.http.tls.mode == TlsMode::Manual
            && (self.http.tls.cert_path.is_none() || self.http.tls.key_path.is_none())
        {
            return Err(ConfigError::Validation(
                "TLS mode 'manual' requires both http.tls.cert_path and http.tls.key_path"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid environment variable: {0}")]
    Env(String),
    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = AppConfig::default().with_env_overrides(no_env).unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.app.version, "0.1.0");
        assert_eq!(config.app.environment, "development");
        assert_eq!(config.logging.format, "text");
        assert_eq!(config.http.tls.mode, TlsMode::None);
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env = env_from(&[
            ("APP_VERSION", "2.3.4"),
            ("ENVIRONMENT", "production"),
            ("PORT", "8080"),
        ]);
        let config = AppConfig::default().with_env_overrides(env).unwrap();
        assert_eq!(config.app.version, "2.3.4");
        assert_eq!(config.app.environment, "production");
        assert_eq!(config.http.port, 8080);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let env = env_from(&[("PORT", "http")]);
        let err = AppConfig::default().with_env_overrides(env).unwrap_err();
        assert!(matches!(err, ConfigError::Env(_)));
    }

    #[test]
    fn test_empty_environment_is_rejected() {
        let env = env_from(&[("ENVIRONMENT", "  ")]);
        let err = AppConfig::default().with_env_overrides(env).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_from_file_partial_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[http]
port = 9000

[app]
environment = "staging"

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.app.version, "0.1.0");
        assert_eq!(config.app.environment, "staging");
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_env_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[app]\nversion = \"1.0.0\"").unwrap();

        let config = AppConfig::from_file(file.path())
            .unwrap()
            .with_env_overrides(env_from(&[("APP_VERSION", "1.0.1")]))
            .unwrap();
        assert_eq!(config.app.version, "1.0.1");
    }

    #[test]
    fn test_manual_tls_requires_paths() {
        let config: AppConfig = toml::from_str("[http.tls]\nmode = \"manual\"").unwrap();
        let err = config.with_env_overrides(no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::from_file("/nonexistent/deployment-tracker.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_bundled_config_file_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/deployment-tracker.toml");
        let config = AppConfig::from_file(path)
            .unwrap()
            .with_env_overrides(no_env)
            .unwrap();
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.app.environment, "development");
    }

    #[test]
    fn test_default_bind_addr() {
        assert_eq!(DEFAULT_BIND_ADDR, "0.0.0.0:5000");
    }
}
