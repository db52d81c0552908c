//! Configuration loading and management

use anyhow::{Context, Result, bail};
use course_auth::TokenConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Token signing configuration
///
/// `secret_key` and `algorithm` have no defaults: a server without them
/// refuses to start.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
    /// Administrator created on first start when no accounts exist
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            algorithm: None,
            token_ttl_minutes: default_token_ttl_minutes(),
            bootstrap_admin: None,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("algorithm", &self.algorithm)
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("bootstrap_admin", &self.bootstrap_admin.as_ref().map(|a| &a.email))
            .finish()
    }
}

/// Initial administrator account
#[derive(Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    #[serde(default = "default_admin_name")]
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub secret_key: Option<String>,
    pub algorithm: Option<String>,
    pub token_ttl_minutes: Option<i64>,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_db_path() -> String {
    "./data/courses.db".to_string()
}

fn default_token_ttl_minutes() -> i64 {
    course_auth::jwt::DEFAULT_TOKEN_TTL_MINUTES
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Let command-line and environment values win over the file
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bind) = overrides.bind {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(secret_key) = overrides.secret_key {
            self.auth.secret_key = Some(secret_key);
        }
        if let Some(algorithm) = overrides.algorithm {
            self.auth.algorithm = Some(algorithm);
        }
        if let Some(ttl) = overrides.token_ttl_minutes {
            self.auth.token_ttl_minutes = ttl;
        }
    }

    /// Build the immutable signing configuration, failing if anything is unset
    pub fn token_config(&self) -> Result<TokenConfig> {
        let Some(secret_key) = self.auth.secret_key.as_deref() else {
            bail!("No signing key configured: set SECRET_KEY or auth.secret_key");
        };
        let Some(algorithm) = self.auth.algorithm.as_deref() else {
            bail!("No signing algorithm configured: set ALGORITHM or auth.algorithm");
        };

        TokenConfig::new(secret_key, algorithm, self.auth.token_ttl_minutes)
            .context("Invalid token configuration")
    }

    /// SQLite connection URL for the configured database file
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/course-registry.toml").unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.token_ttl_minutes, 15);
        assert!(config.auth.secret_key.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
            [server]
            port = 9100

            [database]
            path = "/tmp/courses.db"

            [auth]
            secret_key = "file-secret"
            algorithm = "HS384"
            token_ttl_minutes = 30

            [auth.bootstrap_admin]
            email = "root@example.com"
            password = "change-me"

            [logging]
            format = "json"
            "#,
        );

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.database_url(), "sqlite:/tmp/courses.db?mode=rwc");
        assert_eq!(config.auth.token_ttl_minutes, 30);
        assert_eq!(config.logging.format, "json");

        let admin = config.auth.bootstrap_admin.as_ref().unwrap();
        assert_eq!(admin.name, "Administrator");
        assert_eq!(admin.email, "root@example.com");

        let token_config = config.token_config().unwrap();
        assert_eq!(token_config.default_ttl().num_minutes(), 30);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let file = write_config("[server\nport = ");
        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::default();
        config.auth.secret_key = Some("file-secret".to_string());

        config.apply_overrides(ConfigOverrides {
            bind: Some("127.0.0.1".to_string()),
            port: Some(1234),
            secret_key: Some("env-secret".to_string()),
            algorithm: Some("HS512".to_string()),
            token_ttl_minutes: Some(5),
        });

        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.server.port, 1234);
        assert_eq!(config.auth.secret_key.as_deref(), Some("env-secret"));
        assert_eq!(config.auth.algorithm.as_deref(), Some("HS512"));
        assert_eq!(config.auth.token_ttl_minutes, 5);
    }

    #[test]
    fn test_token_config_requires_key_and_algorithm() {
        let mut config = Config::default();
        assert!(config.token_config().is_err());

        config.auth.secret_key = Some("secret".to_string());
        assert!(config.token_config().is_err());

        config.auth.algorithm = Some("HS256".to_string());
        assert!(config.token_config().is_ok());

        config.auth.algorithm = Some("none".to_string());
        assert!(config.token_config().is_err());

        config.auth.algorithm = Some("HS256".to_string());
        config.auth.token_ttl_minutes = 0;
        assert!(config.token_config().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = Config::default();
        config.auth.secret_key = Some("super-secret".to_string());
        config.auth.bootstrap_admin = Some(BootstrapAdmin {
            name: "Root".to_string(),
            email: "root@example.com".to_string(),
            password: "hunter2".to_string(),
        });

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("hunter2"));
    }
}
