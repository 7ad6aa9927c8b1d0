//! Configuration loading and management
//!
//! Settings come from an optional YAML file and are then overridden by
//! environment variables:
//!
//! | Variable          | Effect                                        |
//! |-------------------|-----------------------------------------------|
//! | `BIZTIME_CONFIG`  | path of the YAML file to load first           |
//! | `BIZTIME_BIND`    | listen address                                |
//! | `BIZTIME_BACKEND` | `memory` or `postgres`                        |
//! | `DATABASE_URL`    | full connection URL, wins over the parts      |
//! | `DB_USERNAME`     | database user                                 |
//! | `DB_PASSWORD`     | database password                             |
//! | `NODE_ENV`        | `test` selects the `biztime_test` database    |
//! | `RUST_LOG`        | tracing filter, wins over `log_level`         |

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
#[cfg(feature = "postgres")]
use sqlx::postgres::PgConnectOptions;

/// Which store backs the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    Postgres,
}

impl std::str::FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => bail!("unknown backend '{}' (expected 'memory' or 'postgres')", other),
        }
    }
}

/// Postgres connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection URL; when set, the other connection fields are ignored
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub host: String,
    pub name: String,
    pub max_connections: u32,
    /// Use the `<name>_test` database
    pub test: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            password: None,
            host: "localhost".to_string(),
            name: "biztime".to_string(),
            max_connections: 5,
            test: false,
        }
    }
}

impl DatabaseConfig {
    /// Name of the database actually connected to
    pub fn database_name(&self) -> String {
        if self.test {
            format!("{}_test", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Build the Postgres connection options
    ///
    /// Credentials are set as fields rather than spliced into a URL, so any
    /// character is allowed in the username or password.
    #[cfg(feature = "postgres")]
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url.parse().context("invalid DATABASE_URL");
        }
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .database(&self.database_name());
        if let Some(user) = &self.username {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind: String,
    pub backend: Backend,
    pub log_level: String,
    /// Enable a permissive CORS layer
    pub cors: bool,
    pub database: DatabaseConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            backend: Backend::Memory,
            log_level: "info".to_string(),
            cors: false,
            database: DatabaseConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides read through `lookup`
    ///
    /// Takes a lookup function instead of reading the process environment so
    /// tests stay independent of it.
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("BIZTIME_BIND") {
            self.bind = bind;
        }
        if let Some(backend) = lookup("BIZTIME_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(user) = lookup("DB_USERNAME") {
            self.database.username = Some(user);
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.database.password = Some(password);
        }
        if lookup("NODE_ENV").as_deref() == Some("test") {
            self.database.test = true;
        }
        Ok(self)
    }

    /// Load from `BIZTIME_CONFIG` (if set) and the process environment
    pub fn from_env() -> Result<Self> {
        let base = match std::env::var("BIZTIME_CONFIG") {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        base.apply_env_overrides(|key| std::env::var(key).ok())
    }
}
