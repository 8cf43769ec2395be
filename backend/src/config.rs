//! # Configuration
//!
//! Settings are read once at startup: defaults, then an optional YAML file
//! (`events-tracker.yaml`, or the path in `EVENTS_TRACKER_CONFIG`), then
//! environment variables.
//!
//! | Variable | Setting | Default |
//! |---|---|---|
//! | `STORAGE_TYPE` | `csv`, `postgres` or `sqlite` | `csv` |
//! | `DATA_DIR` | CSV files and default SQLite file | `./data` |
//! | `SQLITE_FILE` | SQLite database file | `<DATA_DIR>/events.db` |
//! | `DB_HOST` / `DB_PORT` / `DB_NAME` | PostgreSQL server | `localhost` / `5432` / `events_db` |
//! | `DB_USER` / `DB_PASSWORD` | PostgreSQL credentials | `postgres` / `postgres` |
//! | `DATABASE_URL` | PostgreSQL URL, replaces the `DB_*` settings | unset |
//! | `HOST` / `PORT` | listen address | `0.0.0.0` / `5001` |

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::storage::{CsvPaths, StorageKind};

pub const CONFIG_PATH_VAR: &str = "EVENTS_TRACKER_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "events-tracker.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage_type: StorageKind,
    pub data_dir: PathBuf,
    pub sqlite: SqliteConfig,
    pub postgres: PostgresConfig,
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageKind::Csv,
            data_dir: PathBuf::from("./data"),
            sqlite: SqliteConfig::default(),
            postgres: PostgresConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    /// Database file; `events.db` inside the data directory when unset
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Full connection URL; takes precedence over the discrete settings
    pub url: Option<String>,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "events_db".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            url: None,
        }
    }
}

impl PostgresConfig {
    /// Where the database lives, without credentials
    pub fn describe(&self) -> String {
        match &self.url {
            Some(url) => match (url.find("://"), url.rfind('@')) {
                (Some(scheme_end), Some(at)) if at > scheme_end => {
                    format!("{}{}", &url[..scheme_end + 3], &url[at + 1..])
                }
                _ => url.clone(),
            },
            None => format!("{}:{}/{}", self.host, self.port, self.database),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

impl AppConfig {
    /// Defaults, then the config file if present, then the environment
    pub fn load() -> Result<Self> {
        let explicit = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        let mut config = match &explicit {
            Some(path) => Self::from_yaml_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_yaml_file(path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment-style overrides; blank values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(value) = var("STORAGE_TYPE") {
            self.storage_type = value.parse()?;
        }
        if let Some(value) = var("DATA_DIR") {
            self.data_dir = PathBuf::from(value);
        }
        if let Some(value) = var("SQLITE_FILE") {
            self.sqlite.file = Some(PathBuf::from(value));
        }
        if let Some(value) = var("DB_HOST") {
            self.postgres.host = value;
        }
        if let Some(value) = var("DB_PORT") {
            self.postgres.port = parse_port("DB_PORT", &value)?;
        }
        if let Some(value) = var("DB_NAME") {
            self.postgres.database = value;
        }
        if let Some(value) = var("DB_USER") {
            self.postgres.user = value;
        }
        if let Some(value) = var("DB_PASSWORD") {
            self.postgres.password = value;
        }
        if let Some(value) = var("DATABASE_URL") {
            self.postgres.url = Some(value);
        }
        if let Some(value) = var("HOST") {
            self.server.host = value;
        }
        if let Some(value) = var("PORT") {
            self.server.port = parse_port("PORT", &value)?;
        }
        Ok(())
    }

    pub fn csv_paths(&self) -> CsvPaths {
        CsvPaths::in_directory(&self.data_dir)
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.sqlite
            .file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("events.db"))
    }
}

fn parse_port(name: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a port number, got '{}'", name, value))
}
