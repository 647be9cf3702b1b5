mod cli_args;
mod file_config;

pub use cli_args::{parse_path, CliArgs};
pub use file_config::{FileConfig, IdentityConfig, SentimentConfig};

use crate::server::RequestsLoggingLevel;
use crate::user::DEFAULT_HISTORY_LIMIT;
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_IDENTITY_TIMEOUT_SEC: u64 = 10;
pub const DEFAULT_SENTIMENT_TIMEOUT_MS: u64 = 3000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum AuthBackend {
    #[default]
    Local,
    Remote,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SentimentEngine {
    #[default]
    Lexicon,
    Http,
}

/// CLI arguments that can be overridden by the TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub static_dir: Option<PathBuf>,
    pub history_limit: usize,
    pub auth_backend: AuthBackend,
    pub identity_base_url: Option<String>,
    pub identity_secret_key: Option<String>,
    pub identity_timeout_sec: u64,
    pub sentiment_engine: SentimentEngine,
    pub sentiment_url: Option<String>,
    pub sentiment_timeout_ms: u64,
    pub import_songs: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_dir: None,
            port: DEFAULT_PORT,
            logging_level: RequestsLoggingLevel::default(),
            static_dir: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            auth_backend: AuthBackend::default(),
            identity_base_url: None,
            identity_secret_key: None,
            identity_timeout_sec: DEFAULT_IDENTITY_TIMEOUT_SEC,
            sentiment_engine: SentimentEngine::default(),
            sentiment_url: None,
            sentiment_timeout_ms: DEFAULT_SENTIMENT_TIMEOUT_MS,
            import_songs: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub static_dir: Option<PathBuf>,
    pub history_limit: usize,
    pub import_songs: Option<PathBuf>,

    pub identity: IdentitySettings,
    pub sentiment: SentimentSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IdentitySettings {
    Local,
    Remote {
        base_url: String,
        secret_key: String,
        timeout: Duration,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SentimentSettings {
    Lexicon,
    Http { url: String, timeout: Duration },
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| anyhow!("db_dir must be specified via --db-dir or in config file"))?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let static_dir = file
            .static_dir
            .map(PathBuf::from)
            .or_else(|| cli.static_dir.clone());
        if let Some(dir) = &static_dir {
            if !dir.is_dir() {
                bail!("Static directory not found: {:?}", dir);
            }
        }

        let history_limit = file.history_limit.unwrap_or(cli.history_limit);
        if history_limit == 0 {
            bail!("history_limit must be greater than zero");
        }

        let import_songs = file
            .import_songs
            .map(PathBuf::from)
            .or_else(|| cli.import_songs.clone());
        if let Some(path) = &import_songs {
            if !path.is_file() {
                bail!("Songs file to import not found: {:?}", path);
            }
        }

        let auth_backend = match file.auth_backend {
            Some(value) => AuthBackend::from_str(&value, true)
                .map_err(|_| anyhow!("Unknown auth_backend: {}", value))?,
            None => cli.auth_backend,
        };
        let identity_file = file.identity.unwrap_or_default();
        let identity = match auth_backend {
            AuthBackend::Local => IdentitySettings::Local,
            AuthBackend::Remote => {
                let base_url = identity_file
                    .base_url
                    .or_else(|| cli.identity_base_url.clone())
                    .ok_or_else(|| anyhow!("The remote auth backend needs an identity base_url"))?;
                let secret_key = identity_file
                    .secret_key
                    .or_else(|| cli.identity_secret_key.clone())
                    .filter(|key| !key.is_empty())
                    .ok_or_else(|| {
                        anyhow!("The remote auth backend needs an identity secret_key")
                    })?;
                let timeout_sec = identity_file
                    .timeout_sec
                    .unwrap_or(cli.identity_timeout_sec);
                IdentitySettings::Remote {
                    base_url,
                    secret_key,
                    timeout: Duration::from_secs(timeout_sec),
                }
            }
        };

        let sentiment_file = file.sentiment.unwrap_or_default();
        let engine = match sentiment_file.engine {
            Some(value) => SentimentEngine::from_str(&value, true)
                .map_err(|_| anyhow!("Unknown sentiment engine: {}", value))?,
            None => cli.sentiment_engine,
        };
        let sentiment = match engine {
            SentimentEngine::Lexicon => SentimentSettings::Lexicon,
            SentimentEngine::Http => {
                let url = sentiment_file
                    .url
                    .or_else(|| cli.sentiment_url.clone())
                    .ok_or_else(|| anyhow!("The http sentiment engine needs a url"))?;
                let timeout_ms = sentiment_file
                    .timeout_ms
                    .unwrap_or(cli.sentiment_timeout_ms);
                SentimentSettings::Http {
                    url,
                    timeout: Duration::from_millis(timeout_ms),
                }
            }
        };

        Ok(Self {
            db_dir,
            port,
            logging_level,
            static_dir,
            history_limit,
            import_songs,
            identity,
            sentiment,
        })
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.db_dir.join("catalog.db")
    }

    pub fn user_db_path(&self) -> PathBuf {
        self.db_dir.join("user.db")
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
