use super::{
    AppConfig, AuthBackend, CliConfig, FileConfig, SentimentEngine, DEFAULT_IDENTITY_TIMEOUT_SEC,
    DEFAULT_PORT, DEFAULT_SENTIMENT_TIMEOUT_MS,
};
use crate::cli_style::get_styles;
use crate::server::RequestsLoggingLevel;
use crate::user::DEFAULT_HISTORY_LIMIT;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

pub fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// Arguments shared by the server and the console chat.
#[derive(Parser, Debug)]
#[command(styles = get_styles(), version)]
pub struct CliArgs {
    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding catalog.db and user.db.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Directory served under /static.
    #[clap(long, value_parser = parse_path)]
    pub static_dir: Option<PathBuf>,

    /// How many past recommendations the history shows.
    #[clap(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
    pub history_limit: usize,

    /// Where accounts and passwords live.
    #[clap(long, value_enum, default_value_t = AuthBackend::Local)]
    pub auth_backend: AuthBackend,

    /// Base URL of the remote identity service.
    #[clap(long)]
    pub identity_base_url: Option<String>,

    /// Secret key for the remote identity service.
    #[clap(long, env = "MOODWAVE_IDENTITY_SECRET_KEY", hide_env_values = true)]
    pub identity_secret_key: Option<String>,

    /// Timeout in seconds for identity service requests.
    #[clap(long, default_value_t = DEFAULT_IDENTITY_TIMEOUT_SEC)]
    pub identity_timeout_sec: u64,

    /// Which polarity scorer backs the mood classifier.
    #[clap(long, value_enum, default_value_t = SentimentEngine::Lexicon)]
    pub sentiment_engine: SentimentEngine,

    /// URL of the sentiment scoring service, for the http engine.
    #[clap(long)]
    pub sentiment_url: Option<String>,

    /// Timeout in milliseconds for sentiment service requests.
    #[clap(long, default_value_t = DEFAULT_SENTIMENT_TIMEOUT_MS)]
    pub sentiment_timeout_ms: u64,

    /// JSON array of songs imported into the catalog at startup.
    #[clap(long, value_parser = parse_path)]
    pub import_songs: Option<PathBuf>,
}

impl CliArgs {
    pub fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_dir: self.db_dir.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            static_dir: self.static_dir.clone(),
            history_limit: self.history_limit,
            auth_backend: self.auth_backend,
            identity_base_url: self.identity_base_url.clone(),
            identity_secret_key: self.identity_secret_key.clone(),
            identity_timeout_sec: self.identity_timeout_sec,
            sentiment_engine: self.sentiment_engine,
            sentiment_url: self.sentiment_url.clone(),
            sentiment_timeout_ms: self.sentiment_timeout_ms,
            import_songs: self.import_songs.clone(),
        }
    }

    pub fn resolve(&self) -> Result<AppConfig> {
        let file_config = match &self.config {
            Some(path) => Some(FileConfig::load(path)?),
            None => None,
        };
        AppConfig::resolve(&self.to_cli_config(), file_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parses_defaults() {
        let args = CliArgs::try_parse_from(["moodwave", "--db-dir", "/tmp"]).unwrap();
        let cli = args.to_cli_config();
        assert_eq!(cli.port, 3001);
        assert_eq!(cli.history_limit, 5);
        assert_eq!(cli.auth_backend, AuthBackend::Local);
        assert_eq!(cli.sentiment_engine, SentimentEngine::Lexicon);
        assert_eq!(cli.logging_level, RequestsLoggingLevel::Path);
    }

    #[test]
    fn parses_backends() {
        let args = CliArgs::try_parse_from([
            "moodwave",
            "--auth-backend",
            "remote",
            "--identity-base-url",
            "https://identity.example",
            "--identity-secret-key",
            "sk_test",
            "--sentiment-engine",
            "http",
            "--sentiment-url",
            "http://localhost:5005",
        ])
        .unwrap();
        assert_eq!(args.auth_backend, AuthBackend::Remote);
        assert_eq!(args.identity_secret_key.as_deref(), Some("sk_test"));
        assert_eq!(args.sentiment_engine, SentimentEngine::Http);
    }

    #[test]
    fn config_file_overrides_arguments() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("moodwave.toml");
        std::fs::write(&config_path, "port = 9000\nhistory_limit = 10\n").unwrap();

        let args = CliArgs::try_parse_from([
            "moodwave",
            "--port",
            "4000",
            "--db-dir",
            temp_dir.path().to_str().unwrap(),
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();
        let config = args.resolve().unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.history_limit, 10);
    }
}
