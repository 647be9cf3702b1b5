//! Builds every collaborator from an [`AppConfig`].

use crate::catalog::{import_songs, SongCatalog, SqliteSongCatalog};
use crate::config::{AppConfig, IdentitySettings, SentimentSettings};
use crate::identity::{IdentityProvider, LocalIdentityProvider, RemoteIdentityProvider};
use crate::mood::MoodClassifier;
use crate::recommendation::Recommender;
use crate::sentiment::{HttpSentimentAnalyzer, LexiconSentimentAnalyzer, SentimentAnalyzer};
use crate::user::{SqliteUserStore, UserManager};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn SongCatalog>,
    pub user_manager: Arc<UserManager>,
    pub identity: Arc<dyn IdentityProvider>,
    pub recommender: Recommender,
}

impl Services {
    pub fn build(config: &AppConfig) -> Result<Self> {
        let catalog_db_path = config.catalog_db_path();
        info!("Opening SQLite catalog database at {:?}...", catalog_db_path);
        let catalog: Arc<dyn SongCatalog> = Arc::new(SqliteSongCatalog::new(&catalog_db_path)?);

        if let Some(path) = &config.import_songs {
            let imported = import_songs(catalog.as_ref(), path)
                .with_context(|| format!("Failed to import songs from {:?}", path))?;
            info!("Imported {} songs from {:?}", imported, path);
        }
        info!("Catalog has {} songs", catalog.songs_count()?);

        let user_db_path = config.user_db_path();
        info!("Opening SQLite user database at {:?}...", user_db_path);
        let user_store = SqliteUserStore::new(&user_db_path)?;
        let user_manager = Arc::new(
            UserManager::new(catalog.clone(), Box::new(user_store))
                .with_history_limit(config.history_limit),
        );

        let identity: Arc<dyn IdentityProvider> = match &config.identity {
            IdentitySettings::Local => Arc::new(LocalIdentityProvider::new(user_manager.clone())),
            IdentitySettings::Remote {
                base_url,
                secret_key,
                timeout,
            } => Arc::new(RemoteIdentityProvider::new(
                base_url,
                secret_key.clone(),
                *timeout,
                user_manager.clone(),
            )?),
        };
        info!("Using {} identity provider", identity.name());

        let sentiment: Arc<dyn SentimentAnalyzer> = match &config.sentiment {
            SentimentSettings::Lexicon => Arc::new(LexiconSentimentAnalyzer::new()),
            SentimentSettings::Http { url, timeout } => {
                Arc::new(HttpSentimentAnalyzer::new(url.clone(), *timeout)?)
            }
        };
        info!("Using {} sentiment analyzer", sentiment.name());

        let recommender = Recommender::new(MoodClassifier::new(sentiment), catalog.clone());

        Ok(Self {
            catalog,
            user_manager,
            identity,
            recommender,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use crate::mood::MoodLabel;
    use tempfile::TempDir;

    #[tokio::test]
    async fn builds_from_default_config_and_imports_songs() {
        let temp_dir = TempDir::new().unwrap();
        let songs_path = temp_dir.path().join("songs.json");
        std::fs::write(
            &songs_path,
            r#"[{"id": "s1", "title": "Weightless", "artists": "Marconi Union",
                 "link": "https://music.example/weightless", "mood": "calm"}]"#,
        )
        .unwrap();
        let cli = CliConfig {
            db_dir: Some(temp_dir.path().to_path_buf()),
            import_songs: Some(songs_path),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, None).unwrap();

        let services = Services::build(&config).unwrap();

        assert_eq!(services.identity.name(), "local");
        assert_eq!(services.recommender.classifier().sentiment_name(), "lexicon");
        assert_eq!(services.catalog.count_by_mood(MoodLabel::Calm).unwrap(), 1);
        assert_eq!(services.user_manager.history_limit(), 5);

        let recommendation = services.recommender.recommend("feeling so relaxed").await;
        assert_eq!(recommendation.song.unwrap().id, "s1");
    }
}
