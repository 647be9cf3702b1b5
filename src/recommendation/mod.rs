//! Text in, mood and song out, optionally recorded in the user's history.

use crate::catalog::{Song, SongCatalog};
use crate::mood::{DecidedBy, MoodClassifier, MoodLabel};
use crate::user::InteractionLog;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub mood: MoodLabel,
    pub song: Option<Song>,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum LogStatus {
    Logged,
    Failed(String),
    NotLoggedIn,
    NoSong,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationOutcome {
    pub recommendation: Recommendation,
    pub log_status: LogStatus,
}

#[derive(Clone)]
pub struct Recommender {
    classifier: MoodClassifier,
    catalog: Arc<dyn SongCatalog>,
}

impl Recommender {
    pub fn new(classifier: MoodClassifier, catalog: Arc<dyn SongCatalog>) -> Self {
        Self {
            classifier,
            catalog,
        }
    }

    pub fn classifier(&self) -> &MoodClassifier {
        &self.classifier
    }

    /// Never fails: a broken sentiment backend or catalog only adds a warning.
    pub async fn recommend(&self, text: &str) -> Recommendation {
        let classification = self.classifier.classify_detailed(text).await;
        let mut warnings = vec![];
        if let DecidedBy::SentimentUnavailable(reason) = &classification.decided_by {
            warnings.push(format!(
                "Sentiment analysis unavailable, mood defaulted to neutral: {}",
                reason
            ));
        }

        let mood = classification.mood;
        let song = match self.catalog.find_by_mood(mood) {
            Ok(song) => song,
            Err(err) => {
                warn!("Song lookup for mood {} failed: {}", mood, err);
                warnings.push(format!("Song lookup failed: {}", err));
                None
            }
        };

        Recommendation {
            mood,
            song,
            warnings,
        }
    }

    /// Logs the interaction for `user_id` when there is both a user and a
    /// song. A failed log keeps the recommendation.
    pub async fn recommend_and_log(
        &self,
        user_id: Option<usize>,
        text: &str,
        log: &dyn InteractionLog,
    ) -> RecommendationOutcome {
        let recommendation = self.recommend(text).await;

        let log_status = match (user_id, recommendation.song.as_ref()) {
            (None, _) => LogStatus::NotLoggedIn,
            (Some(_), None) => LogStatus::NoSong,
            (Some(user_id), Some(song)) => {
                match log.append(user_id, text, recommendation.mood, &song.id) {
                    Ok(()) => {
                        info!("Logged {} recommendation for user {}", recommendation.mood, user_id);
                        LogStatus::Logged
                    }
                    Err(err) => {
                        warn!("Could not log interaction of user {}: {}", user_id, err);
                        LogStatus::Failed(err.to_string())
                    }
                }
            }
        };

        RecommendationOutcome {
            recommendation,
            log_status,
        }
    }
}
