use super::keywords::match_keywords;
use super::MoodLabel;
use crate::sentiment::SentimentAnalyzer;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const HAPPY_POLARITY_THRESHOLD: f64 = 0.4;
pub const SAD_POLARITY_THRESHOLD: f64 = -0.4;

/// Boundaries are exclusive: exactly 0.4 or -0.4 is neutral.
pub fn polarity_to_mood(polarity: f64) -> MoodLabel {
    if polarity > HAPPY_POLARITY_THRESHOLD {
        MoodLabel::Happy
    } else if polarity < SAD_POLARITY_THRESHOLD {
        MoodLabel::Sad
    } else {
        MoodLabel::Neutral
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DecidedBy {
    EmptyInput,
    Keyword(&'static str),
    Polarity(f64),
    SentimentUnavailable(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    pub mood: MoodLabel,
    pub decided_by: DecidedBy,
}

#[derive(Clone)]
pub struct MoodClassifier {
    sentiment: Arc<dyn SentimentAnalyzer>,
}

impl MoodClassifier {
    pub fn new(sentiment: Arc<dyn SentimentAnalyzer>) -> Self {
        Self { sentiment }
    }

    pub fn sentiment_name(&self) -> &str {
        self.sentiment.name()
    }

    pub async fn classify(&self, text: &str) -> MoodLabel {
        self.classify_detailed(text).await.mood
    }

    /// Empty or whitespace-only text is neutral without consulting the
    /// sentiment backend. Keywords are matched against the lowercased text,
    /// polarity is computed on the text as given. A failing backend yields
    /// neutral.
    pub async fn classify_detailed(&self, text: &str) -> Classification {
        if text.trim().is_empty() {
            return Classification {
                mood: MoodLabel::Neutral,
                decided_by: DecidedBy::EmptyInput,
            };
        }

        let lower = text.to_lowercase();
        if let Some((mood, keyword)) = match_keywords(&lower) {
            debug!("Keyword \"{}\" selected mood {}", keyword, mood);
            return Classification {
                mood,
                decided_by: DecidedBy::Keyword(keyword),
            };
        }

        match self.sentiment.polarity(text).await {
            Ok(polarity) => {
                let mood = polarity_to_mood(polarity);
                debug!("Polarity {:.3} selected mood {}", polarity, mood);
                Classification {
                    mood,
                    decided_by: DecidedBy::Polarity(polarity),
                }
            }
            Err(err) => {
                warn!(
                    "Sentiment backend {} failed, falling back to neutral: {}",
                    self.sentiment.name(),
                    err
                );
                Classification {
                    mood: MoodLabel::Neutral,
                    decided_by: DecidedBy::SentimentUnavailable(err.to_string()),
                }
            }
        }
    }
}
