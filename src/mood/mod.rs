//! Mood labels and the keyword/polarity classifier that produces them.

mod classifier;
mod keywords;

pub use classifier::{polarity_to_mood, Classification, DecidedBy, MoodClassifier};
pub use keywords::{match_keywords, KeywordRule, KEYWORD_RULES};

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    Happy,
    Calm,
    Sad,
    Angry,
    Neutral,
    Fear,
    Surprise,
}

impl MoodLabel {
    pub const ALL: [MoodLabel; 7] = [
        MoodLabel::Happy,
        MoodLabel::Calm,
        MoodLabel::Sad,
        MoodLabel::Angry,
        MoodLabel::Neutral,
        MoodLabel::Fear,
        MoodLabel::Surprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Happy => "happy",
            MoodLabel::Calm => "calm",
            MoodLabel::Sad => "sad",
            MoodLabel::Angry => "angry",
            MoodLabel::Neutral => "neutral",
            MoodLabel::Fear => "fear",
            MoodLabel::Surprise => "surprise",
        }
    }
}

impl fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match MoodLabel::ALL
            .iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
        {
            Some(label) => Ok(*label),
            None => bail!("Unknown mood label {}", s),
        }
    }
}
