use crate::mood::MoodLabel;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    #[serde(alias = "song_title")]
    pub title: String,
    pub artists: String,
    pub link: String,
    pub mood: MoodLabel,
}
