//! User data models

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Song;
use crate::mood::MoodLabel;

pub const HISTORY_SNIPPET_CHARS: usize = 30;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct User {
    pub id: usize,
    pub email: String,
    pub username: String,
    pub name: String,
    pub age: Option<u32>,
    /// Subject id at the remote identity provider, for mirrored accounts.
    pub external_id: Option<String>,
    #[serde(skip)]
    pub created: SystemTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub age: Option<u32>,
    pub external_id: Option<String>,
}

/// The part of an email address before the `@`.
pub fn username_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}

#[derive(Clone, Debug, PartialEq)]
pub struct InteractionRecord {
    pub id: usize,
    pub user_id: usize,
    pub input_text: String,
    pub mood: MoodLabel,
    pub song_id: String,
    pub created: SystemTime,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub time: String,
    pub input_snippet: String,
    pub mood: MoodLabel,
    pub song_title: String,
    pub artists: String,
    pub link: String,
}

pub fn format_history_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn input_snippet(input: &str) -> String {
    let mut snippet: String = input.chars().take(HISTORY_SNIPPET_CHARS).collect();
    snippet.push_str("...");
    snippet
}

impl HistoryEntry {
    pub fn new(record: &InteractionRecord, song: Option<&Song>) -> Self {
        let (song_title, artists, link) = match song {
            Some(song) => (song.title.clone(), song.artists.clone(), song.link.clone()),
            None => ("N/A".to_string(), "N/A".to_string(), "#".to_string()),
        };
        HistoryEntry {
            time: format_history_time(record.created),
            input_snippet: input_snippet(&record.input_text),
            mood: record.mood,
            song_title,
            artists,
            link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(input: &str) -> InteractionRecord {
        InteractionRecord {
            id: 1,
            user_id: 1,
            input_text: input.to_string(),
            mood: MoodLabel::Calm,
            song_id: "s1".to_string(),
            created: SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        }
    }

    #[test]
    fn derives_username_from_email() {
        assert_eq!(username_from_email("jane.doe@example.com"), "jane.doe");
        assert_eq!(username_from_email("nodomain"), "nodomain");
    }

    #[test]
    fn snippet_always_gets_ellipsis() {
        assert_eq!(input_snippet("short"), "short...");
        assert_eq!(
            input_snippet("this sentence is definitely longer than thirty characters"),
            "this sentence is definitely lo..."
        );
        assert_eq!(input_snippet("àèìòù"), "àèìòù...");
    }

    #[test]
    fn formats_time_in_utc() {
        assert_eq!(
            format_history_time(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)),
            "2023-11-14 22:13:20"
        );
    }

    #[test]
    fn missing_song_shows_placeholders() {
        let entry = HistoryEntry::new(&record("feeling chill"), None);
        assert_eq!(entry.song_title, "N/A");
        assert_eq!(entry.artists, "N/A");
        assert_eq!(entry.link, "#");
        assert_eq!(entry.mood, MoodLabel::Calm);
        assert_eq!(entry.input_snippet, "feeling chill...");
    }

    #[test]
    fn joins_song_details() {
        let song = Song {
            id: "s1".to_string(),
            title: "Weightless".to_string(),
            artists: "Marconi Union".to_string(),
            link: "https://music.example/s1".to_string(),
            mood: MoodLabel::Calm,
        };
        let entry = HistoryEntry::new(&record("feeling chill"), Some(&song));
        assert_eq!(entry.song_title, "Weightless");
        assert_eq!(entry.artists, "Marconi Union");
        assert_eq!(entry.link, "https://music.example/s1");
        assert_eq!(entry.time, "2023-11-14 22:13:20");
    }
}
