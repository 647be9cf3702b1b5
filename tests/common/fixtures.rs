//! Test fixture creation for the catalog and the user database

use super::constants::*;
use anyhow::Result;
use moodwave_server::config::{AppConfig, CliConfig};
use moodwave_server::identity::NewAccount;
use moodwave_server::Services;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

/// Writes a songs file with calm, fear and angry songs and builds services
/// on top of it, in a fresh temporary directory.
pub fn create_test_services() -> Result<(TempDir, Services)> {
    let dir = TempDir::new()?;

    let songs = json!([
        {
            "id": CALM_SONG_ID,
            "title": CALM_SONG_TITLE,
            "artists": "Marconi Union",
            "link": "https://music.example/weightless",
            "mood": "calm"
        },
        {
            "id": FEAR_SONG_ID,
            "song_title": FEAR_SONG_TITLE,
            "artists": "Sia",
            "link": "https://music.example/breathe-me",
            "mood": "fear"
        },
        {
            "id": ANGRY_SONG_ID,
            "title": ANGRY_SONG_TITLE,
            "artists": "Rage Against the Machine",
            "link": "https://music.example/killing-in-the-name",
            "mood": "angry"
        }
    ]);
    let songs_path = dir.path().join("songs.json");
    fs::write(&songs_path, serde_json::to_string_pretty(&songs)?)?;

    let cli = CliConfig {
        db_dir: Some(dir.path().to_path_buf()),
        import_songs: Some(songs_path),
        ..Default::default()
    };
    let config = AppConfig::resolve(&cli, None)?;
    let services = Services::build(&config)?;

    Ok((dir, services))
}

/// Signs up the test user through the configured identity provider.
pub async fn create_test_user(services: &Services) -> Result<usize> {
    let account = services
        .identity
        .create_account(NewAccount {
            name: TEST_NAME.to_string(),
            email: TEST_EMAIL.to_string(),
            age: TEST_AGE,
            password: TEST_PASS.to_string(),
            confirm_password: TEST_PASS.to_string(),
        })
        .await?;
    Ok(account.user_id)
}
