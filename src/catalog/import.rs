use super::{Song, SongCatalog};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Reads a JSON array of songs from `path` and adds them to `catalog`.
/// Songs whose id is already present are skipped. Returns how many were added.
pub fn import_songs<P: AsRef<Path>>(catalog: &dyn SongCatalog, path: P) -> Result<usize> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read songs file {:?}", path))?;
    let songs: Vec<Song> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse songs file {:?}", path))?;

    let mut added = 0;
    for song in songs.iter() {
        if catalog.get_song(&song.id)?.is_some() {
            warn!("Song {} already in catalog, skipping", song.id);
            continue;
        }
        catalog.add_song(song)?;
        added += 1;
    }
    info!(
        "Imported {} of {} songs from {:?}",
        added,
        songs.len(),
        path
    );
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MockSongCatalog, SqliteSongCatalog};
    use crate::mood::MoodLabel;
    use tempfile::TempDir;

    const SONGS_JSON: &str = r#"[
        {"id": "a", "song_title": "Happy", "artists": "Pharrell Williams", "link": "https://music.example/a", "mood": "happy"},
        {"id": "b", "title": "Weightless", "artists": "Marconi Union", "link": "https://music.example/b", "mood": "calm"},
        {"id": "c", "title": "Mad World", "artists": "Gary Jules", "link": "https://music.example/c", "mood": "sad"}
    ]"#;

    fn write_songs(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("songs.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn imports_all_new_songs() {
        let dir = TempDir::new().unwrap();
        let catalog = SqliteSongCatalog::new(dir.path().join("catalog.db")).unwrap();
        let path = write_songs(&dir, SONGS_JSON);

        assert_eq!(import_songs(&catalog, &path).unwrap(), 3);
        assert_eq!(catalog.songs_count().unwrap(), 3);
        let happy = catalog.get_song("a").unwrap().unwrap();
        assert_eq!(happy.title, "Happy");
        assert_eq!(happy.mood, MoodLabel::Happy);

        // Second run finds everything already there.
        assert_eq!(import_songs(&catalog, &path).unwrap(), 0);
        assert_eq!(catalog.songs_count().unwrap(), 3);
    }

    #[test]
    fn skips_existing_ids() {
        let dir = TempDir::new().unwrap();
        let path = write_songs(&dir, SONGS_JSON);

        let mut catalog = MockSongCatalog::new();
        catalog
            .expect_get_song()
            .returning(|id| {
                Ok((id == "b").then(|| Song {
                    id: "b".to_string(),
                    title: "Weightless".to_string(),
                    artists: "Marconi Union".to_string(),
                    link: "https://music.example/b".to_string(),
                    mood: MoodLabel::Calm,
                }))
            });
        catalog
            .expect_add_song()
            .withf(|song| song.id != "b")
            .times(2)
            .returning(|_| Ok(()));

        assert_eq!(import_songs(&catalog, &path).unwrap(), 2);
    }

    #[test]
    fn fails_on_bad_mood() {
        let dir = TempDir::new().unwrap();
        let catalog = SqliteSongCatalog::new(dir.path().join("catalog.db")).unwrap();
        let path = write_songs(
            &dir,
            r##"[{"id": "x", "title": "T", "artists": "A", "link": "#", "mood": "grumpy"}]"##,
        );

        assert!(import_songs(&catalog, &path).is_err());
        assert_eq!(catalog.songs_count().unwrap(), 0);
    }

    #[test]
    fn fails_on_missing_file() {
        let dir = TempDir::new().unwrap();
        let catalog = SqliteSongCatalog::new(dir.path().join("catalog.db")).unwrap();
        assert!(import_songs(&catalog, dir.path().join("nope.json")).is_err());
    }
}
