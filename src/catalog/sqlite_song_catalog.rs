use super::{Song, SongCatalog};
use crate::mood::MoodLabel;
use crate::sqlite_column;
use crate::sqlite_persistence::{
    open_versioned_db, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};
use anyhow::{Context, Result};
use rand::seq::IndexedRandom;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// V 0
const SONG_TABLE_V_0: Table = Table {
    name: "song",
    columns: &[
        sqlite_column!(
            "id",
            &SqlType::Text,
            is_primary_key = true,
            non_null = true,
            is_unique = true
        ),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artists", &SqlType::Text, non_null = true),
        sqlite_column!("link", &SqlType::Text, non_null = true),
        sqlite_column!("mood", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_song_mood", "mood")],
};

pub const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[SONG_TABLE_V_0],
    migration: None,
}];

const SONG_COLUMNS: &str = "id, title, artists, link, mood";

fn song_from_row(row: &Row) -> rusqlite::Result<Song> {
    let mood: String = row.get(4)?;
    let mood = MoodLabel::from_str(&mood).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
    })?;
    Ok(Song {
        id: row.get(0)?,
        title: row.get(1)?,
        artists: row.get(2)?,
        link: row.get(3)?,
        mood,
    })
}

#[derive(Clone)]
pub struct SqliteSongCatalog {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSongCatalog {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned_db(db_path, VERSIONED_SCHEMAS)
            .context("Failed to open catalog db")?;
        Ok(SqliteSongCatalog {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl SongCatalog for SqliteSongCatalog {
    fn find_by_mood(&self, mood: MoodLabel) -> Result<Option<Song>> {
        let ids: Vec<String> = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare("SELECT id FROM song WHERE mood = ?1")?;
            let rows = stmt.query_map(params![mood.as_str()], |row| row.get(0))?;
            rows.collect::<rusqlite::Result<Vec<String>>>()?
        };

        let Some(id) = ids.choose(&mut rand::rng()) else {
            debug!("No songs tagged {}", mood);
            return Ok(None);
        };
        debug!("Picked song {} out of {} tagged {}", id, ids.len(), mood);
        self.get_song(id)
    }

    fn get_song(&self, id: &str) -> Result<Option<Song>> {
        let conn = self.conn.lock().unwrap();
        let song = conn
            .query_row(
                &format!("SELECT {} FROM song WHERE id = ?1", SONG_COLUMNS),
                params![id],
                song_from_row,
            )
            .optional()?;
        Ok(song)
    }

    fn add_song(&self, song: &Song) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            &format!("INSERT INTO song ({}) VALUES (?1, ?2, ?3, ?4, ?5)", SONG_COLUMNS),
            params![
                song.id,
                song.title,
                song.artists,
                song.link,
                song.mood.as_str()
            ],
        )
        .with_context(|| format!("Failed to add song {}", song.id))?;
        Ok(())
    }

    fn count_by_mood(&self, mood: MoodLabel) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM song WHERE mood = ?1",
            params![mood.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn songs_count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM song", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
