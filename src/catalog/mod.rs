mod import;
mod song;
mod song_catalog;
mod sqlite_song_catalog;

pub use import::import_songs;
pub use song::Song;
pub use song_catalog::SongCatalog;
#[cfg(any(test, feature = "mock"))]
pub use song_catalog::MockSongCatalog;
pub use sqlite_song_catalog::SqliteSongCatalog;
