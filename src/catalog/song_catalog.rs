use super::Song;
use crate::mood::MoodLabel;
use anyhow::Result;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait SongCatalog: Send + Sync {
    /// A song picked uniformly at random among the ones tagged with `mood`,
    /// `None` when there are none.
    fn find_by_mood(&self, mood: MoodLabel) -> Result<Option<Song>>;

    fn get_song(&self, id: &str) -> Result<Option<Song>>;

    fn add_song(&self, song: &Song) -> Result<()>;

    fn count_by_mood(&self, mood: MoodLabel) -> Result<usize>;

    fn songs_count(&self) -> Result<usize>;
}
