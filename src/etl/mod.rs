//! Transform and load stages for song files and log files.

mod chunked;
mod driver;
mod log_files;
mod song_files;

pub use chunked::{load_in_chunks, DEFAULT_CHUNK_SIZE};
pub use driver::{process_data, run_pipelines, Pipeline};
pub use log_files::{
    load_songplays, next_song_events, process_log_files, time_rows, user_rows, PlayEvent,
    NEXT_SONG_PAGE,
};
pub use song_files::{artist_rows, process_song_files, song_rows};

/// Settings shared by both pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSettings {
    /// Maximum number of rows submitted per batch.
    pub chunk_size: usize,
    /// Extension of the source files, without the dot.
    pub file_extension: String,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            file_extension: "json".to_string(),
        }
    }
}

/// What one pipeline invocation submitted to the warehouse.
///
/// Counts are rows submitted, so rows absorbed by a conflict policy are
/// included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub files: usize,
    pub artists: usize,
    pub songs: usize,
    pub time_rows: usize,
    pub users: usize,
    pub songplays: usize,
    pub songplays_matched: usize,
    pub ambiguous_lookups: usize,
}
