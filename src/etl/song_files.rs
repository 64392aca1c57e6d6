use super::chunked::load_in_chunks;
use super::{LoadReport, LoadSettings};
use crate::error::EtlResult;
use crate::records::{dedup_rows, RecordTable};
use crate::warehouse::{ArtistRow, SongRow};
use rusqlite::Connection;
use std::path::PathBuf;
use tracing::info;

const ARTIST_COLUMNS: &[&str] = &[
    "artist_id",
    "artist_name",
    "artist_location",
    "artist_latitude",
    "artist_longitude",
];

const SONG_COLUMNS: &[&str] = &["song_id", "title", "artist_id", "year", "duration"];

/// Distinct artist rows, in first-seen order.
pub fn artist_rows(songs: &RecordTable) -> EtlResult<Vec<ArtistRow>> {
    dedup_rows(songs.project(ARTIST_COLUMNS)?)
}

/// Distinct song rows, in first-seen order.
pub fn song_rows(songs: &RecordTable) -> EtlResult<Vec<SongRow>> {
    dedup_rows(songs.project(SONG_COLUMNS)?)
}

/// Loads song files into the `artists` and `songs` tables.
///
/// Artists go first so every song's artist reference can be satisfied.
pub fn process_song_files(
    conn: &Connection,
    files: &[PathBuf],
    settings: &LoadSettings,
) -> EtlResult<LoadReport> {
    let mut report = LoadReport {
        files: files.len(),
        ..Default::default()
    };
    if files.is_empty() {
        info!("No song files to load");
        return Ok(report);
    }

    let songs = RecordTable::load(files)?;

    let artists = artist_rows(&songs)?;
    report.artists = load_in_chunks(conn, &artists, settings.chunk_size)?;

    let song_values = song_rows(&songs)?;
    report.songs = load_in_chunks(conn, &song_values, settings.chunk_size)?;

    info!(
        "Submitted {} artists and {} songs from {} records",
        report.artists,
        report.songs,
        songs.len()
    );
    Ok(report)
}
