//! Log files carry one user-activity event per line. Only playback events
//! (`page == "NextSong"`) feed the warehouse: they produce the `time`,
//! `users` and `songplays` rows.

use super::chunked::load_in_chunks;
use super::{LoadReport, LoadSettings};
use crate::error::EtlResult;
use crate::records::fields::{deserialize_epoch_millis, deserialize_numeric_id};
use crate::records::{dedup_rows, RecordTable};
use crate::warehouse::{execute_one, find_song, SongMatch, SongplayRow, TimeRow, UserRow};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

pub const NEXT_SONG_PAGE: &str = "NextSong";

const USER_COLUMNS: &[&str] = &["userId", "firstName", "lastName", "gender", "level"];

const EVENT_COLUMNS: &[&str] = &[
    "ts",
    "userId",
    "level",
    "song",
    "artist",
    "length",
    "sessionId",
    "location",
    "userAgent",
];

#[derive(Debug, Deserialize)]
struct EventTime {
    #[serde(deserialize_with = "deserialize_epoch_millis")]
    ts: NaiveDateTime,
}

/// The fields of a playback event that end up in `songplays`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayEvent {
    #[serde(rename = "ts", deserialize_with = "deserialize_epoch_millis")]
    pub start_time: NaiveDateTime,
    #[serde(deserialize_with = "deserialize_numeric_id")]
    pub user_id: i64,
    pub level: Option<String>,
    pub song: Option<String>,
    pub artist: Option<String>,
    pub length: Option<f64>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl PlayEvent {
    pub fn into_songplay(self, songplay_id: i64, found: Option<SongMatch>) -> SongplayRow {
        let (song_id, artist_id) = match found {
            Some(m) => (Some(m.song_id), Some(m.artist_id)),
            None => (None, None),
        };
        SongplayRow {
            songplay_id,
            start_time: self.start_time,
            user_id: self.user_id,
            level: self.level,
            song_id,
            artist_id,
            session_id: self.session_id,
            location: self.location,
            user_agent: self.user_agent,
        }
    }
}

/// Rows describing an actual track playback, in source order.
pub fn next_song_events(logs: &RecordTable) -> RecordTable {
    let page = Value::String(NEXT_SONG_PAGE.to_string());
    logs.filter(|record| record.get("page") == Some(&page))
}

/// One time row per event. Repeated timestamps are left for the table's
/// conflict policy to absorb.
pub fn time_rows(events: &RecordTable) -> EtlResult<Vec<TimeRow>> {
    Ok(events
        .project::<EventTime>(&["ts"])?
        .into_iter()
        .map(|e| TimeRow::from(e.ts))
        .collect())
}

/// Distinct user rows after coercing `userId` to an integer.
///
/// A user whose level changed yields one row per level. Submission order
/// decides which level the table keeps.
pub fn user_rows(events: &RecordTable) -> EtlResult<Vec<UserRow>> {
    dedup_rows(events.project(USER_COLUMNS)?)
}

/// Resolves and inserts one songplay per event, one at a time, using each
/// event's position as its id.
///
/// The song lookup reads the warehouse, so the song pipeline must have been
/// committed before this runs.
pub fn load_songplays(
    conn: &Connection,
    plays: &RecordTable,
    report: &mut LoadReport,
) -> EtlResult<()> {
    let events: Vec<PlayEvent> = plays.project(EVENT_COLUMNS)?;
    for (position, event) in events.into_iter().enumerate() {
        let found = find_song(
            conn,
            event.song.as_deref(),
            event.artist.as_deref(),
            event.length,
        )?;
        if let Some(m) = &found {
            report.songplays_matched += 1;
            if m.ambiguous {
                report.ambiguous_lookups += 1;
            }
        }
        execute_one(conn, &event.into_songplay(position as i64, found))?;
        report.songplays += 1;
    }
    Ok(())
}

/// Loads log files into the `time`, `users` and `songplays` tables.
pub fn process_log_files(
    conn: &Connection,
    files: &[PathBuf],
    settings: &LoadSettings,
) -> EtlResult<LoadReport> {
    let mut report = LoadReport {
        files: files.len(),
        ..Default::default()
    };
    if files.is_empty() {
        info!("No log files to load");
        return Ok(report);
    }

    let logs = RecordTable::load(files)?;
    let plays = next_song_events(&logs);
    let unique_plays = plays.dedup();
    info!(
        "{} of {} log records are playbacks, {} distinct",
        plays.len(),
        logs.len(),
        unique_plays.len()
    );

    let times = time_rows(&unique_plays)?;
    report.time_rows = load_in_chunks(conn, &times, settings.chunk_size)?;

    let users = user_rows(&unique_plays)?;
    report.users = load_in_chunks(conn, &users, settings.chunk_size)?;

    load_songplays(conn, &plays, &mut report)?;

    info!(
        "Submitted {} time rows, {} users, {} songplays ({} matched a song)",
        report.time_rows, report.users, report.songplays, report.songplays_matched
    );
    Ok(report)
}
