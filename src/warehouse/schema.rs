//! Table definitions for the songplay star schema.
//!
//! `songplays` is the fact table; `users`, `songs`, `artists` and `time` are
//! its dimensions. Each definition carries its conflict policy, which decides
//! what a re-run does with rows that are already stored.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, ConflictAction, ForeignKey, Schema, SqlType, Table};

const ARTIST_FK: ForeignKey = ForeignKey {
    foreign_table: "artists",
    foreign_column: "artist_id",
};

const SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "song_id",
};

pub const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("artist_id", &SqlType::Text, is_primary_key = true, non_null = true),
        sqlite_column!("name", &SqlType::Text),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
    ],
    conflict_key: "artist_id",
    on_conflict: ConflictAction::Ignore,
};

pub const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("song_id", &SqlType::Text, is_primary_key = true, non_null = true),
        sqlite_column!("title", &SqlType::Text),
        sqlite_column!("artist_id", &SqlType::Text, foreign_key = Some(&ARTIST_FK)),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("duration", &SqlType::Real),
    ],
    conflict_key: "song_id",
    on_conflict: ConflictAction::Ignore,
};

/// Users are the only dimension that changes: a later row for the same
/// user_id moves them between the free and paid tiers.
pub const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("user_id", &SqlType::Integer, is_primary_key = true, non_null = true),
        sqlite_column!("first_name", &SqlType::Text, non_null = true),
        sqlite_column!("last_name", &SqlType::Text, non_null = true),
        sqlite_column!("gender", &SqlType::Text),
        sqlite_column!("level", &SqlType::Text),
    ],
    conflict_key: "user_id",
    on_conflict: ConflictAction::Update(&["level"]),
};

pub const TIME_TABLE: Table = Table {
    name: "time",
    columns: &[
        sqlite_column!("start_time", &SqlType::Text, is_primary_key = true, non_null = true),
        sqlite_column!("hour", &SqlType::Integer),
        sqlite_column!("day", &SqlType::Integer),
        sqlite_column!("week", &SqlType::Integer),
        sqlite_column!("month", &SqlType::Integer),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("weekday", &SqlType::Integer),
    ],
    conflict_key: "start_time",
    on_conflict: ConflictAction::Ignore,
};

pub const SONGPLAYS_TABLE: Table = Table {
    name: "songplays",
    columns: &[
        sqlite_column!("songplay_id", &SqlType::Integer, is_primary_key = true, non_null = true),
        sqlite_column!("start_time", &SqlType::Text, non_null = true),
        sqlite_column!("user_id", &SqlType::Integer),
        sqlite_column!("level", &SqlType::Text),
        sqlite_column!("song_id", &SqlType::Text, foreign_key = Some(&SONG_FK)),
        sqlite_column!("artist_id", &SqlType::Text, foreign_key = Some(&ARTIST_FK)),
        sqlite_column!("session_id", &SqlType::Integer),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("user_agent", &SqlType::Text),
    ],
    conflict_key: "songplay_id",
    on_conflict: ConflictAction::Ignore,
};

/// Tables in creation order; referenced tables come before the tables
/// pointing at them.
pub const SONGPLAY_SCHEMA: Schema = Schema {
    tables: &[
        USERS_TABLE,
        TIME_TABLE,
        ARTISTS_TABLE,
        SONGS_TABLE,
        SONGPLAYS_TABLE,
    ],
};

/// Resolves a played track to its (song_id, artist_id) by exact title,
/// artist name and duration.
pub const SONG_SELECT: &str = "SELECT s.song_id, s.artist_id FROM songs s \
     JOIN artists a ON a.artist_id = s.artist_id \
     WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3";
