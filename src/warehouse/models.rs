//! Rows of the five target tables.
//!
//! The serde attributes map source record fields onto table columns, so a
//! row type can be projected straight out of a `RecordTable`.

use super::schema::{ARTISTS_TABLE, SONGPLAYS_TABLE, SONGS_TABLE, TIME_TABLE, USERS_TABLE};
use crate::records::fields::deserialize_numeric_id;
use crate::sqlite_persistence::Table;
use chrono::{Datelike, NaiveDateTime, Timelike};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};

/// A row that can be bound to its table's insert statement.
///
/// `params` must yield one value per column, in the table's column order.
pub trait TableRow {
    const TABLE: &'static Table;

    fn params(&self) -> Vec<&dyn ToSql>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistRow {
    pub artist_id: String,
    #[serde(rename = "artist_name")]
    pub name: Option<String>,
    #[serde(rename = "artist_location")]
    pub location: Option<String>,
    #[serde(rename = "artist_latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "artist_longitude")]
    pub longitude: Option<f64>,
}

impl TableRow for ArtistRow {
    const TABLE: &'static Table = &ARTISTS_TABLE;

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.artist_id,
            &self.name,
            &self.location,
            &self.latitude,
            &self.longitude,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRow {
    pub song_id: String,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub year: Option<i64>,
    pub duration: Option<f64>,
}

impl TableRow for SongRow {
    const TABLE: &'static Table = &SONGS_TABLE;

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.song_id,
            &self.title,
            &self.artist_id,
            &self.year,
            &self.duration,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    #[serde(deserialize_with = "deserialize_numeric_id")]
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

impl TableRow for UserRow {
    const TABLE: &'static Table = &USERS_TABLE;

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.user_id,
            &self.first_name,
            &self.last_name,
            &self.gender,
            &self.level,
        ]
    }
}

/// Calendar breakdown of one playback timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRow {
    pub start_time: NaiveDateTime,
    pub hour: u32,
    pub day: u32,
    /// ISO 8601 week number.
    pub week: u32,
    pub month: u32,
    pub year: i32,
    /// Days since Monday, so Monday is 0 and Sunday is 6.
    pub weekday: u32,
}

impl From<NaiveDateTime> for TimeRow {
    fn from(start_time: NaiveDateTime) -> Self {
        TimeRow {
            start_time,
            hour: start_time.hour(),
            day: start_time.day(),
            week: start_time.iso_week().week(),
            month: start_time.month(),
            year: start_time.year(),
            weekday: start_time.weekday().num_days_from_monday(),
        }
    }
}

impl TableRow for TimeRow {
    const TABLE: &'static Table = &TIME_TABLE;

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.start_time,
            &self.hour,
            &self.day,
            &self.week,
            &self.month,
            &self.year,
            &self.weekday,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongplayRow {
    pub songplay_id: i64,
    pub start_time: NaiveDateTime,
    pub user_id: i64,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl TableRow for SongplayRow {
    const TABLE: &'static Table = &SONGPLAYS_TABLE;

    fn params(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.songplay_id,
            &self.start_time,
            &self.user_id,
            &self.level,
            &self.song_id,
            &self.artist_id,
            &self.session_id,
            &self.location,
            &self.user_agent,
        ]
    }
}
