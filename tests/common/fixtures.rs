//! Source file fixtures and warehouse helpers

use super::constants::*;
use rusqlite::types::Value as SqlValue;
use serde_json::{json, Value};
use sparkify_etl::{run_pipelines, EtlResult, LoadReport, LoadSettings, Warehouse};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A temporary directory holding `song_data/`, `log_data/` and a warehouse
/// database file.
pub struct TestDataDir {
    pub dir: TempDir,
    pub song_root: PathBuf,
    pub log_root: PathBuf,
    pub db_path: PathBuf,
}

impl TestDataDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let song_root = dir.path().join("song_data");
        let log_root = dir.path().join("log_data");
        fs::create_dir_all(&song_root).unwrap();
        fs::create_dir_all(&log_root).unwrap();
        let db_path = dir.path().join("sparkify.db");
        Self {
            dir,
            song_root,
            log_root,
            db_path,
        }
    }

    /// Writes `records` as one JSON object per line at `relative_path`,
    /// replacing any previous content.
    pub fn write_records(&self, relative_path: &str, records: &[Value]) {
        let path = self.dir.path().join(relative_path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let content: String = records.iter().map(|r| format!("{}\n", r)).collect();
        fs::write(path, content).unwrap();
    }

    pub fn write_raw(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Writes the three-song catalog: two songs by artist 1, one by artist 2.
    pub fn write_catalog(&self) {
        self.write_records(
            "song_data/A/A/TRAAAAW128F429D538.json",
            &[song_record(
                SONG_1_ID,
                SONG_1_TITLE,
                ARTIST_1_ID,
                ARTIST_1_NAME,
                SONG_1_DURATION,
            )],
        );
        self.write_records(
            "song_data/A/B/TRAABCL128F4286650.json",
            &[song_record(
                SONG_2_ID,
                SONG_2_TITLE,
                ARTIST_1_ID,
                ARTIST_1_NAME,
                SONG_2_DURATION,
            )],
        );
        self.write_records(
            "song_data/B/A/TRAABDL12903CAABBA.json",
            &[song_record(
                SONG_3_ID,
                SONG_3_TITLE,
                ARTIST_2_ID,
                ARTIST_2_NAME,
                SONG_3_DURATION,
            )],
        );
    }

    pub fn open(&self) -> Warehouse {
        Warehouse::open(&self.db_path).expect("Failed to open warehouse")
    }

    pub fn run(&self) -> EtlResult<(LoadReport, LoadReport)> {
        self.run_with_chunk_size(LoadSettings::default().chunk_size)
    }

    pub fn run_with_chunk_size(&self, chunk_size: usize) -> EtlResult<(LoadReport, LoadReport)> {
        let mut warehouse = Warehouse::open(&self.db_path)?;
        let settings = LoadSettings {
            chunk_size,
            ..Default::default()
        };
        run_pipelines(&mut warehouse, &self.song_root, &self.log_root, &settings)
    }
}

pub fn song_record(
    song_id: &str,
    title: &str,
    artist_id: &str,
    artist_name: &str,
    duration: f64,
) -> Value {
    json!({
        "num_songs": 1,
        "artist_id": artist_id,
        "artist_latitude": null,
        "artist_longitude": null,
        "artist_location": "",
        "artist_name": artist_name,
        "song_id": song_id,
        "title": title,
        "duration": duration,
        "year": 0
    })
}

/// A log event for `USER_1_ID` on the free tier. Adjust fields with
/// `with`.
pub fn log_event(page: &str, ts: i64, song: &str, artist: &str, length: f64) -> Value {
    json!({
        "artist": artist,
        "auth": "Logged In",
        "firstName": "Ryan",
        "gender": "M",
        "itemInSession": 0,
        "lastName": "Smith",
        "length": length,
        "level": "free",
        "location": "San Jose-Sunnyvale-Santa Clara, CA",
        "method": "PUT",
        "page": page,
        "registration": 1541016707796.0,
        "sessionId": 169,
        "song": song,
        "status": 200,
        "ts": ts,
        "userAgent": "Mozilla/5.0 (X11; Linux x86_64)",
        "userId": USER_1_ID
    })
}

/// Returns `event` with `field` set to `value`.
pub fn with(mut event: Value, field: &str, value: Value) -> Value {
    event[field] = value;
    event
}

/// Every row of `table`, ordered by its first column.
pub fn dump_table(warehouse: &Warehouse, table: &str) -> Vec<Vec<SqlValue>> {
    let mut stmt = warehouse
        .connection()
        .prepare(&format!("SELECT * FROM \"{}\" ORDER BY 1", table))
        .unwrap();
    let column_count = stmt.column_count();
    let rows = stmt
        .query_map([], |row| {
            (0..column_count)
                .map(|i| row.get::<_, SqlValue>(i))
                .collect::<rusqlite::Result<Vec<_>>>()
        })
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap();
    rows
}
