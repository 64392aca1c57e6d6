//! SQLite-backed warehouse holding the songplay star schema.

use super::models::TableRow;
use super::schema::{SONGPLAY_SCHEMA, SONG_SELECT};
use crate::error::{EtlError, EtlResult};
use rusqlite::{params, Connection, Transaction};
use std::path::Path;
use tracing::{debug, info};

pub struct Warehouse {
    conn: Connection,
}

fn table_count(conn: &Connection) -> EtlResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;
    Ok(count)
}

impl Warehouse {
    /// Opens (or creates) the warehouse database at `db_path`.
    ///
    /// A database with no tables gets the full schema. An existing one is
    /// validated against it instead, so a run never writes into tables of
    /// an unexpected shape.
    pub fn open<P: AsRef<Path>>(db_path: P) -> EtlResult<Self> {
        let conn = Connection::open(db_path.as_ref())?;
        Self::from_connection(conn)
    }

    /// Opens the database at `db_path` and replaces whatever warehouse
    /// tables it holds with empty ones, skipping validation.
    pub fn recreate<P: AsRef<Path>>(db_path: P) -> EtlResult<Self> {
        let conn = Connection::open(db_path.as_ref())?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let warehouse = Warehouse { conn };
        warehouse.reset()?;
        Ok(warehouse)
    }

    pub fn open_in_memory() -> EtlResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> EtlResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;

        if table_count(&conn)? == 0 {
            info!("Creating warehouse schema");
            SONGPLAY_SCHEMA.create(&conn)?;
        } else {
            SONGPLAY_SCHEMA.validate(&conn)?;
        }

        Ok(Warehouse { conn })
    }

    /// Drops every warehouse table and creates them again, empty.
    pub fn reset(&self) -> EtlResult<()> {
        info!("Dropping and recreating warehouse tables");
        SONGPLAY_SCHEMA.drop(&self.conn)?;
        SONGPLAY_SCHEMA.create(&self.conn)?;
        Ok(())
    }

    pub fn transaction(&mut self) -> EtlResult<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Row count of every table, in creation order.
    pub fn table_counts(&self) -> EtlResult<Vec<(&'static str, i64)>> {
        SONGPLAY_SCHEMA
            .tables
            .iter()
            .map(|table| Ok((table.name, table.count(&self.conn)?)))
            .collect()
    }

    pub fn count(&self, table_name: &str) -> EtlResult<i64> {
        match SONGPLAY_SCHEMA.table(table_name) {
            Some(table) => table.count(&self.conn),
            None => Err(EtlError::SchemaMismatch(format!(
                "{} is not a warehouse table",
                table_name
            ))),
        }
    }
}

/// Inserts a single row through its table's upsert statement.
pub fn execute_one<R: TableRow>(conn: &Connection, row: &R) -> EtlResult<usize> {
    let mut stmt = conn.prepare_cached(&R::TABLE.insert_sql())?;
    Ok(stmt.execute(&*row.params())?)
}

/// Inserts a batch of rows, in order, reusing one prepared statement.
pub fn execute_many<R: TableRow>(conn: &Connection, rows: &[R]) -> EtlResult<usize> {
    let mut stmt = conn.prepare_cached(&R::TABLE.insert_sql())?;
    let mut changed = 0;
    for row in rows {
        changed += stmt.execute(&*row.params())?;
    }
    Ok(changed)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongMatch {
    pub song_id: String,
    pub artist_id: String,
    /// More than one song/artist pair satisfied the lookup; the first
    /// returned row was used.
    pub ambiguous: bool,
}

/// Looks up the stored song matching a played track.
///
/// All three predicates are equalities, so a missing value never matches.
pub fn find_song(
    conn: &Connection,
    title: Option<&str>,
    artist_name: Option<&str>,
    duration: Option<f64>,
) -> EtlResult<Option<SongMatch>> {
    let mut stmt = conn.prepare_cached(SONG_SELECT)?;
    let mut rows = stmt.query(params![title, artist_name, duration])?;

    let Some(row) = rows.next()? else {
        return Ok(None);
    };
    let song_id: String = row.get(0)?;
    let artist_id: String = row.get(1)?;
    let ambiguous = rows.next()?.is_some();
    if ambiguous {
        debug!(
            "Lookup for {:?} by {:?} matched more than one song, using {}",
            title, artist_name, song_id
        );
    }

    Ok(Some(SongMatch {
        song_id,
        artist_id,
        ambiguous,
    }))
}
