use crate::error::EtlResult;
use crate::warehouse::{execute_many, TableRow};
use rusqlite::Connection;
use tracing::debug;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Submits `rows` in contiguous batches of at most `chunk_size`, keeping
/// input order. Returns the number of rows submitted.
///
/// Chunking only bounds the size of each batch. Conflicts between rows in
/// different chunks resolve exactly as they would within one.
pub fn load_in_chunks<R: TableRow>(
    conn: &Connection,
    rows: &[R],
    chunk_size: usize,
) -> EtlResult<usize> {
    let chunk_size = chunk_size.max(1);
    let mut submitted = 0;
    for (chunk_index, chunk) in rows.chunks(chunk_size).enumerate() {
        execute_many(conn, chunk)?;
        submitted += chunk.len();
        debug!(
            "{}: chunk {} submitted ({}/{} rows)",
            R::TABLE.name,
            chunk_index + 1,
            submitted,
            rows.len()
        );
    }
    Ok(submitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::{UserRow, Warehouse};

    fn user(id: i64, level: &str) -> UserRow {
        UserRow {
            user_id: id,
            first_name: Some(format!("First{id}")),
            last_name: Some(format!("Last{id}")),
            gender: None,
            level: Some(level.to_string()),
        }
    }

    fn snapshot(warehouse: &Warehouse) -> Vec<(i64, String)> {
        let mut stmt = warehouse
            .connection()
            .prepare("SELECT user_id, level FROM users ORDER BY user_id")
            .unwrap();
        let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        rows
    }

    #[test]
    fn test_chunk_boundaries_do_not_change_outcome() {
        let rows = vec![
            user(1, "free"),
            user(2, "free"),
            user(1, "paid"),
            user(3, "paid"),
            user(2, "paid"),
            user(1, "free"),
            user(4, "free"),
        ];

        let whole = Warehouse::open_in_memory().unwrap();
        assert_eq!(
            load_in_chunks(whole.connection(), &rows, rows.len()).unwrap(),
            rows.len()
        );

        for chunk_size in [1, 2, 3] {
            let chunked = Warehouse::open_in_memory().unwrap();
            assert_eq!(
                load_in_chunks(chunked.connection(), &rows, chunk_size).unwrap(),
                rows.len()
            );
            assert_eq!(snapshot(&chunked), snapshot(&whole));
        }

        assert_eq!(
            snapshot(&whole),
            vec![
                (1, "free".to_string()),
                (2, "paid".to_string()),
                (3, "paid".to_string()),
                (4, "free".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_input_submits_nothing() {
        let warehouse = Warehouse::open_in_memory().unwrap();
        let rows: Vec<UserRow> = Vec::new();
        assert_eq!(load_in_chunks(warehouse.connection(), &rows, 10).unwrap(), 0);
    }
}
