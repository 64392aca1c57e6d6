//! Loading of line-delimited JSON files into one unified record table.

pub mod fields;

use crate::error::{EtlError, EtlResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

pub type Record = Map<String, Value>;

/// Records from any number of files, kept in file order and then line order.
///
/// The columns are the union of every field seen, in first-seen order. A
/// record lacking one of them reads as null for it.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Record>,
}

/// Parses one JSON-lines file. Blank lines are skipped; any other line must
/// hold a JSON object.
pub fn read_records(path: &Path) -> EtlResult<Vec<Record>> {
    let file = File::open(path).map_err(|source| EtlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    // Raw bytes, so invalid UTF-8 surfaces as a parse error on its line
    let mut records = Vec::new();
    for (line_index, line_result) in reader.split(b'\n').enumerate() {
        let line = line_result.map_err(|source| EtlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let parse_error = |reason: String| EtlError::Parse {
            path: path.to_path_buf(),
            line: line_index + 1,
            reason,
        };
        match serde_json::from_slice::<Value>(&line) {
            Ok(Value::Object(record)) => records.push(record),
            Ok(other) => {
                return Err(parse_error(format!(
                    "expected a JSON object, found {}",
                    json_kind(&other)
                )))
            }
            Err(e) => return Err(parse_error(e.to_string())),
        }
    }
    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Removes exact duplicates from typed rows, keeping the first occurrence.
/// Two rows are equal when they serialize to the same JSON.
pub fn dedup_rows<T: Serialize>(rows: Vec<T>) -> EtlResult<Vec<T>> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut unique = Vec::with_capacity(rows.len());
    for (row_index, row) in rows.into_iter().enumerate() {
        let key = serde_json::to_string(&row).map_err(|e| EtlError::InvalidRecord {
            row: row_index,
            reason: e.to_string(),
        })?;
        if seen.insert(key) {
            unique.push(row);
        }
    }
    Ok(unique)
}

impl RecordTable {
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> EtlResult<Self> {
        let mut table = RecordTable::default();
        for path in paths {
            let path = path.as_ref();
            let records = read_records(path)?;
            debug!("Read {} records from {}", records.len(), path.display());
            for record in records {
                table.push(record);
            }
        }
        info!(
            "Loaded {} records with {} columns from {} files",
            table.len(),
            table.columns.len(),
            paths.len()
        );
        Ok(table)
    }

    pub fn from_records<I: IntoIterator<Item = Record>>(records: I) -> Self {
        let mut table = RecordTable::default();
        for record in records {
            table.push(record);
        }
        table
    }

    fn push(&mut self, record: Record) {
        for key in record.keys() {
            if !self.has_column(key) {
                self.columns.push(key.clone());
            }
        }
        self.rows.push(record);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Keeps the rows matching `predicate`. The columns are left untouched.
    pub fn filter<F>(&self, predicate: F) -> RecordTable
    where
        F: Fn(&Record) -> bool,
    {
        RecordTable {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    /// Removes rows equal to an earlier row over every column.
    pub fn dedup(&self) -> RecordTable {
        let mut seen = HashSet::with_capacity(self.rows.len());
        let rows = self
            .rows
            .iter()
            .filter(|row| seen.insert(self.row_key(row)))
            .cloned()
            .collect();
        RecordTable {
            columns: self.columns.clone(),
            rows,
        }
    }

    fn row_key(&self, row: &Record) -> String {
        Value::Array(
            self.columns
                .iter()
                .map(|c| row.get(c).cloned().unwrap_or(Value::Null))
                .collect(),
        )
        .to_string()
    }

    /// Selects `columns` from every row and deserializes the result into `T`.
    pub fn project<T: DeserializeOwned>(&self, columns: &[&str]) -> EtlResult<Vec<T>> {
        if let Some(missing) = columns.iter().find(|c| !self.has_column(c)) {
            return Err(EtlError::MissingColumn(missing.to_string()));
        }

        self.rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                let projected: Record = columns
                    .iter()
                    .map(|c| (c.to_string(), row.get(*c).cloned().unwrap_or(Value::Null)))
                    .collect();
                serde_json::from_value(Value::Object(projected)).map_err(|e| {
                    EtlError::InvalidRecord {
                        row: row_index,
                        reason: e.to_string(),
                    }
                })
            })
            .collect()
    }
}
