use super::log_files::process_log_files;
use super::song_files::process_song_files;
use super::{LoadReport, LoadSettings};
use crate::discovery::find_files;
use crate::error::EtlResult;
use crate::warehouse::Warehouse;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::info;

/// A pipeline receives every discovered file at once and runs inside the
/// driver's transaction.
pub type Pipeline = fn(&Connection, &[PathBuf], &LoadSettings) -> EtlResult<LoadReport>;

/// Discovers the files under `root`, runs `pipeline` over them and commits.
///
/// If the pipeline fails, the transaction is dropped uncommitted and rolls
/// back. Data committed by earlier calls is left as is.
pub fn process_data(
    warehouse: &mut Warehouse,
    root: &Path,
    settings: &LoadSettings,
    pipeline: Pipeline,
) -> EtlResult<LoadReport> {
    let files = find_files(root, &settings.file_extension)?;
    info!("{} files found in {}", files.len(), root.display());

    let tx = warehouse.transaction()?;
    let report = pipeline(&tx, &files, settings)?;
    tx.commit()?;

    info!("{} files processed.", files.len());
    Ok(report)
}

/// Loads the song files, commits, then loads the log files.
///
/// The order matters: songplay lookups only see songs and artists that are
/// already committed.
pub fn run_pipelines(
    warehouse: &mut Warehouse,
    song_root: &Path,
    log_root: &Path,
    settings: &LoadSettings,
) -> EtlResult<(LoadReport, LoadReport)> {
    let songs = process_data(warehouse, song_root, settings, process_song_files)?;
    let logs = process_data(warehouse, log_root, settings, process_log_files)?;
    Ok((songs, logs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EtlError;
    use std::fs;
    use tempfile::TempDir;

    fn failing_pipeline(
        conn: &Connection,
        _files: &[PathBuf],
        _settings: &LoadSettings,
    ) -> EtlResult<LoadReport> {
        conn.execute(
            "INSERT INTO artists (artist_id, name) VALUES ('AR1', 'Casual')",
            [],
        )?;
        Err(EtlError::MissingColumn("boom".to_string()))
    }

    #[test]
    fn test_failed_pipeline_rolls_back() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), "{}\n").unwrap();
        let mut warehouse = Warehouse::open_in_memory().unwrap();

        let result = process_data(
            &mut warehouse,
            dir.path(),
            &LoadSettings::default(),
            failing_pipeline,
        );

        assert!(result.is_err());
        assert_eq!(warehouse.count("artists").unwrap(), 0);
    }

    #[test]
    fn test_missing_root_aborts_before_pipeline() {
        let dir = TempDir::new().unwrap();
        let mut warehouse = Warehouse::open_in_memory().unwrap();

        let result = process_data(
            &mut warehouse,
            &dir.path().join("missing"),
            &LoadSettings::default(),
            process_song_files,
        );
        assert!(matches!(result, Err(EtlError::RootNotFound(_))));
    }

    #[test]
    fn test_reports_file_count() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("A")).unwrap();
        fs::write(
            dir.path().join("A").join("song.json"),
            "{\"artist_id\": \"AR1\", \"artist_name\": \"Casual\", \"artist_location\": null, \
             \"artist_latitude\": null, \"artist_longitude\": null, \"song_id\": \"SO1\", \
             \"title\": \"Intro\", \"year\": 0, \"duration\": 1.5}\n",
        )
        .unwrap();
        let mut warehouse = Warehouse::open_in_memory().unwrap();

        let report = process_data(
            &mut warehouse,
            dir.path(),
            &LoadSettings::default(),
            process_song_files,
        )
        .unwrap();

        assert_eq!(report.files, 1);
        assert_eq!(report.artists, 1);
        assert_eq!(report.songs, 1);
        assert_eq!(warehouse.count("songs").unwrap(), 1);
    }
}
