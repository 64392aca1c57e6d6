mod file_config;

pub use file_config::FileConfig;

use crate::etl::{LoadSettings, DEFAULT_CHUNK_SIZE};
use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub chunk_size: usize,
    pub file_extension: String,
    pub reset: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("sparkify.db"),
            song_data: PathBuf::from("data/song_data"),
            log_data: PathBuf::from("data/log_data"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            file_extension: "json".to_string(),
            reset: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub song_data: PathBuf,
    pub log_data: PathBuf,
    pub chunk_size: usize,
    pub file_extension: String,
    pub reset: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.db_path.clone());
        let song_data = file
            .song_data
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.song_data.clone());
        let log_data = file
            .log_data
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.log_data.clone());

        let chunk_size = file.chunk_size.unwrap_or(cli.chunk_size);
        if chunk_size == 0 {
            bail!("chunk_size must be at least 1");
        }

        let file_extension = file
            .file_extension
            .unwrap_or_else(|| cli.file_extension.clone())
            .trim_start_matches('.')
            .to_string();
        if file_extension.is_empty() {
            bail!("file_extension must not be empty");
        }

        Ok(Self {
            db_path,
            song_data,
            log_data,
            chunk_size,
            file_extension,
            reset: cli.reset,
        })
    }

    pub fn load_settings(&self) -> LoadSettings {
        LoadSettings {
            chunk_size: self.chunk_size,
            file_extension: self.file_extension.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_cli_only() {
        let cli = CliConfig {
            db_path: PathBuf::from("/data/warehouse.db"),
            song_data: PathBuf::from("/data/songs"),
            log_data: PathBuf::from("/data/logs"),
            chunk_size: 500,
            file_extension: "json".to_string(),
            reset: true,
        };

        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/data/warehouse.db"));
        assert_eq!(config.song_data, PathBuf::from("/data/songs"));
        assert_eq!(config.log_data, PathBuf::from("/data/logs"));
        assert_eq!(config.chunk_size, 500);
        assert!(config.reset);
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let cli = CliConfig {
            db_path: PathBuf::from("/should/be/overridden.db"),
            chunk_size: 100,
            ..Default::default()
        };

        let file_config = FileConfig {
            db_path: Some("/toml/sparkify.db".to_string()),
            log_data: Some("/toml/logs".to_string()),
            chunk_size: Some(2000),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();

        // TOML values should override CLI
        assert_eq!(config.db_path, PathBuf::from("/toml/sparkify.db"));
        assert_eq!(config.log_data, PathBuf::from("/toml/logs"));
        assert_eq!(config.chunk_size, 2000);
        // CLI value used when TOML doesn't specify
        assert_eq!(config.song_data, PathBuf::from("data/song_data"));
    }

    #[test]
    fn test_resolve_rejects_zero_chunk_size() {
        let cli = CliConfig {
            chunk_size: 0,
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("chunk_size must be at least 1"));
    }

    #[test]
    fn test_resolve_normalizes_extension() {
        let file_config = FileConfig {
            file_extension: Some(".jsonl".to_string()),
            ..Default::default()
        };
        let config = AppConfig::resolve(&CliConfig::default(), Some(file_config)).unwrap();
        assert_eq!(config.file_extension, "jsonl");
        assert_eq!(
            config.load_settings(),
            LoadSettings {
                chunk_size: DEFAULT_CHUNK_SIZE,
                file_extension: "jsonl".to_string(),
            }
        );
    }

    #[test]
    fn test_resolve_rejects_empty_extension() {
        let cli = CliConfig {
            file_extension: ".".to_string(),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&cli, None).is_err());
    }
}
