//! Sparkify ETL Library
//!
//! Loads song metadata and user activity logs (JSON lines) into a SQLite
//! star schema: `songplays` facts with `users`, `songs`, `artists` and
//! `time` dimensions.

pub mod config;
pub mod discovery;
pub mod error;
pub mod etl;
pub mod records;
pub mod sqlite_persistence;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use error::{EtlError, EtlResult};
pub use etl::{process_data, run_pipelines, LoadReport, LoadSettings};
pub use warehouse::Warehouse;
