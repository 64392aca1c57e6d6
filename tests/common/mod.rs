//! Common test infrastructure
//!
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{song_record, TestDataDir, SONG_1_ID};
//!
//! #[test]
//! fn test_load_song() {
//!     let data = TestDataDir::new();
//!     data.write_records("song_data/A/song.json", &[song_record(SONG_1_ID, "Intro", "AR1", "Casual", 1.0)]);
//!     let (songs, _) = data.run().unwrap();
//!     assert_eq!(songs.songs, 1);
//! }
//! ```

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::*;
