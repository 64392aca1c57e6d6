//! Shared constants for end-to-end tests

// ============================================================================
// Song Catalog
// ============================================================================

/// Artist with two songs in the catalog
pub const ARTIST_1_ID: &str = "ARD7TVE1187B99BFB1";
pub const ARTIST_1_NAME: &str = "Casual";

/// Artist with a single song
pub const ARTIST_2_ID: &str = "ARMJAGH1187FB546F3";
pub const ARTIST_2_NAME: &str = "The Box Tops";

pub const SONG_1_ID: &str = "SOMZWCG12A8C13C480";
pub const SONG_1_TITLE: &str = "I Didn't Mean To";
pub const SONG_1_DURATION: f64 = 218.93179;

pub const SONG_2_ID: &str = "SOUPIRU12A6D4FA1E1";
pub const SONG_2_TITLE: &str = "Der Kleine Dompfaff";
pub const SONG_2_DURATION: f64 = 207.77751;

pub const SONG_3_ID: &str = "SOCIWDW12A8C13D406";
pub const SONG_3_TITLE: &str = "Soul Deep";
pub const SONG_3_DURATION: f64 = 148.03546;

// ============================================================================
// Log Events
// ============================================================================

/// 2018-11-11 02:33:56.796 UTC
pub const BASE_TS: i64 = 1541903636796;

pub const USER_1_ID: &str = "8";
pub const USER_2_ID: &str = "26";
