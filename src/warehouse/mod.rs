mod models;
mod schema;
mod store;

pub use models::{ArtistRow, SongRow, SongplayRow, TableRow, TimeRow, UserRow};
pub use schema::{
    ARTISTS_TABLE, SONGPLAYS_TABLE, SONGPLAY_SCHEMA, SONGS_TABLE, SONG_SELECT, TIME_TABLE,
    USERS_TABLE,
};
pub use store::{execute_many, execute_one, find_song, SongMatch, Warehouse};
