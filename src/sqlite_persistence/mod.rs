mod table;

pub use table::{Column, ConflictAction, ForeignKey, Schema, SqlType, Table};
