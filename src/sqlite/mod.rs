//! `SQLite` backend built on `rusqlite`.

mod connection;
pub mod params;
pub mod query;

pub use connection::{SqliteCommand, SqliteConnection, SqliteCursor};
