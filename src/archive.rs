//! An archive of parsed stations and readings in an sqlite database.

use std::path::PathBuf;

pub use self::query::{StoredReading, StoredStation};

/// The archive.
#[derive(Debug)]
pub struct Archive {
    root: PathBuf,                 // The root directory.
    db_conn: rusqlite::Connection, // An sqlite connection.
}

mod query;
mod root;
mod store;
