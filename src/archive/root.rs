use std::path::Path;

use super::Archive;

use crate::errors::IsdDataErr;

impl Archive {
    const DB_FILE: &'static str = "isd.db";

    /// Initialize a new archive.
    pub fn create(root: &dyn AsRef<Path>) -> Result<Self, IsdDataErr> {
        let db_file = root.as_ref().join(Archive::DB_FILE);
        let root = root.as_ref().to_path_buf();

        std::fs::create_dir_all(&root)?;

        // Create and set up the archive
        let db_conn = rusqlite::Connection::open_with_flags(
            db_file,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE | rusqlite::OpenFlags::SQLITE_OPEN_CREATE,
        )?;

        db_conn.execute_batch(include_str!("root/create_index.sql"))?;

        Ok(Archive { root, db_conn })
    }

    /// Open an existing archive.
    pub fn connect(root: &dyn AsRef<Path>) -> Result<Self, IsdDataErr> {
        let db_file = root.as_ref().join(Archive::DB_FILE);
        let root = root.as_ref().to_path_buf();

        let db_conn = rusqlite::Connection::open_with_flags(
            db_file,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE,
        )?;

        Self::validate_db_structure(&db_conn)?;

        Ok(Archive { root, db_conn })
    }

    /// Retrieve a path to the root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that every table has the columns the store and query code expect, in order.
    fn validate_db_structure(db_conn: &rusqlite::Connection) -> Result<(), IsdDataErr> {
        const TABLES: &[(&str, &[&str])] = &[
            ("stations", &["id", "usaf_id", "lat", "lon", "elevation"]),
            (
                "readings",
                &[
                    "id",
                    "usaf_id",
                    "lat",
                    "lon",
                    "elevation",
                    "valid_time",
                    "pressure",
                ],
            ),
        ];

        for &(table, expected) in TABLES {
            let mut stmt = db_conn.prepare(&format!("PRAGMA table_info({})", table))?;

            let columns: Vec<String> = stmt
                .query_map(rusqlite::NO_PARAMS, |row| row.get(1))?
                .collect::<Result<_, _>>()?;

            // A missing table has no columns.
            if columns != expected {
                return Err(IsdDataErr::InvalidSchema);
            }
        }

        Ok(())
    }
}
