//! Module for errors.
use std::{error::Error, fmt::Display};

/// Error from the parsing and archive interface.
#[derive(Debug)]
pub enum IsdDataErr {
    // Inherited errors from std
    /// Error forwarded from std
    IO(::std::io::Error),

    // Other forwarded errors
    /// Database error
    Database(::rusqlite::Error),
    /// Error forwarded from the csv crate
    Csv(::csv::Error),
    /// General error with any cause information erased and replaced by a string
    GeneralError(String),

    // My own errors from this crate
    /// The date and time fields matched the record layout, but do not form a calendar timestamp.
    InvalidTimestamp(String),
    /// A number could not be read as a signed fixed point value.
    InvalidFixedPoint(String),
    /// A required column is missing from the station history header.
    MissingColumn(&'static str),
    /// The database structure is wrong.
    InvalidSchema,
}

impl Display for IsdDataErr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        use crate::errors::IsdDataErr::*;

        match self {
            IO(err) => write!(f, "std lib io error: {}", err),

            Database(err) => write!(f, "database error: {}", err),
            Csv(err) => write!(f, "error forwarded from csv crate: {}", err),
            GeneralError(msg) => write!(f, "general error forwarded: {}", msg),

            InvalidTimestamp(val) => write!(f, "invalid timestamp: {}", val),
            InvalidFixedPoint(val) => write!(f, "invalid fixed point number: {}", val),
            MissingColumn(col) => write!(f, "missing column in header: {}", col),
            InvalidSchema => write!(f, "invalid index format"),
        }
    }
}

impl Error for IsdDataErr {}

impl From<::std::io::Error> for IsdDataErr {
    fn from(err: ::std::io::Error) -> IsdDataErr {
        IsdDataErr::IO(err)
    }
}

impl From<::rusqlite::Error> for IsdDataErr {
    fn from(err: ::rusqlite::Error) -> IsdDataErr {
        IsdDataErr::Database(err)
    }
}

impl From<::csv::Error> for IsdDataErr {
    fn from(err: ::csv::Error) -> IsdDataErr {
        IsdDataErr::Csv(err)
    }
}
