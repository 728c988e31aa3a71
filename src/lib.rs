#![deny(missing_docs)]
//! Package to parse NOAA Integrated Surface Data (ISD) files and the ISD station history, and to
//! load the results into an archive.
//!
//! Lines are matched against the fixed width mandatory section of an ISD record with the pressure
//! optionally taken from the additional data section. Each file yields its readings in file
//! order, and batches of files are grouped by station. Unreadable files degrade to empty results
//! so a batch is never lost to one bad input.

//
// Public API
//
pub use archive::{Archive, StoredReading, StoredStation};
pub use cmd_line::CmdLineArgs;
pub use coords::{Coords, FixedPoint};
pub use errors::IsdDataErr;
pub use history::{HistoryColumn, HistoryRecord};
pub use parser::{parse_line, RawRecord, MANDATORY_WIDTH};
pub use reader::{parse_file, parse_many, parse_one, ParsedFile, RejectedLine};
pub use reading::{Reading, MISSING_PRESSURE};
pub use station::StationIdentity;

pub mod history;
pub mod reader;

//
// Implementation only
//
mod archive;
mod cmd_line;
mod coords;
mod errors;
mod parser;
mod reading;
mod station;
