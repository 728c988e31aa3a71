//! Loading the ISD station history file, `isd-history.csv`.

use std::path::Path;

use chrono::NaiveDate;
use log::{debug, error, warn};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, IntoStaticStr};

use crate::{
    coords::FixedPoint, errors::IsdDataErr, reading::parse_date, station::StationIdentity,
};

/// Columns of the station history used here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, IntoStaticStr)]
#[allow(missing_docs)]
pub enum HistoryColumn {
    #[strum(serialize = "USAF")]
    Usaf,
    #[strum(serialize = "LAT")]
    Lat,
    #[strum(serialize = "LON")]
    Lon,
    #[strum(serialize = "ELEV(M)")]
    Elevation,
    #[strum(serialize = "BEGIN")]
    Begin,
    #[strum(serialize = "END")]
    End,
}

impl HistoryColumn {
    /// Whether a file without this column is unusable.
    pub fn required(self) -> bool {
        self != HistoryColumn::Begin
    }

    /// Name of the column in the header row.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// A station and the period it has data for.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRecord {
    /// The station.
    pub station: StationIdentity,
    /// First day with data, if known.
    pub begin: Option<NaiveDate>,
    /// Last day with data.
    pub end: NaiveDate,
}

// Index of each column in a row, in the order of HistoryColumn::iter().
struct ColumnIndex {
    indexes: Vec<(HistoryColumn, Option<usize>)>,
}

impl ColumnIndex {
    fn new(headers: &csv::StringRecord) -> Result<Self, IsdDataErr> {
        let mut indexes = Vec::with_capacity(6);

        for col in HistoryColumn::iter() {
            let idx = headers.iter().position(|hdr| hdr.trim() == col.name());

            if idx.is_none() && col.required() {
                return Err(IsdDataErr::MissingColumn(col.name()));
            }

            indexes.push((col, idx));
        }

        Ok(ColumnIndex { indexes })
    }

    fn get<'a>(&self, row: &'a csv::StringRecord, col: HistoryColumn) -> &'a str {
        self.indexes
            .iter()
            .find(|(c, _)| *c == col)
            .and_then(|(_, idx)| *idx)
            .and_then(|idx| row.get(idx))
            .map(str::trim)
            .unwrap_or("")
    }
}

/// Load every usable row of a station history file.
///
/// Rows missing an identifier, a coordinate, or the elevation are left out. Rows with an end date
/// or a number that cannot be parsed are logged and left out.
pub fn load_history(path: &dyn AsRef<Path>) -> Result<Vec<HistoryRecord>, IsdDataErr> {
    let path = path.as_ref();

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let columns = ColumnIndex::new(rdr.headers()?)?;

    let mut records = vec![];
    for (idx, row) in rdr.records().enumerate() {
        // Header is line 1.
        let line_num = idx + 2;

        let row = match row {
            Ok(row) => row,
            Err(err) => {
                warn!("{}:{}: skipping row: {}", path.display(), line_num, err);
                continue;
            }
        };

        let end = match parse_date(columns.get(&row, HistoryColumn::End)) {
            Ok(end) => end,
            Err(err) => {
                warn!("{}:{}: skipping row: {}", path.display(), line_num, err);
                continue;
            }
        };

        let usaf_id = columns.get(&row, HistoryColumn::Usaf);
        let lat = columns.get(&row, HistoryColumn::Lat);
        let lon = columns.get(&row, HistoryColumn::Lon);
        let elevation = columns.get(&row, HistoryColumn::Elevation);

        if usaf_id.is_empty() || lat.is_empty() || lon.is_empty() || elevation.is_empty() {
            debug!("{}:{}: incomplete station", path.display(), line_num);
            continue;
        }

        let station = match parse_station(usaf_id, lat, lon, elevation) {
            Ok(station) => station,
            Err(err) => {
                warn!("{}:{}: skipping row: {}", path.display(), line_num, err);
                continue;
            }
        };

        let begin = parse_date(columns.get(&row, HistoryColumn::Begin)).ok();

        records.push(HistoryRecord {
            station,
            begin,
            end,
        });
    }

    Ok(records)
}

fn parse_station(
    usaf_id: &str,
    lat: &str,
    lon: &str,
    elevation: &str,
) -> Result<StationIdentity, IsdDataErr> {
    Ok(StationIdentity {
        id: usaf_id.to_owned(),
        lat: FixedPoint::parse_decimal(lat)?,
        lon: FixedPoint::parse_decimal(lon)?,
        elevation: FixedPoint::parse_decimal(elevation)?,
    })
}

/// Load the stations that still had data on or after `cutoff`.
///
/// A file that cannot be read is logged and gives no stations.
pub fn load(path: &dyn AsRef<Path>, cutoff: NaiveDate) -> Vec<StationIdentity> {
    match load_history(path) {
        Ok(records) => records
            .into_iter()
            .filter(|rec| rec.end >= cutoff)
            .map(|rec| rec.station)
            .collect(),
        Err(err) => {
            error!("Cannot load file {}: {}", path.as_ref().display(), err);
            vec![]
        }
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
