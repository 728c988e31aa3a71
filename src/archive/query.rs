use chrono::NaiveDateTime;
use metfor::{HectoPascal, Meters};

use super::Archive;

use crate::{coords::Coords, errors::IsdDataErr};

/// A station as stored in the archive.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq)]
pub struct StoredStation {
    pub usaf_id: String,
    pub coords: Coords,
    pub elevation: Meters,
}

/// A reading as stored in the archive.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq)]
pub struct StoredReading {
    pub station: StoredStation,
    pub valid_time: NaiveDateTime,
    pub pressure: Option<HectoPascal>,
}

impl Archive {
    /// Retrieve the stations in the order they were stored.
    pub fn stations(&self) -> Result<Vec<StoredStation>, IsdDataErr> {
        let mut stmt = self
            .db_conn
            .prepare(include_str!("query/retrieve_stations.sql"))?;

        let vals: Result<Vec<StoredStation>, IsdDataErr> = stmt
            .query_and_then(rusqlite::NO_PARAMS, Self::parse_row_to_station)?
            .map(|res| res.map_err(IsdDataErr::Database))
            .collect();

        vals
    }

    fn parse_row_to_station(row: &rusqlite::Row) -> Result<StoredStation, rusqlite::Error> {
        let usaf_id: String = row.get(0)?;
        let lat: f64 = row.get(1)?;
        let lon: f64 = row.get(2)?;
        let elevation: f64 = row.get(3)?;

        Ok(StoredStation {
            usaf_id,
            coords: Coords::from((lat, lon)),
            elevation: Meters(elevation),
        })
    }

    /// Retrieve all the readings for a station, earliest first.
    pub fn readings_for(&self, usaf_id: &str) -> Result<Vec<StoredReading>, IsdDataErr> {
        let mut stmt = self
            .db_conn
            .prepare(include_str!("query/readings_for_station.sql"))?;

        let vals: Result<Vec<StoredReading>, IsdDataErr> = stmt
            .query_and_then(&[&usaf_id], |row| -> Result<_, rusqlite::Error> {
                let station = Self::parse_row_to_station(row)?;
                let valid_time: NaiveDateTime = row.get(4)?;
                let pressure: Option<f64> = row.get(5)?;

                Ok(StoredReading {
                    station,
                    valid_time,
                    pressure: pressure.map(HectoPascal),
                })
            })?
            .map(|res| res.map_err(IsdDataErr::Database))
            .collect();

        vals
    }

    /// Total number of readings in the archive.
    pub fn reading_count(&self) -> Result<i64, IsdDataErr> {
        let count: i64 =
            self.db_conn
                .query_row("SELECT COUNT(*) FROM readings", rusqlite::NO_PARAMS, |row| {
                    row.get(0)
                })?;

        Ok(count)
    }
}
