//! Typed readings built from the matched fields of a record.

use chrono::{NaiveDate, NaiveDateTime};
use metfor::HectoPascal;

use crate::{
    coords::FixedPoint, errors::IsdDataErr, parser::RawRecord, station::StationIdentity,
};

/// Raw value used by ISD for a pressure that was not measured.
pub const MISSING_PRESSURE: i32 = 99_999;

/// One observation from an ISD file.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    /// The station as described by the record itself.
    pub station: StationIdentity,
    /// Observation time, minute precision.
    pub valid_time: NaiveDateTime,
    /// Sea level pressure in tenths of a hectopascal, may be the missing value.
    pub pressure: FixedPoint,
}

impl Reading {
    /// Normalize the fields of a matched record.
    ///
    /// The WBAN identifier is not carried over.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, IsdDataErr> {
        let valid_time = parse_timestamp(raw.date, raw.time)?;

        let station = StationIdentity {
            id: raw.usaf_id.to_owned(),
            lat: FixedPoint::parse_implied(raw.lat, 3)?,
            lon: FixedPoint::parse_implied(raw.lon, 3)?,
            elevation: FixedPoint::parse_implied(raw.elevation, 0)?,
        };

        let pressure = FixedPoint::parse_implied(raw.pressure, 1)?;

        Ok(Reading {
            station,
            valid_time,
            pressure,
        })
    }

    /// Return true if the pressure is the missing value.
    pub fn pressure_missing(&self) -> bool {
        self.pressure.raw() == MISSING_PRESSURE
    }

    /// Pressure scaled to hectopascals, `None` if it was not measured.
    pub fn pressure_hpa(&self) -> Option<HectoPascal> {
        if self.pressure_missing() {
            None
        } else {
            Some(HectoPascal(self.pressure.to_f64()))
        }
    }
}

/// Parse a `YYYYMMDD` date.
pub fn parse_date(date: &str) -> Result<NaiveDate, IsdDataErr> {
    let bad_date = || IsdDataErr::InvalidTimestamp(date.to_owned());

    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad_date());
    }

    let year: i32 = date[0..4].parse().map_err(|_| bad_date())?;
    let month: u32 = date[4..6].parse().map_err(|_| bad_date())?;
    let day: u32 = date[6..8].parse().map_err(|_| bad_date())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad_date)
}

/// Parse a `YYYYMMDD` date and `HHMM` time into a timestamp.
pub fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, IsdDataErr> {
    let bad_time = || IsdDataErr::InvalidTimestamp(format!("{}{}", date, time));

    let date = parse_date(date).map_err(|_| bad_time())?;

    if time.len() != 4 || !time.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad_time());
    }

    let hour: u32 = time[0..2].parse().map_err(|_| bad_time())?;
    let minute: u32 = time[2..4].parse().map_err(|_| bad_time())?;

    date.and_hms_opt(hour, minute, 0).ok_or_else(bad_time)
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
