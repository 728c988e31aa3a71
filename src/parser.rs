//! Matching a single line of an Integrated Surface Data file.
//!
//! Each observation line starts with a fixed width mandatory section:
//!
//! | field         | width | notes                          |
//! |---------------|-------|--------------------------------|
//! | total length  | 4     | decimal                        |
//! | USAF id       | 6     | any characters                 |
//! | WBAN id       | 5     | decimal, not kept              |
//! | date          | 8     | `YYYYMMDD`                     |
//! | time          | 4     | `HHMM`                         |
//! | source flag   | 1     | ignored                        |
//! | latitude      | 6     | sign + 5 digits, 1/1000 degree |
//! | longitude     | 7     | sign + 6 digits, 1/1000 degree |
//! | report type   | 5     | ignored                        |
//! | elevation     | 5     | sign + 4 digits, meters        |
//! | (various)     | 49    | ignored                        |
//! | air pressure  | 5     | 1/10 hPa, `99999` is missing   |
//!
//! After that comes an optional additional data section starting with `ADD`. If it carries an
//! `MA1` group with a measured pressure, that value is used instead of the mandatory one.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{errors::IsdDataErr, reading::Reading};

/// Number of characters in the mandatory section.
pub const MANDATORY_WIDTH: usize = 105;

/// Pressure text for a value that was not measured.
const MISSING_PRESSURE_TEXT: &str = "99999";

lazy_static! {
    static ref MANDATORY: Regex = Regex::new(concat!(
        r"^(?P<len>[0-9]{4})",
        r"(?P<usaf_id>.{6})",
        r"(?P<wban_id>[0-9]{5})",
        r"(?P<date>[0-9]{8})",
        r"(?P<time>[0-9]{4})",
        r".",
        r"(?P<lat>[+-][0-9]{5})",
        r"(?P<lon>[+-][0-9]{6})",
        r".{5}",
        r"(?P<elev>[+-][0-9]{4})",
        r".{49}",
        r"(?P<air_pres>[0-9]{5})",
    ))
    .unwrap();
    // Only the first MA1 group after ADD is used.
    static ref ADDITIONAL: Regex = Regex::new(r"ADD.*?MA1.{6}(?P<air_pres>[0-9]{5})").unwrap();
}

/// The fields of a line that matched the mandatory section, as text.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub length: &'a str,
    pub usaf_id: &'a str,
    pub wban_id: &'a str,
    pub date: &'a str,
    pub time: &'a str,
    pub lat: &'a str,
    pub lon: &'a str,
    pub elevation: &'a str,
    pub pressure: &'a str,
}

impl<'a> RawRecord<'a> {
    /// Match the mandatory section at the start of `line`, then look for a pressure in the
    /// additional data section.
    ///
    /// Returns `None` if the line does not start with a mandatory section.
    pub fn match_line(line: &'a str) -> Option<Self> {
        let caps = MANDATORY.captures(line)?;
        // Every group in the pattern is required, so they are all present on a match.
        let group = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();

        let mut record = RawRecord {
            length: group("len"),
            usaf_id: group("usaf_id"),
            wban_id: group("wban_id"),
            date: group("date"),
            time: group("time"),
            lat: group("lat"),
            lon: group("lon"),
            elevation: group("elev"),
            pressure: group("air_pres"),
        };

        if let Some(pressure) = additional_pressure(line) {
            if pressure != MISSING_PRESSURE_TEXT {
                record.pressure = pressure;
            }
        }

        Some(record)
    }
}

/// Find the first `MA1` pressure in the additional data section of a line.
fn additional_pressure(line: &str) -> Option<&str> {
    ADDITIONAL
        .captures(line)
        .and_then(|caps| caps.name("air_pres"))
        .map(|m| m.as_str())
}

/// Parse a single line.
///
/// Lines that do not start with a mandatory section are not an error, they yield `Ok(None)`. A
/// line that matches but has a date or time that is not on the calendar is an error.
pub fn parse_line(line: &str) -> Result<Option<Reading>, IsdDataErr> {
    match RawRecord::match_line(line) {
        Some(raw) => Reading::from_raw(&raw).map(Some),
        None => Ok(None),
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
#[cfg(test)]
pub(crate) mod unit {
    use super::*;

    use crate::coords::FixedPoint;
    use chrono::NaiveDate;

    /// Build a line with the given mandatory values, followed by `tail`.
    pub(crate) fn isd_line(
        usaf_id: &str,
        date: &str,
        time: &str,
        pressure: &str,
        tail: &str,
    ) -> String {
        format!(
            "{}{}{}{}{}{}{}{}{}{}{}{}{}",
            "0105",
            usaf_id,
            "99999",
            date,
            time,
            "4",
            "+40000",
            "-075000",
            "FM-15",
            "+0010",
            "9".repeat(49),
            pressure,
            tail,
        )
    }

    #[test]
    fn test_mandatory_width() {
        let line = isd_line("123456", "20161201", "1200", "10150", "");
        assert_eq!(line.len(), MANDATORY_WIDTH);
    }

    #[test]
    fn test_synthetic_line() {
        let line = isd_line("123456", "20161201", "1200", "10150", "");
        let reading = parse_line(&line).unwrap().unwrap();

        assert_eq!(
            reading.valid_time,
            NaiveDate::from_ymd_opt(2016, 12, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
        );
        assert_eq!(reading.station.id, "123456");
        assert_eq!(reading.station.lat, FixedPoint::new(40_000, 3));
        assert_eq!(reading.station.lon, FixedPoint::new(-75_000, 3));
        assert_eq!(reading.station.elevation, FixedPoint::new(10, 0));
        assert_eq!(reading.pressure.raw(), 10_150);
    }

    #[test]
    fn test_raw_record_fields() {
        let line = isd_line("72530A", "20161201", "1251", "10150", "");
        let raw = RawRecord::match_line(&line).unwrap();

        assert_eq!(raw.length, "0105");
        assert_eq!(raw.usaf_id, "72530A");
        assert_eq!(raw.wban_id, "99999");
        assert_eq!(raw.date, "20161201");
        assert_eq!(raw.time, "1251");
        assert_eq!(raw.lat, "+40000");
        assert_eq!(raw.lon, "-075000");
        assert_eq!(raw.elevation, "+0010");
        assert_eq!(raw.pressure, "10150");
    }

    #[test]
    fn test_short_lines_yield_nothing() {
        let line = isd_line("123456", "20161201", "1200", "10150", "");

        for width in 0..MANDATORY_WIDTH {
            assert!(parse_line(&line[..width]).unwrap().is_none());
        }
    }

    #[test]
    fn test_mandatory_section_must_start_the_line() {
        let line = isd_line("123456", "20161201", "1200", "10150", "");

        assert!(parse_line(&format!(" {}", line)).unwrap().is_none());
        assert!(parse_line("").unwrap().is_none());
        assert!(parse_line("not an observation at all").unwrap().is_none());

        let bad_lat = line.replacen("+40000", "N40000", 1);
        assert!(parse_line(&bad_lat).unwrap().is_none());
    }

    #[test]
    fn test_missing_pressure_without_additional_section() {
        let line = isd_line("123456", "20161201", "1200", "99999", "");
        let reading = parse_line(&line).unwrap().unwrap();

        assert_eq!(reading.pressure.raw(), 99_999);
        assert!(reading.pressure_missing());
    }

    #[test]
    fn test_additional_pressure_replaces_missing() {
        let line = isd_line(
            "123456",
            "20161201",
            "1200",
            "99999",
            "ADDAA101000095MA1101325101325REMSYN004BUFR",
        );
        let reading = parse_line(&line).unwrap().unwrap();

        assert_eq!(reading.pressure.raw(), 10_132);
    }

    #[test]
    fn test_additional_pressure_replaces_mandatory() {
        let line = isd_line(
            "123456",
            "20161201",
            "1200",
            "10150",
            "ADDMA1101321100985",
        );
        let reading = parse_line(&line).unwrap().unwrap();

        assert_eq!(reading.pressure.raw(), 10_098);
    }

    #[test]
    fn test_missing_additional_pressure_keeps_mandatory() {
        let line = isd_line(
            "123456",
            "20161201",
            "1200",
            "10150",
            "ADDGA1081+008001999MA11013219999999",
        );
        let reading = parse_line(&line).unwrap().unwrap();

        assert_eq!(reading.pressure.raw(), 10_150);
    }

    #[test]
    fn test_first_additional_group_is_used() {
        let line = isd_line(
            "123456",
            "20161201",
            "1200",
            "99999",
            "ADDMA1101321100985MA1101321100111",
        );
        let reading = parse_line(&line).unwrap().unwrap();

        assert_eq!(reading.pressure.raw(), 10_098);
    }

    #[test]
    fn test_pressure_group_needs_add_marker() {
        let line = isd_line("123456", "20161201", "1200", "10150", "MA1101321100985");
        let reading = parse_line(&line).unwrap().unwrap();

        assert_eq!(reading.pressure.raw(), 10_150);
    }

    #[test]
    fn test_invalid_calendar_value_is_an_error() {
        let line = isd_line("123456", "20161301", "1200", "10150", "");

        match parse_line(&line) {
            Err(IsdDataErr::InvalidTimestamp(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
