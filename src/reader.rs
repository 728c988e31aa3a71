//! Reading whole ISD files and batches of them.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::{debug, error, warn};

use crate::{errors::IsdDataErr, parser::parse_line, reading::Reading, station::StationIdentity};

/// A line that matched the record layout, but could not be turned into a reading.
#[derive(Debug)]
pub struct RejectedLine {
    /// Line number in the file, starting at 1.
    pub line_num: usize,
    /// Why it was rejected.
    pub error: IsdDataErr,
}

/// The result of parsing one file.
#[derive(Debug, Default)]
pub struct ParsedFile {
    /// Readings in file order.
    pub readings: Vec<Reading>,
    /// Lines that were skipped because of an error.
    pub rejected: Vec<RejectedLine>,
}

/// Parse every line of a file.
///
/// Lines that do not match the record layout are skipped silently. Lines that match but fail to
/// normalize are skipped and listed in `rejected`, the rest of the file is still processed. Bytes
/// that are not UTF-8 are replaced before matching. A read error partway through the file, e.g. a
/// truncated `gz` stream, ends the parse; it is listed in `rejected` and the readings found before
/// it are kept. Files with a `gz` extension are decompressed on the fly.
pub fn parse_file(path: &dyn AsRef<Path>) -> Result<ParsedFile, IsdDataErr> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let mut reader: Box<dyn BufRead> = if path.extension().map_or(false, |ext| ext == "gz") {
        Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut parsed = ParsedFile::default();
    let mut buf: Vec<u8> = Vec::with_capacity(512);
    let mut line_num = 0;

    loop {
        buf.clear();
        line_num += 1;

        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                parsed.rejected.push(RejectedLine {
                    line_num,
                    error: IsdDataErr::IO(err),
                });
                break;
            }
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');

        match parse_line(line) {
            Ok(Some(reading)) => parsed.readings.push(reading),
            Ok(None) => {}
            Err(error) => parsed.rejected.push(RejectedLine { line_num, error }),
        }
    }

    debug!(
        "{}: {} readings, {} rejected lines",
        path.display(),
        parsed.readings.len(),
        parsed.rejected.len()
    );

    Ok(parsed)
}

/// Parse a file and return its readings in file order.
///
/// A file that cannot be opened is logged and gives no readings. Rejected lines, including a read
/// error partway through the file, are logged and skipped.
pub fn parse_one(path: &dyn AsRef<Path>) -> Vec<Reading> {
    match parse_file(path) {
        Ok(ParsedFile { readings, rejected }) => {
            for RejectedLine { line_num, error } in rejected {
                warn!(
                    "{}:{}: skipping line: {}",
                    path.as_ref().display(),
                    line_num,
                    error
                );
            }

            readings
        }
        Err(err) => {
            error!("Cannot read file {}: {}", path.as_ref().display(), err);
            vec![]
        }
    }
}

/// Parse several files and group all the readings by station.
///
/// Readings from a station seen in more than one file are appended to the ones already found,
/// in the order the files were given.
pub fn parse_many<P: AsRef<Path>>(paths: &[P]) -> HashMap<StationIdentity, Vec<Reading>> {
    let mut result: HashMap<StationIdentity, Vec<Reading>> = HashMap::new();

    for path in paths {
        for reading in parse_one(path) {
            result
                .entry(reading.station.clone())
                .or_default()
                .push(reading);
        }
    }

    result
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
#[cfg(test)]
mod unit {
    use super::*;

    use crate::parser::unit::isd_line;
    use std::{io::Write, path::PathBuf};
    use tempdir::TempDir;

    // Write lines to a file in the temporary directory.
    fn write_file(tmp: &TempDir, name: &str, lines: &[String]) -> PathBuf {
        let path = tmp.path().join(name);
        let mut file = File::create(&path).expect("Error creating test file.");
        for line in lines {
            writeln!(file, "{}", line).expect("Error writing test file.");
        }
        path
    }

    fn mixed_lines() -> Vec<String> {
        vec![
            isd_line("725300", "20161201", "0000", "10150", ""),
            "garbage that is not a record".to_owned(),
            isd_line("725300", "20161201", "0100", "99999", "ADDMA1101321100985"),
            isd_line("725300", "20161301", "0200", "10150", ""),
            isd_line("725300", "20161201", "0300", "10170", ""),
        ]
    }

    #[test]
    fn test_parse_file() {
        let tmp = TempDir::new("isd-data-test-reader").unwrap();
        let path = write_file(&tmp, "725300-94846-2016", &mixed_lines());

        let parsed = parse_file(&path).expect("Error parsing file.");

        let pressures: Vec<i32> = parsed.readings.iter().map(|r| r.pressure.raw()).collect();
        assert_eq!(pressures, vec![10_150, 10_098, 10_170]);

        // The bad date is skipped, the rest of the file is still read.
        assert_eq!(parsed.rejected.len(), 1);
        assert_eq!(parsed.rejected[0].line_num, 4);
        match parsed.rejected[0].error {
            IsdDataErr::InvalidTimestamp(_) => {}
            ref other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_parse_one_skips_rejected_lines() {
        let tmp = TempDir::new("isd-data-test-reader").unwrap();
        let path = write_file(&tmp, "725300-94846-2016", &mixed_lines());

        let readings = parse_one(&path);
        assert_eq!(readings.len(), 3);
        assert!(readings
            .windows(2)
            .all(|pair| pair[0].valid_time < pair[1].valid_time));
    }

    #[test]
    fn test_parse_compressed_file() {
        let tmp = TempDir::new("isd-data-test-reader").unwrap();
        let path = tmp.path().join("725300-94846-2016.gz");

        let file = File::create(&path).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        for line in mixed_lines() {
            writeln!(encoder, "{}", line).unwrap();
        }
        encoder.finish().unwrap();

        assert_eq!(parse_one(&path).len(), 3);
    }

    #[test]
    fn test_undecodable_line_is_skipped() {
        let tmp = TempDir::new("isd-data-test-reader").unwrap();
        let path = tmp.path().join("725300-94846-2016");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "{}", isd_line("725300", "20161201", "0000", "10150", "")).unwrap();
        file.write_all(b"REM caf\xe9 bad byte\n").unwrap();
        writeln!(file, "{}", isd_line("725300", "20161201", "0100", "10160", "")).unwrap();
        drop(file);

        let parsed = parse_file(&path).expect("Error parsing file.");
        assert!(parsed.rejected.is_empty());

        let readings = parse_one(&path);
        let pressures: Vec<i32> = readings.iter().map(|r| r.pressure.raw()).collect();
        assert_eq!(pressures, vec![10_150, 10_160]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let tmp = TempDir::new("isd-data-test-reader").unwrap();
        let path = tmp.path().join("725300-94846-2016");

        let mut file = File::create(&path).unwrap();
        write!(file, "{}\r\n", isd_line("725300", "20161201", "0000", "10150", "")).unwrap();
        drop(file);

        assert_eq!(parse_one(&path).len(), 1);
    }

    #[test]
    fn test_truncated_compressed_file() {
        let tmp = TempDir::new("isd-data-test-reader").unwrap();
        let path = tmp.path().join("725300-94846-2016.gz");

        let total = 2_000;
        let mut encoder = flate2::write::GzEncoder::new(vec![], flate2::Compression::default());
        for minute in 0..total {
            let time = format!("{:02}{:02}", (minute / 60) % 24, minute % 60);
            writeln!(encoder, "{}", isd_line("725300", "20161201", &time, "10150", "")).unwrap();
        }
        let compressed = encoder.finish().unwrap();

        // Cut the stream off halfway, losing the gzip trailer and part of the data.
        let mut file = File::create(&path).unwrap();
        file.write_all(&compressed[..compressed.len() / 2]).unwrap();
        drop(file);

        let parsed = parse_file(&path).expect("A truncated file still parses.");
        assert!(parsed.readings.len() < total);
        match parsed.rejected.last() {
            Some(RejectedLine {
                error: IsdDataErr::IO(_),
                ..
            }) => {}
            other => panic!("unexpected rejected line: {:?}", other),
        }

        assert_eq!(parse_one(&path).len(), parsed.readings.len());
    }

    #[test]
    fn test_unreadable_path() {
        let path = PathBuf::from("unlikely_directory_in_my_project/725300-94846-2016");

        assert!(parse_file(&path).is_err());
        assert!(parse_one(&path).is_empty());
    }

    #[test]
    fn test_parse_many_reads_every_file() {
        let tmp = TempDir::new("isd-data-test-reader").unwrap();
        let first = write_file(
            &tmp,
            "725300-94846-2016",
            &[isd_line("725300", "20161201", "0000", "10150", "")],
        );
        let second = write_file(
            &tmp,
            "726810-24131-2016",
            &[
                isd_line("726810", "20161201", "0000", "10200", ""),
                isd_line("726810", "20161201", "0100", "10210", ""),
            ],
        );

        let result = parse_many(&[first, second]);

        assert_eq!(result.len(), 2);

        let mut ids: Vec<&str> = result.keys().map(|st| st.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["725300", "726810"]);

        let boise = result.iter().find(|(st, _)| st.id == "726810").unwrap().1;
        assert_eq!(boise.len(), 2);
    }

    #[test]
    fn test_parse_many_appends_same_station() {
        let tmp = TempDir::new("isd-data-test-reader").unwrap();
        let first = write_file(
            &tmp,
            "725300-94846-2015",
            &[isd_line("725300", "20151231", "2300", "10150", "")],
        );
        let second = write_file(
            &tmp,
            "725300-94846-2016",
            &[isd_line("725300", "20160101", "0000", "10160", "")],
        );
        let missing = tmp.path().join("not-there");

        let result = parse_many(&[first, missing, second]);

        assert_eq!(result.len(), 1);
        let readings = result.values().next().unwrap();
        let pressures: Vec<i32> = readings.iter().map(|r| r.pressure.raw()).collect();
        assert_eq!(pressures, vec![10_150, 10_160]);
    }

    #[test]
    fn test_parse_many_nothing() {
        let paths: Vec<PathBuf> = vec![];
        assert!(parse_many(&paths).is_empty());
    }
}
