//! Command line options for loading ISD files into an archive.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{crate_version, App, Arg, ArgMatches};
use dirs::home_dir;

use crate::{errors::IsdDataErr, reading::parse_date};

/// Struct to package up command line arguments.
#[derive(Clone, Debug)]
pub struct CmdLineArgs {
    // Path to the root of the archive
    root: PathBuf,
    // The isd-history.csv file, if stations should be loaded.
    history: Option<PathBuf>,
    // Stations without data on or after this day are left out.
    cutoff: NaiveDate,
    // ISD files with the readings.
    isd_files: Vec<PathBuf>,
}

impl<'a, 'b> CmdLineArgs {
    /// Create a new set of args.
    pub fn new_app(app_name: &'static str, about: &'static str) -> App<'a, 'b> {
        App::new(app_name)
            .about(about)
            .version(crate_version!())
            .arg(
                Arg::with_name("root")
                    .short("r")
                    .long("root")
                    .takes_value(true)
                    .help("Path to the archive.")
                    .long_help("Path to the archive. Defaults to '${HOME}/isd/'"),
            )
            .arg(
                Arg::with_name("history")
                    .long("history")
                    .takes_value(true)
                    .help("Path to the isd-history.csv station list."),
            )
            .arg(
                Arg::with_name("cutoff")
                    .short("c")
                    .long("cutoff")
                    .takes_value(true)
                    .help("Only keep stations with data on or after this day, YYYYMMDD.")
                    .long_help(concat!(
                        "Only keep stations from the station history with data on or after this",
                        " day, given as YYYYMMDD. Defaults to today."
                    )),
            )
            .arg(
                Arg::with_name("isd-files")
                    .multiple(true)
                    .index(1)
                    .help("ISD files to parse, optionally gzipped."),
            )
            .after_help(concat!(
                "Stations and readings already in the archive are replaced by the ones loaded",
                " in this run."
            ))
    }

    /// Process an `App` to get the parsed values out of it and the matches object so an application
    /// can continue with further argument parsing.
    pub fn matches(app: App<'a, 'b>) -> Result<(Self, ArgMatches<'a>), IsdDataErr> {
        let matches = app.get_matches();
        let cmd_line_opts = Self::from_matches(&matches)?;

        Ok((cmd_line_opts, matches))
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self, IsdDataErr> {
        let root = match matches.value_of("root") {
            Some(root) => PathBuf::from(root),
            None => home_dir()
                .map(|hd| hd.join("isd"))
                .ok_or_else(|| IsdDataErr::GeneralError("no home directory".to_owned()))?,
        };

        let history = matches.value_of("history").map(PathBuf::from);

        let cutoff = match matches.value_of("cutoff") {
            Some(val) => parse_date(val)?,
            None => chrono::Local::now().date_naive(),
        };

        let isd_files: Vec<PathBuf> = matches
            .values_of("isd-files")
            .into_iter()
            .flat_map(|file_iter| file_iter.map(PathBuf::from))
            .collect();

        Ok(CmdLineArgs {
            root,
            history,
            cutoff,
            isd_files,
        })
    }

    /// Get the root of the archive
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the station history file, if any.
    pub fn history(&self) -> Option<&Path> {
        self.history.as_deref()
    }

    /// Get the cutoff day for stations.
    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    /// Get the ISD files.
    pub fn isd_files(&self) -> &[PathBuf] {
        &self.isd_files
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
