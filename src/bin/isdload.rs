//! Load ISD files and the station history into an archive.

use std::error::Error;

use isd_data::{history, reader, Archive, CmdLineArgs};
use log::{info, warn};

fn main() {
    env_logger::init();

    if let Err(ref e) = run() {
        println!("error: {}", e);

        let mut err: &dyn Error = e.as_ref();
        while let Some(cause) = err.source() {
            println!("caused by: {}", cause);
            err = cause;
        }

        ::std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let app = CmdLineArgs::new_app(
        "isdload",
        "Parse NOAA Integrated Surface Data and load it into an archive.",
    );
    let (args, _matches) = CmdLineArgs::matches(app)?;

    let mut arch = match Archive::connect(&args.root()) {
        Ok(arch) => arch,
        Err(_) => Archive::create(&args.root())?,
    };

    if let Some(history_file) = args.history() {
        let stations = history::load(&history_file, args.cutoff());
        info!(
            "{} stations with data since {}",
            stations.len(),
            args.cutoff()
        );
        if stations.is_empty() {
            warn!("no stations loaded, keeping the stored stations");
        }
        arch.store_stations(&stations)?;
    }

    if !args.isd_files().is_empty() {
        let readings = reader::parse_many(args.isd_files());
        info!(
            "{} readings from {} stations",
            readings.values().map(Vec::len).sum::<usize>(),
            readings.len()
        );
        if readings.is_empty() {
            warn!("no readings parsed, keeping the stored readings");
        }
        arch.store_readings(&readings)?;
    }

    println!(
        "{} stations and {} readings in {}",
        arch.stations()?.len(),
        arch.reading_count()?,
        arch.root().display()
    );

    Ok(())
}
