use std::collections::HashMap;

use metfor::Quantity;

use super::Archive;

use crate::{errors::IsdDataErr, reading::Reading, station::StationIdentity};

impl Archive {
    /// Replace the stations table with `stations`.
    ///
    /// Storing the same list twice leaves the archive as it was after the first time. An empty list
    /// leaves the stored stations untouched.
    pub fn store_stations(&mut self, stations: &[StationIdentity]) -> Result<(), IsdDataErr> {
        if stations.is_empty() {
            return Ok(());
        }

        let tx = self.db_conn.transaction()?;

        tx.execute_batch(include_str!("store/recreate_stations.sql"))?;

        {
            let mut stmt = tx.prepare(include_str!("store/insert_station.sql"))?;

            for station in stations {
                let coords = station.coords();

                stmt.execute(&[
                    &station.id as &dyn rusqlite::types::ToSql,
                    &coords.lat,
                    &coords.lon,
                    &station.elevation_m().unpack(),
                ])?;
            }
        }

        tx.commit()?;

        Ok(())
    }

    /// Replace the readings table with `readings`.
    ///
    /// Missing pressures are stored as NULL, others in hectopascals. If there are no readings at
    /// all the stored readings are left untouched.
    pub fn store_readings(
        &mut self,
        readings: &HashMap<StationIdentity, Vec<Reading>>,
    ) -> Result<(), IsdDataErr> {
        if readings.values().all(Vec::is_empty) {
            return Ok(());
        }

        let tx = self.db_conn.transaction()?;

        tx.execute_batch(include_str!("store/recreate_readings.sql"))?;

        {
            let mut stmt = tx.prepare(include_str!("store/insert_reading.sql"))?;

            for reading in readings.values().flatten() {
                let coords = reading.station.coords();

                stmt.execute(&[
                    &reading.station.id as &dyn rusqlite::types::ToSql,
                    &coords.lat,
                    &coords.lon,
                    &reading.station.elevation_m().unpack(),
                    &reading.valid_time,
                    &reading.pressure_hpa().map(|p| p.unpack()),
                ])?;
            }
        }

        tx.commit()?;

        Ok(())
    }
}
