//! Observing stations identified by their USAF id.

use crate::coords::{Coords, FixedPoint};
use metfor::Meters;

/// Description of an observing station as found in an ISD record or the station history.
///
/// Two readings from the same physical station carry independently parsed copies of this, they
/// compare equal as long as every field was encoded the same way.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StationIdentity {
    /// USAF identifier, six characters.
    pub id: String,
    /// Latitude, degrees.
    pub lat: FixedPoint,
    /// Longitude, degrees.
    pub lon: FixedPoint,
    /// Elevation, meters.
    pub elevation: FixedPoint,
}

impl StationIdentity {
    /// Location in decimal degrees.
    pub fn coords(&self) -> Coords {
        Coords::from((self.lat.to_f64(), self.lon.to_f64()))
    }

    /// Elevation scaled to meters.
    pub fn elevation_m(&self) -> Meters {
        Meters(self.elevation.to_f64())
    }
}
