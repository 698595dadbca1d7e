//! Airport record models

use serde::{Deserialize, Serialize};

/// A single airport in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportRecord {
    /// Airport name, used as the natural key for updates
    pub name: String,
    /// City served by the airport
    pub city: String,
    /// 3-letter IATA code
    pub iata: String,
    /// Public URL of the airport image (may be empty)
    #[serde(default)]
    pub image_url: String,
}

impl AirportRecord {
    pub fn new(
        name: impl Into<String>,
        city: impl Into<String>,
        iata: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            city: city.into(),
            iata: iata.into(),
            image_url: image_url.into(),
        }
    }
}

/// Airport record with runway information (served by the v2 listing)
///
/// Composes a base [`AirportRecord`]; on the wire the base fields are
/// flattened next to `runway_length`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportRecordExtended {
    #[serde(flatten)]
    pub airport: AirportRecord,
    /// Runway length in meters
    #[serde(rename = "runway_length")]
    pub runway_length_meters: i32,
}

impl AirportRecordExtended {
    pub fn new(airport: AirportRecord, runway_length_meters: i32) -> Self {
        Self {
            airport,
            runway_length_meters,
        }
    }

    pub fn name(&self) -> &str {
        &self.airport.name
    }
}
