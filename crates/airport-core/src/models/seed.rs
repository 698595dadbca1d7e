//! Built-in catalog seed data (airports in Bangladesh)

use super::airport::{AirportRecord, AirportRecordExtended};

/// Seed entries: (name, city, IATA, image URL, runway length in meters)
const SEED: &[(&str, &str, &str, &str, i32)] = &[
    (
        "Hazrat Shahjalal International Airport",
        "Dhaka",
        "DAC",
        "https://storage.googleapis.com/bd-airport-data/dac.jpg",
        3200,
    ),
    (
        "Shah Amanat International Airport",
        "Chittagong",
        "CGP",
        "https://storage.googleapis.com/bd-airport-data/cgp.jpg",
        2900,
    ),
    (
        "Osmani International Airport",
        "Sylhet",
        "ZYL",
        "https://storage.googleapis.com/bd-airport-data/zyl.jpg",
        2500,
    ),
];

/// The default catalog used when no airports are configured
pub fn default_airports() -> Vec<AirportRecordExtended> {
    SEED.iter()
        .map(|&(name, city, iata, image_url, runway)| {
            AirportRecordExtended::new(AirportRecord::new(name, city, iata, image_url), runway)
        })
        .collect()
}
