//! Fare and travel time for a fixed path.

use super::config::Tariff;

/// Fare and estimated time for a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    /// Total fare (₹)
    pub fare: f64,

    /// Estimated travel time (minutes)
    pub minutes: f64,
}

/// Price a route from its station count and number of line changes.
///
/// `stations` counts both ends, so a route that stays put has 1 station
/// and a single hop has 2. Up to `base_fare_stations` stations cost the
/// base fare; each further station adds `fare_per_station`. Every line
/// change adds `fare_per_interchange`.
///
/// Time is `minutes_per_hop` for each of the `stations - 1` hops plus
/// `minutes_per_interchange` per change.
pub fn quote(tariff: &Tariff, stations: usize, interchanges: usize) -> Quote {
    let extra_stations = stations.saturating_sub(tariff.base_fare_stations);
    let hops = stations.saturating_sub(1);

    let fare = tariff.base_fare
        + tariff.fare_per_station * extra_stations as f64
        + tariff.fare_per_interchange * interchanges as f64;

    let minutes = tariff.minutes_per_hop * hops as f64
        + tariff.minutes_per_interchange * interchanges as f64;

    Quote { fare, minutes }
}
