//! Tariff configuration for fares and travel time.

/// Fare and time constants.
///
/// Routes are ranked before any of these are applied, so changing the
/// tariff changes what a route costs but never which route is chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct Tariff {
    /// Flat fare covering the first `base_fare_stations` stations (₹).
    pub base_fare: f64,

    /// Number of stations, counting both ends, covered by the base fare.
    pub base_fare_stations: usize,

    /// Fare for each station beyond the base allowance (₹).
    pub fare_per_station: f64,

    /// Surcharge for each line change (₹).
    pub fare_per_interchange: f64,

    /// Travel time per hop between adjacent stations (minutes).
    pub minutes_per_hop: f64,

    /// Extra time for each line change (minutes).
    pub minutes_per_interchange: f64,
}

impl Tariff {
    /// Create a tariff with the given parameters.
    pub fn new(
        base_fare: f64,
        base_fare_stations: usize,
        fare_per_station: f64,
        fare_per_interchange: f64,
        minutes_per_hop: f64,
        minutes_per_interchange: f64,
    ) -> Self {
        Self {
            base_fare,
            base_fare_stations,
            fare_per_station,
            fare_per_interchange,
            minutes_per_hop,
            minutes_per_interchange,
        }
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            base_fare: 10.0,
            base_fare_stations: 2,
            fare_per_station: 5.0,
            fare_per_interchange: 2.0,
            minutes_per_hop: 2.5,
            minutes_per_interchange: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tariff() {
        let tariff = Tariff::default();

        assert_eq!(tariff.base_fare, 10.0);
        assert_eq!(tariff.base_fare_stations, 2);
        assert_eq!(tariff.fare_per_station, 5.0);
        assert_eq!(tariff.fare_per_interchange, 2.0);
        assert_eq!(tariff.minutes_per_hop, 2.5);
        assert_eq!(tariff.minutes_per_interchange, 5.0);
    }

    #[test]
    fn custom_tariff() {
        let tariff = Tariff::new(20.0, 3, 4.0, 1.0, 2.0, 6.0);

        assert_eq!(tariff.base_fare, 20.0);
        assert_eq!(tariff.base_fare_stations, 3);
        assert_eq!(tariff.fare_per_station, 4.0);
        assert_eq!(tariff.fare_per_interchange, 1.0);
        assert_eq!(tariff.minutes_per_hop, 2.0);
        assert_eq!(tariff.minutes_per_interchange, 6.0);
    }
}
