use crate::constants::{PAD_ELEVATION, PAD_LATITUDE, PAD_LONGITUDE};

/// A point on (or above) the earth
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WorldPosition {
    /// metres above mean sea level
    pub altitude: f64,
    /// decimal degrees North
    pub latitude: f64,
    /// decimal degrees East
    pub longitude: f64,
}

impl WorldPosition {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            altitude,
            latitude,
            longitude,
        }
    }

    /// Where the ground station antenna sits, next to the pad
    pub fn ground_station() -> Self {
        Self::new(PAD_LATITUDE, PAD_LONGITUDE, PAD_ELEVATION)
    }

    /// Approximate straight line distance in metres, fine over the few
    /// kilometres a flight covers.
    pub fn approx_linear_distance(&self, other: &Self) -> f64 {
        // get approx geographic distance using ellipsoidal earth to plane projection
        // formula from https://en.wikipedia.org/wiki/Geographical_distance
        let (phi1, phi2) = (self.latitude, other.latitude);
        let (lam1, lam2) = (self.longitude, other.longitude);
        let phi_m = ((phi1 + phi2) / 2.0).to_radians();
        let del_phi = phi2 - phi1;
        let del_lam = lam2 - lam1;

        // kilometres per degree of latitude / longitude
        let k1 = 111.13209 - 0.56605 * f64::cos(phi_m * 2.0) + 0.00120 * f64::cos(phi_m * 4.0);
        let k2 = 111.41513 * f64::cos(phi_m) - 0.09455 * f64::cos(phi_m * 3.0)
            + 0.00012 * f64::cos(phi_m * 5.0);

        let geo_distance = 1000.0 * f64::sqrt((k1 * del_phi).powi(2) + (k2 * del_lam).powi(2));

        // get linear distance using euclidean distance
        let del_height = other.altitude - self.altitude;

        f64::sqrt(geo_distance.powi(2) + del_height.powi(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let gs = WorldPosition::ground_station();
        assert_eq!(gs.approx_linear_distance(&gs), 0.0);
    }

    #[test]
    fn test_distance_straight_up() {
        let gs = WorldPosition::ground_station();
        let above = WorldPosition::new(PAD_LATITUDE, PAD_LONGITUDE, PAD_ELEVATION + 1000.0);

        assert!((gs.approx_linear_distance(&above) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_one_thousandth_degree_north() {
        // ~111m per thousandth of a degree of latitude
        let gs = WorldPosition::ground_station();
        let north = WorldPosition::new(PAD_LATITUDE + 0.001, PAD_LONGITUDE, PAD_ELEVATION);
        let d = gs.approx_linear_distance(&north);

        assert!((d - 111.0).abs() < 1.0, "distance was {d}");
    }
}
