//! Great-circle distance helpers.

/// Mean Earth radius in kilometres (for the haversine formula)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two points given in decimal degrees
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    // Rounding can push `a` just past 1 for near-antipodal points
    let a = ((delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let distance = haversine_km(28.6139, 77.2090, 28.6139, 77.2090);
        assert!(distance.abs() < 1e-9);
    }

    #[test]
    fn test_haversine_one_degree_longitude_at_equator() {
        let distance = haversine_km(0.0, 0.0, 0.0, 1.0);
        let expected = 111.19;
        assert!((distance - expected).abs() / expected < 0.01, "{}", distance);
    }

    #[test]
    fn test_haversine_delhi_to_mumbai() {
        // New Delhi to Mumbai, roughly 1150km great-circle
        let distance = haversine_km(28.6139, 77.2090, 19.0760, 72.8777);
        assert!(distance > 1100.0 && distance < 1200.0, "{}", distance);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = haversine_km(-6.2088, 106.8456, -6.9175, 107.6191);
        let b = haversine_km(-6.9175, 107.6191, -6.2088, 106.8456);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_antipodal_points() {
        let distance = haversine_km(0.0, 0.0, 0.0, 180.0);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((distance - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_near_antipodal_is_finite() {
        let distance = haversine_km(89.598, 133.221, -89.598, -46.779);
        assert!(distance.is_finite());
        assert!(distance <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        assert!(distance > 20_000.0, "{}", distance);
    }
}
