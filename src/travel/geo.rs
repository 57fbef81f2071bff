//! Great-circle distance between geocoded cities.

/// Earth radius in miles.
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Haversine distance in miles between two `(lat, lon)` points.
///
/// Straight-line over the sphere; ignores roads, which is what the
/// speed model's regime thresholds are calibrated against.
///
/// # Examples
///
/// ```
/// use weekplan::travel::great_circle_miles;
///
/// // New York to Los Angeles, roughly 2440 miles.
/// let d = great_circle_miles((40.7128, -74.0060), (34.0522, -118.2437));
/// assert!(d > 2400.0 && d < 2500.0);
/// ```
pub fn great_circle_miles(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}
