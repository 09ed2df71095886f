pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Spherical ECEF position: a point at radius R + altitude along the
/// direction given by latitude/longitude. Trades geodetic precision for
/// speed; proximity screening only needs coarse co-location detection.
pub fn ecef_km(lat_deg: f64, lng_deg: f64, alt_km: f64) -> [f64; 3] {
    let phi = lat_deg.to_radians();
    let lam = lng_deg.to_radians();
    let r = EARTH_RADIUS_KM + alt_km;
    [
        r * phi.cos() * lam.cos(),
        r * phi.cos() * lam.sin(),
        r * phi.sin(),
    ]
}

/// Euclidean distance in km between two geodetic points.
///
/// Callers that treat absent altitude as 0 will see objects on the same
/// ground track at very different real altitudes screen closer than they
/// are. Known approximation, kept on purpose.
pub fn distance_km(
    lat1: f64,
    lng1: f64,
    alt1_km: f64,
    lat2: f64,
    lng2: f64,
    alt2_km: f64,
) -> f64 {
    let a = ecef_km(lat1, lng1, alt1_km);
    let b = ecef_km(lat2, lng2, alt2_km);
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}
