//! Conversion between geographic degrees and a local tangent-plane
//! metric coordinate system anchored at a reference latitude.
//!
//! This is a small-area equirectangular approximation: meridians are
//! treated as parallel at the anchor's spacing. Accuracy degrades with
//! distance from `lat0`; a known limitation of the drift model, not
//! something this module corrects.

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Planar meters → (lon_deg, lat_deg).
pub fn to_lon_lat(x: f64, y: f64, lat0_rad: f64) -> (f64, f64) {
    let lat_rad = y / EARTH_RADIUS_M + lat0_rad;
    let lon_rad = x / (EARTH_RADIUS_M * lat0_rad.cos());
    (lon_rad.to_degrees(), lat_rad.to_degrees())
}

/// (lat_deg, lon_deg) → planar meters. Exact inverse of [`to_lon_lat`].
pub fn to_xy(lat_deg: f64, lon_deg: f64, lat0_rad: f64) -> (f64, f64) {
    let lat_rad = lat_deg.to_radians();
    let lon_rad = lon_deg.to_radians();
    let y = EARTH_RADIUS_M * (lat_rad - lat0_rad);
    let x = EARTH_RADIUS_M * lat0_rad.cos() * lon_rad;
    (x, y)
}
