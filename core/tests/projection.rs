use driftpost_core::projection::{to_lon_lat, to_xy, EARTH_RADIUS_M};

const EPS_DEG: f64 = 1e-6;

#[test]
fn round_trip_near_anchor() {
    let lat0 = 35.6762_f64.to_radians();
    for &(lat, lon) in &[
        (35.6762, 139.6503),
        (36.2, 140.1),
        (34.9, 138.7),
        (35.0, 139.0),
    ] {
        let (x, y) = to_xy(lat, lon, lat0);
        let (lon2, lat2) = to_lon_lat(x, y, lat0);
        assert!((lat2 - lat).abs() < EPS_DEG, "lat drifted: {lat} -> {lat2}");
        assert!((lon2 - lon).abs() < EPS_DEG, "lon drifted: {lon} -> {lon2}");
    }
}

#[test]
fn planar_origin_is_the_anchor() {
    let lat0 = 35.6762_f64.to_radians();
    let (lon, lat) = to_lon_lat(0.0, 0.0, lat0);
    assert!((lat - 35.6762).abs() < EPS_DEG);
    assert!(lon.abs() < EPS_DEG);
}

#[test]
fn one_meter_north_at_the_equator() {
    // y = R * dlat, so 1 m north is 1/R radians of latitude.
    let (lon, lat) = to_lon_lat(0.0, 1.0, 0.0);
    assert!(lon.abs() < 1e-12);
    let expected = (1.0 / EARTH_RADIUS_M).to_degrees();
    assert!((lat - expected).abs() < 1e-12);
}
