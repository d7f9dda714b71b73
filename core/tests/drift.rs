use driftpost_core::{
    config::DriftParams,
    drift::DriftSimulator,
    grid::{linspace, ScalarField},
    mask::MaskGrid,
    projection,
    rng::DriftRng,
    wind::WindGrid,
};

fn axes4() -> (Vec<f64>, Vec<f64>) {
    (linspace(0.0, 3.0, 4), linspace(0.0, 3.0, 4))
}

fn uniform_wind(u: f64, v: f64) -> WindGrid {
    let (x, y) = axes4();
    WindGrid::new(
        x,
        y,
        ScalarField::filled(4, 4, u),
        ScalarField::filled(4, 4, v),
        0.0,
    )
    .expect("wind grid")
}

fn uniform_mask(value: f64) -> MaskGrid {
    let (x, y) = axes4();
    MaskGrid::new(x, y, ScalarField::filled(4, 4, value)).expect("mask grid")
}

fn mask_from(values: [[f64; 4]; 4]) -> MaskGrid {
    let mut field = ScalarField::filled(4, 4, 0.0);
    for (j, row) in values.iter().enumerate() {
        for (i, &value) in row.iter().enumerate() {
            field.set(j, i, value);
        }
    }
    let (x, y) = axes4();
    MaskGrid::new(x, y, field).expect("mask grid")
}

fn params(sub_steps: u32, dt_step: f64, speed_gain: f64) -> DriftParams {
    DriftParams {
        sub_steps,
        dt_step,
        speed_gain,
        min_speed: 0.0,
        seed: 42,
    }
}

#[test]
fn uniform_eastward_wind_carries_five_meters() {
    let wind = uniform_wind(1.0, 0.0);
    let passable = uniform_mask(1.0);
    let land = uniform_mask(1.0);
    let sim = DriftSimulator::new(&wind, &passable, &land);
    let mut rng = DriftRng::seed_from(42);

    let (x, y) = sim.advance((0.0, 0.0), &params(5, 1.0, 1.0), &mut rng);
    assert_eq!((x, y), (5.0, 0.0));

    // Converted back through the projection at the equator anchor.
    let (lon, lat) = projection::to_lon_lat(x, y, 0.0);
    assert!(lat.abs() < 1e-12);
    let expected_lon = (5.0 / projection::EARTH_RADIUS_M).to_degrees();
    assert!((lon - expected_lon).abs() < 1e-12);
}

#[test]
fn crossing_into_impassable_territory_teleports_to_land() {
    // Only column 0 is traversable; one step carries the postcard to
    // x = 2, which is blocked.
    let wind = uniform_wind(2.0, 0.0);
    let passable = mask_from([
        [1.0, 0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
    ]);
    // The land mask has exactly one cell, so the recovery target is
    // fully determined regardless of the RNG draw.
    let land = mask_from([
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
    ]);
    let sim = DriftSimulator::new(&wind, &passable, &land);
    let mut rng = DriftRng::seed_from(42);

    let p = sim.advance((0.0, 0.0), &params(1, 1.0, 1.0), &mut rng);
    assert_eq!(p, (2.0, 2.0));
}

#[test]
fn already_impassable_position_commits_the_proposed_step() {
    // No boundary check fires when the postcard starts outside the
    // passable region — it just keeps drifting.
    let wind = uniform_wind(1.0, 0.0);
    let passable = uniform_mask(0.0);
    let land = uniform_mask(1.0);
    let sim = DriftSimulator::new(&wind, &passable, &land);
    let mut rng = DriftRng::seed_from(42);

    let p = sim.advance((0.0, 0.0), &params(3, 1.0, 1.0), &mut rng);
    assert_eq!(p, (3.0, 0.0));
}

#[test]
fn calm_wind_leaves_the_position_unchanged() {
    let wind = uniform_wind(0.0, 0.0);
    let passable = uniform_mask(1.0);
    let land = uniform_mask(1.0);
    let sim = DriftSimulator::new(&wind, &passable, &land);
    let mut rng = DriftRng::seed_from(42);

    let p = sim.advance((1.5, 2.5), &params(20, 0.2, 30_000.0), &mut rng);
    assert_eq!(p, (1.5, 2.5));
}

#[test]
fn advance_geo_round_trips_through_the_anchor_projection() {
    let wind = uniform_wind(0.0, 0.0);
    let passable = uniform_mask(1.0);
    let land = uniform_mask(1.0);
    let sim = DriftSimulator::new(&wind, &passable, &land);
    let mut rng = DriftRng::seed_from(42);

    let (lat, lon) = sim.advance_geo(0.001, 0.002, &params(10, 0.2, 1.0), &mut rng);
    assert!((lat - 0.001).abs() < 1e-9);
    assert!((lon - 0.002).abs() < 1e-9);
}
