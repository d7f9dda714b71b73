//! The wind field: a rectilinear grid of velocity samples with a
//! nearest-grid-point sampler and a minimum-speed floor.

use crate::{
    error::{SimError, SimResult},
    grid::{nearest_index, ScalarField},
    rng::DriftRng,
};

#[derive(Debug)]
pub struct WindGrid {
    x:        Vec<f64>,
    y:        Vec<f64>,
    u:        ScalarField,
    v:        ScalarField,
    lat0_rad: f64,
}

impl WindGrid {
    /// Axis lengths must match the component grids, and the components
    /// must agree with each other. Anything else is a malformed bundle
    /// and fails here, before a single postcard moves.
    pub fn new(
        x: Vec<f64>,
        y: Vec<f64>,
        u: ScalarField,
        v: ScalarField,
        lat0_rad: f64,
    ) -> SimResult<Self> {
        if v.width() != u.width() || v.height() != u.height() {
            return Err(SimError::GridShape {
                axis:     "v",
                expected: u.width() * u.height(),
                actual:   v.width() * v.height(),
            });
        }
        if x.len() != u.width() {
            return Err(SimError::GridShape {
                axis:     "x",
                expected: u.width(),
                actual:   x.len(),
            });
        }
        if y.len() != u.height() {
            return Err(SimError::GridShape {
                axis:     "y",
                expected: u.height(),
                actual:   y.len(),
            });
        }
        Ok(Self { x, y, u, v, lat0_rad })
    }

    /// Anchor latitude (radians) the projection is centered on.
    pub fn lat0_rad(&self) -> f64 {
        self.lat0_rad
    }

    /// Velocity at the grid point nearest to `(x, y)`.
    ///
    /// Nearest is taken independently per axis, with no interpolation:
    /// the returned pair is always a stored cell value. Queries outside
    /// the grid clamp to the boundary cell.
    pub fn sample(&self, x: f64, y: f64) -> (f64, f64) {
        let i = nearest_index(&self.x, x);
        let j = nearest_index(&self.y, y);
        (self.u.at(j, i), self.v.at(j, i))
    }

    /// Replace every velocity slower than `min_speed` with a
    /// `min_speed`-long vector at a random angle. Cells at or above the
    /// floor keep their direction and magnitude. Idempotent: a floored
    /// cell is exactly at the floor and is not re-randomized.
    pub fn enforce_min_speed(&mut self, min_speed: f64, rng: &mut DriftRng) {
        for j in 0..self.u.height() {
            for i in 0..self.u.width() {
                let u = self.u.at(j, i);
                let v = self.v.at(j, i);
                if (u * u + v * v).sqrt() < min_speed {
                    let theta = rng.angle();
                    self.u.set(j, i, min_speed * theta.cos());
                    self.v.set(j, i, min_speed * theta.sin());
                }
            }
        }
    }
}
