//! Single-postcard drift integration.
//!
//! Advances one postcard through a fixed number of sub-steps of
//! nearest-sample wind advection, with the land/sea boundary policy:
//! a step that would carry the postcard from passable into impassable
//! territory teleports it to a random cell of the land mask instead.
//!
//! Postcards never interact. The integrator holds no mutable state of
//! its own, so per-postcard runs are independent and the caller may
//! parallelize them if it ever needs to.

use crate::{config::DriftParams, mask::MaskGrid, projection, rng::DriftRng, wind::WindGrid};

pub struct DriftSimulator<'a> {
    wind:     &'a WindGrid,
    /// Collision test grid: a step from passable into impassable fires
    /// the recovery teleport.
    passable: &'a MaskGrid,
    /// Recovery sampling grid. Deliberately distinct from `passable`:
    /// drift washes ashore on known land, independent of the finer
    /// passability grid.
    land:     &'a MaskGrid,
}

impl<'a> DriftSimulator<'a> {
    pub fn new(wind: &'a WindGrid, passable: &'a MaskGrid, land: &'a MaskGrid) -> Self {
        Self { wind, passable, land }
    }

    /// Advance a planar position through `params.sub_steps` steps.
    pub fn advance(&self, p0: (f64, f64), params: &DriftParams, rng: &mut DriftRng) -> (f64, f64) {
        let (mut x, mut y) = p0;
        for _ in 0..params.sub_steps {
            let (u, v) = self.wind.sample(x, y);
            let px = x + u * params.speed_gain * params.dt_step;
            let py = y + v * params.speed_gain * params.dt_step;

            // The boundary check only fires when leaving passable
            // territory. A postcard already outside it commits the
            // proposed step unconditionally.
            if self.passable.is_passable(x, y) && !self.passable.is_passable(px, py) {
                let (rx, ry) = self.land.random_passable(rng);
                x = rx;
                y = ry;
            } else {
                x = px;
                y = py;
            }
        }
        (x, y)
    }

    /// Advance a geographic position, projecting through the wind
    /// grid's anchor latitude. Returns `(lat, lon)` in degrees.
    pub fn advance_geo(
        &self,
        lat: f64,
        lon: f64,
        params: &DriftParams,
        rng: &mut DriftRng,
    ) -> (f64, f64) {
        let lat0 = self.wind.lat0_rad();
        let p0 = projection::to_xy(lat, lon, lat0);
        let (x, y) = self.advance(p0, params, rng);
        let (new_lon, new_lat) = projection::to_lon_lat(x, y, lat0);
        (new_lat, new_lon)
    }
}
