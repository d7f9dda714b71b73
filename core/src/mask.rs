//! Land and passability masks: classify planar positions as passable
//! or impassable, and supply random recovery positions.

use crate::{
    error::{SimError, SimResult},
    grid::{nearest_index, ScalarField},
    rng::DriftRng,
};

pub struct MaskGrid {
    x:    Vec<f64>,
    y:    Vec<f64>,
    mask: ScalarField,
}

impl MaskGrid {
    pub fn new(x: Vec<f64>, y: Vec<f64>, mask: ScalarField) -> SimResult<Self> {
        if x.len() != mask.width() {
            return Err(SimError::GridShape {
                axis:     "x",
                expected: mask.width(),
                actual:   x.len(),
            });
        }
        if y.len() != mask.height() {
            return Err(SimError::GridShape {
                axis:     "y",
                expected: mask.height(),
                actual:   y.len(),
            });
        }
        Ok(Self { x, y, mask })
    }

    /// Whether the cell nearest to `(x, y)` is passable. Same
    /// nearest-index strategy as the wind sampler; a cell counts as
    /// passable when its stored value is greater than zero.
    pub fn is_passable(&self, x: f64, y: f64) -> bool {
        let i = nearest_index(&self.x, x);
        let j = nearest_index(&self.y, y);
        self.mask.at(j, i) > 0.0
    }

    /// Coordinate of a uniformly chosen passable cell.
    ///
    /// Falls back to the coordinate-system origin when the mask has no
    /// passable cell at all; recovery must never fail a cycle.
    pub fn random_passable(&self, rng: &mut DriftRng) -> (f64, f64) {
        let mut passable = Vec::new();
        for j in 0..self.mask.height() {
            for i in 0..self.mask.width() {
                if self.mask.at(j, i) > 0.0 {
                    passable.push((j, i));
                }
            }
        }
        if passable.is_empty() {
            return (0.0, 0.0);
        }
        let k = rng.next_u64_below(passable.len() as u64) as usize;
        let (j, i) = passable[k];
        (self.x[i], self.y[j])
    }
}
