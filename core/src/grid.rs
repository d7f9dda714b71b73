//! Rectilinear grid primitives shared by the wind field and the
//! passability masks.

use crate::error::{SimError, SimResult};

/// A dense H×W scalar field, row-major.
#[derive(Debug, Clone)]
pub struct ScalarField {
    width:  usize,
    height: usize,
    values: Vec<f64>,
}

impl ScalarField {
    /// Fails fast when `values` does not hold exactly `width × height`
    /// cells: shape errors must surface at load time, never
    /// mid-simulation.
    pub fn new(width: usize, height: usize, values: Vec<f64>) -> SimResult<Self> {
        if values.len() != width * height {
            return Err(SimError::GridShape {
                axis:     "cells",
                expected: width * height,
                actual:   values.len(),
            });
        }
        Ok(Self { width, height, values })
    }

    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self {
            width,
            height,
            values: vec![value; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.width + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.width + col] = value;
    }
}

/// Index of the axis entry nearest to `value` by absolute difference.
///
/// The whole axis is scanned; axes are short and need not be uniformly
/// spaced. Values outside the axis range resolve to a boundary index,
/// so callers get silent clamping rather than an out-of-bounds error.
pub fn nearest_index(axis: &[f64], value: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, a) in axis.iter().enumerate() {
        let d = (a - value).abs();
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

/// `count` evenly spaced values from `start` to `end` inclusive.
/// Used to derive grid axes from a bounding box.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count <= 1 {
        return vec![start];
    }
    let step = (end - start) / (count - 1) as f64;
    (0..count).map(|i| start + step * i as f64).collect()
}
