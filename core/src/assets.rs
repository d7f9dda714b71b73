//! Grid asset bundles.
//!
//! Bundles are JSON files produced offline by the map pipeline: a wind
//! bundle carrying either a combined H×W×2 velocity tensor (`w`) or
//! separate `u`/`v` arrays, plus a bounding box and an anchor latitude;
//! and mask bundles carrying an H×W numeric mask with a bounding box.
//! Axes are derived from the bounding box by linear spacing across the
//! grid's row and column counts.
//!
//! RULE: Loading is resilient. A missing file, a malformed document, or
//! an absent key substitutes a documented default instead of failing,
//! and every substitution is reported back to the caller as an
//! [`AssetDefault`] flag so callers and tests can see exactly which
//! fallbacks were taken.

use crate::{
    config::AssetPaths,
    error::SimResult,
    grid::{linspace, ScalarField},
    mask::MaskGrid,
    wind::WindGrid,
};
use serde::Deserialize;
use std::path::Path;

/// Grid dimension used when a bundle carries no usable arrays.
pub const DEFAULT_GRID_DIM: usize = 128;

/// Bounding box used when a bundle carries none: [min_x, min_y, max_x, max_y].
pub const DEFAULT_BBOX: [f64; 4] = [0.0, 0.0, 1_000_000.0, 1_000_000.0];

/// Fallback anchor latitude (Tokyo area), degrees.
pub const DEFAULT_ANCHOR_LAT_DEG: f64 = 35.6762;

/// Which piece of a bundle was substituted with its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetDefault {
    /// The file itself was unreadable or unparsable.
    File,
    /// No usable velocity arrays; zero-filled grid substituted.
    Velocity,
    /// No usable mask array; all-passable grid substituted.
    Mask,
    /// No bounding box; [`DEFAULT_BBOX`] substituted.
    BoundingBox,
    /// No anchor latitude; [`DEFAULT_ANCHOR_LAT_DEG`] substituted.
    Anchor,
}

#[derive(Debug, Default, Deserialize)]
struct WindBundleFile {
    /// Combined velocity tensor, H×W×2 (u then v per cell).
    #[serde(default)]
    w: Option<Vec<Vec<[f64; 2]>>>,
    #[serde(default)]
    u: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    v: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    bbox: Option<[f64; 4]>,
    #[serde(default)]
    lat0_rad: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct MaskBundleFile {
    #[serde(default)]
    mask: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    bbox: Option<[f64; 4]>,
}

pub struct LoadedWind {
    pub grid:      WindGrid,
    pub defaulted: Vec<AssetDefault>,
}

pub struct LoadedMask {
    pub grid:      MaskGrid,
    pub defaulted: Vec<AssetDefault>,
}

/// The three grids a cycle drifts against. Immutable for the cycle's
/// lifetime; the engine applies the speed floor after every (re)load.
pub struct DriftAssets {
    pub wind:     WindGrid,
    pub passable: MaskGrid,
    pub land:     MaskGrid,
}

impl DriftAssets {
    /// Assemble all three bundles. Default substitutions are logged by
    /// the individual loaders.
    pub fn load(paths: &AssetPaths) -> SimResult<Self> {
        let wind = load_wind_bundle(&paths.wind)?.grid;
        let land = load_mask_bundle(&paths.land)?.grid;
        let passable = load_mask_bundle(&paths.passable)?.grid;
        Ok(Self { wind, passable, land })
    }
}

/// Load a wind bundle, substituting defaults for anything missing.
pub fn load_wind_bundle(path: &Path) -> SimResult<LoadedWind> {
    let mut defaulted = Vec::new();
    let file = read_bundle::<WindBundleFile>(path, &mut defaulted);

    let (u_rows, v_rows) = match (file.w, file.u, file.v) {
        (Some(w), _, _) => split_tensor(w),
        (None, Some(u), Some(v)) => (Some(u), Some(v)),
        _ => (None, None),
    };
    let (u, v) = match (u_rows.and_then(field_from_rows), v_rows.and_then(field_from_rows)) {
        (Some(u), Some(v)) if u.width() == v.width() && u.height() == v.height() => (u, v),
        _ => {
            defaulted.push(AssetDefault::Velocity);
            (
                ScalarField::filled(DEFAULT_GRID_DIM, DEFAULT_GRID_DIM, 0.0),
                ScalarField::filled(DEFAULT_GRID_DIM, DEFAULT_GRID_DIM, 0.0),
            )
        }
    };

    let bbox = file.bbox.unwrap_or_else(|| {
        defaulted.push(AssetDefault::BoundingBox);
        DEFAULT_BBOX
    });
    let lat0_rad = file.lat0_rad.unwrap_or_else(|| {
        defaulted.push(AssetDefault::Anchor);
        DEFAULT_ANCHOR_LAT_DEG.to_radians()
    });

    let x = linspace(bbox[0], bbox[2], u.width());
    let y = linspace(bbox[1], bbox[3], u.height());
    let grid = WindGrid::new(x, y, u, v, lat0_rad)?;

    if !defaulted.is_empty() {
        log::warn!("wind bundle {}: substituted defaults {:?}", path.display(), defaulted);
    }
    Ok(LoadedWind { grid, defaulted })
}

/// Load a mask bundle (land or passability), substituting defaults.
pub fn load_mask_bundle(path: &Path) -> SimResult<LoadedMask> {
    let mut defaulted = Vec::new();
    let file = read_bundle::<MaskBundleFile>(path, &mut defaulted);

    let mask = match file.mask.and_then(field_from_rows) {
        Some(mask) => mask,
        None => {
            defaulted.push(AssetDefault::Mask);
            ScalarField::filled(DEFAULT_GRID_DIM, DEFAULT_GRID_DIM, 1.0)
        }
    };

    let bbox = file.bbox.unwrap_or_else(|| {
        defaulted.push(AssetDefault::BoundingBox);
        DEFAULT_BBOX
    });

    let x = linspace(bbox[0], bbox[2], mask.width());
    let y = linspace(bbox[1], bbox[3], mask.height());
    let grid = MaskGrid::new(x, y, mask)?;

    if !defaulted.is_empty() {
        log::warn!("mask bundle {}: substituted defaults {:?}", path.display(), defaulted);
    }
    Ok(LoadedMask { grid, defaulted })
}

fn read_bundle<T: Default + for<'de> Deserialize<'de>>(
    path: &Path,
    defaulted: &mut Vec<AssetDefault>,
) -> T {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str::<T>(&content).map_err(|e| e.to_string()));
    match parsed {
        Ok(file) => file,
        Err(e) => {
            log::warn!("cannot load bundle {}: {e}; using defaults", path.display());
            defaulted.push(AssetDefault::File);
            T::default()
        }
    }
}

/// Split a combined H×W×2 tensor into u and v row sets.
fn split_tensor(w: Vec<Vec<[f64; 2]>>) -> (Option<Vec<Vec<f64>>>, Option<Vec<Vec<f64>>>) {
    let u = w
        .iter()
        .map(|row| row.iter().map(|cell| cell[0]).collect())
        .collect();
    let v = w
        .into_iter()
        .map(|row| row.into_iter().map(|cell| cell[1]).collect())
        .collect();
    (Some(u), Some(v))
}

/// Build a scalar field from nested rows. Returns None for an empty or
/// ragged array; the caller substitutes the documented default.
fn field_from_rows(rows: Vec<Vec<f64>>) -> Option<ScalarField> {
    let height = rows.len();
    let width = rows.first()?.len();
    if width == 0 || rows.iter().any(|row| row.len() != width) {
        return None;
    }
    let values: Vec<f64> = rows.into_iter().flatten().collect();
    ScalarField::new(width, height, values).ok()
}
