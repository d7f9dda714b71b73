//! One batch update cycle: fetch every traveling postcard, drift each
//! one through the wind field, persist the results, and report.
//!
//! Failure isolation rules:
//!   - A repository query failure aborts the whole cycle; the scheduler
//!     reports it and moves on to the next scheduled cycle.
//!   - A postcard with unusable stored coordinates is skipped with a
//!     warning; the rest of the batch continues.
//!   - A persistence failure for one postcard excludes it from the
//!     success report; siblings are unaffected.

use crate::{
    assets::DriftAssets,
    config::{AssetPaths, DriftParams},
    drift::DriftSimulator,
    error::{SimError, SimResult},
    repository::{PostcardRecord, PostcardRepository},
    rng::DriftRng,
    types::PostcardId,
};
use serde::Serialize;

/// Per-postcard before/after positions for one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct PostcardUpdate {
    pub postcard_id: PostcardId,
    pub old_lat:     f64,
    pub old_lon:     f64,
    pub new_lat:     f64,
    pub new_lon:     f64,
}

/// Simulation parameters echoed into every cycle report.
#[derive(Debug, Clone, Serialize)]
pub struct CycleMeta {
    pub sub_steps:  u32,
    pub dt_step:    f64,
    pub speed_gain: f64,
    pub timestamp:  String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub updated_count: usize,
    pub postcards:     Vec<PostcardUpdate>,
    pub meta:          CycleMeta,
}

/// Grid source for the engine. The original deployment reloads the
/// bundles from disk on every cycle; callers that know their assets
/// are static can load once instead.
struct AssetStore {
    /// Some(paths) means reload from here before every cycle.
    reload:  Option<AssetPaths>,
    current: DriftAssets,
}

impl AssetStore {
    fn from_files(paths: AssetPaths, reload_each_cycle: bool) -> SimResult<Self> {
        let current = DriftAssets::load(&paths)?;
        Ok(Self {
            reload: reload_each_cycle.then_some(paths),
            current,
        })
    }

    fn fixed(assets: DriftAssets) -> Self {
        Self {
            reload:  None,
            current: assets,
        }
    }

    /// Reload if configured, then apply the speed floor. The floor is
    /// idempotent, so re-applying it to cached grids costs nothing and
    /// draws nothing from the RNG.
    fn refresh(&mut self, min_speed: f64, rng: &mut DriftRng) -> SimResult<()> {
        if let Some(paths) = &self.reload {
            self.current = DriftAssets::load(paths)?;
        }
        self.current.wind.enforce_min_speed(min_speed, rng);
        Ok(())
    }
}

/// The batch drift engine: owns the repository handle, the grid
/// source, the run parameters, and the run's RNG stream.
pub struct DriftEngine<R: PostcardRepository> {
    repo:   R,
    assets: AssetStore,
    params: DriftParams,
    rng:    DriftRng,
}

impl<R: PostcardRepository> DriftEngine<R> {
    /// Engine reading its grids from bundle files.
    pub fn new(
        repo: R,
        paths: AssetPaths,
        params: DriftParams,
        reload_each_cycle: bool,
    ) -> SimResult<Self> {
        let assets = AssetStore::from_files(paths, reload_each_cycle)?;
        let rng = DriftRng::seed_from(params.seed);
        Ok(Self { repo, assets, params, rng })
    }

    /// Engine over grids the caller already built (tests, embedding).
    pub fn with_assets(repo: R, assets: DriftAssets, params: DriftParams) -> Self {
        let rng = DriftRng::seed_from(params.seed);
        Self {
            repo,
            assets: AssetStore::fixed(assets),
            params,
            rng,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn params(&self) -> &DriftParams {
        &self.params
    }

    /// Run one full update pass over all traveling postcards.
    /// `timestamp` is the cycle's wall-clock stamp, supplied by the
    /// scheduler's clock so tests can pin it.
    pub fn run_cycle(&mut self, timestamp: &str) -> SimResult<CycleReport> {
        let records = self.repo.traveling_postcards()?;
        log::info!("found {} traveling postcards", records.len());

        if records.is_empty() {
            return Ok(CycleReport {
                updated_count: 0,
                postcards:     Vec::new(),
                meta:          self.meta(timestamp),
            });
        }

        self.assets.refresh(self.params.min_speed, &mut self.rng)?;
        let assets = &self.assets.current;
        let sim = DriftSimulator::new(&assets.wind, &assets.passable, &assets.land);

        let mut updated = Vec::new();
        for record in &records {
            let (old_lat, old_lon) = match parse_position(record) {
                Ok(pos) => pos,
                Err(e) => {
                    log::warn!("{e}; skipped for this cycle");
                    continue;
                }
            };

            let (new_lat, new_lon) =
                sim.advance_geo(old_lat, old_lon, &self.params, &mut self.rng);

            if let Err(e) =
                self.repo
                    .update_position(&record.postcard_id, new_lat, new_lon, timestamp)
            {
                log::error!("failed to persist postcard {}: {e}", record.postcard_id);
                continue;
            }

            log::debug!(
                "updated postcard {}: ({old_lat:.6}, {old_lon:.6}) -> ({new_lat:.6}, {new_lon:.6})",
                record.postcard_id
            );
            updated.push(PostcardUpdate {
                postcard_id: record.postcard_id.clone(),
                old_lat,
                old_lon,
                new_lat,
                new_lon,
            });
        }

        Ok(CycleReport {
            updated_count: updated.len(),
            postcards:     updated,
            meta:          self.meta(timestamp),
        })
    }

    fn meta(&self, timestamp: &str) -> CycleMeta {
        CycleMeta {
            sub_steps:  self.params.sub_steps,
            dt_step:    self.params.dt_step,
            speed_gain: self.params.speed_gain,
            timestamp:  timestamp.to_string(),
        }
    }
}

/// Parse a record's stored coordinate text. NaN and infinities are
/// rejected too: they would poison every later projection step.
fn parse_position(record: &PostcardRecord) -> SimResult<(f64, f64)> {
    let lat = record
        .current_lat
        .as_deref()
        .and_then(|s| s.trim().parse::<f64>().ok());
    let lon = record
        .current_lon
        .as_deref()
        .and_then(|s| s.trim().parse::<f64>().ok());
    match (lat, lon) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Ok((lat, lon)),
        _ => Err(SimError::CoordinateParse {
            postcard_id: record.postcard_id.clone(),
            lat:         record.current_lat.clone(),
            lon:         record.current_lon.clone(),
        }),
    }
}
