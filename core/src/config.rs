//! Runtime parameters for the drift engine and its scheduler.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Integration parameters for one batch cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftParams {
    /// Micro-integration steps per postcard per cycle.
    pub sub_steps:  u32,
    /// Integration step size.
    pub dt_step:    f64,
    /// Scales sampled wind velocity into meters of drift per step.
    pub speed_gain: f64,
    /// Floor applied to the wind grid before sampling; cells slower
    /// than this get a random direction at exactly this speed.
    pub min_speed:  f64,
    /// Master seed for the run's RNG stream.
    pub seed:       u64,
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            sub_steps:  20,
            dt_step:    0.2,
            speed_gain: 30_000.0,
            min_speed:  0.02,
            seed:       42,
        }
    }
}

/// Outer-loop cadence: nominal spacing between cycle starts and the
/// total wall-clock budget of one scheduler invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub interval_secs: f64,
    pub duration_secs: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5.0,
            duration_secs: 300.0,
        }
    }
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs)
    }
}

/// Paths to the three grid bundles a cycle drifts against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetPaths {
    pub wind:     PathBuf,
    pub land:     PathBuf,
    pub passable: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            wind:     PathBuf::from("assets/wind.json"),
            land:     PathBuf::from("assets/land_mask.json"),
            passable: PathBuf::from("assets/passable_mask.json"),
        }
    }
}

impl AssetPaths {
    /// Conventional bundle names under a single directory.
    pub fn in_dir(dir: &str) -> Self {
        let dir = PathBuf::from(dir);
        Self {
            wind:     dir.join("wind.json"),
            land:     dir.join("land_mask.json"),
            passable: dir.join("passable_mask.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    pub params:    DriftParams,
    pub scheduler: SchedulerConfig,
    pub assets:    AssetPaths,
    /// Reload bundles on every cycle (the conservative default,
    /// matching the original deployment) or keep them cached for the
    /// engine's lifetime.
    pub reload_assets_each_cycle: bool,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            params:    DriftParams::default(),
            scheduler: SchedulerConfig::default(),
            assets:    AssetPaths::default(),
            reload_assets_each_cycle: true,
        }
    }
}

impl DriftConfig {
    /// Load from a JSON file. Missing fields fall back to defaults;
    /// a missing file is an error; pass no config to run on defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Ok(serde_json::from_str(&content)?)
    }
}
