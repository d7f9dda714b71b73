//! drift-runner: headless drift-simulation runner for Driftpost.
//!
//! Usage:
//!   drift-runner --seed 42 --duration 300 --interval 5 --db drift.db --assets ./assets
//!   drift-runner --seed-postcards 25 --duration 30

use anyhow::Result;
use driftpost_core::{
    assets::DEFAULT_ANCHOR_LAT_DEG,
    config::{AssetPaths, DriftConfig},
    cycle::DriftEngine,
    scheduler::{DriftScheduler, SystemClock},
    store::PostcardStore,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config = match arg_value(&args, "--config") {
        Some(path) => DriftConfig::load(path)?,
        None => DriftConfig::default(),
    };
    config.params.seed = parse_arg(&args, "--seed", config.params.seed);
    config.scheduler.duration_secs = parse_arg(&args, "--duration", config.scheduler.duration_secs);
    config.scheduler.interval_secs = parse_arg(&args, "--interval", config.scheduler.interval_secs);
    if let Some(dir) = arg_value(&args, "--assets") {
        config.assets = AssetPaths::in_dir(dir);
    }
    let demo = parse_arg(&args, "--seed-postcards", 0usize);
    let db = arg_value(&args, "--db").unwrap_or(":memory:");

    println!("Driftpost — drift-runner");
    println!("  seed:      {}", config.params.seed);
    println!("  duration:  {}s", config.scheduler.duration_secs);
    println!("  interval:  {}s", config.scheduler.interval_secs);
    println!("  db:        {db}");
    println!();

    // For :memory: use SQLite shared-memory URI so a reopened handle
    // (e.g. for post-run inspection) sees the same database.
    let db_effective: String = if db == ":memory:" {
        format!("file:driftrun_{}?mode=memory&cache=shared", unix_now())
    } else {
        db.to_string()
    };
    let store = PostcardStore::open(&db_effective)?;
    store.migrate()?;

    if demo > 0 {
        // Scatter demo postcards around the fallback anchor.
        let created_at = chrono::Utc::now().to_rfc3339();
        for i in 0..demo {
            let lat = DEFAULT_ANCHOR_LAT_DEG + 0.02 * i as f64;
            let lon = 139.65 + 0.015 * i as f64;
            let id = store.create_postcard(lat, lon, &created_at)?;
            log::info!("seeded postcard {id} at ({lat:.4}, {lon:.4})");
        }
    }

    let mut engine = DriftEngine::new(
        store,
        config.assets.clone(),
        config.params.clone(),
        config.reload_assets_each_cycle,
    )?;
    let clock = SystemClock::new();
    let mut scheduler = DriftScheduler::new(config.scheduler.clone());

    let summary = scheduler.run(&mut engine, &clock);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
