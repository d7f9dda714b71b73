//! The outer control loop: run batch cycles at a nominal interval for
//! a bounded total duration, compensating sleep time for cycle cost.
//!
//! The loop never truncates a cycle in progress, so total wall-clock
//! time may exceed the budget by up to one cycle's execution time. A
//! cycle that overruns the interval clamps the following sleep to
//! zero; cycles are never skipped.

use crate::{
    config::SchedulerConfig,
    cycle::{CycleReport, DriftEngine},
    repository::PostcardRepository,
};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Time source for the scheduler. Production uses [`SystemClock`];
/// tests inject a virtual clock so no test ever actually sleeps.
pub trait Clock {
    /// Monotonic elapsed time since an arbitrary epoch.
    fn now(&self) -> Duration;
    /// Suspend the calling thread for `d`.
    fn sleep(&self, d: Duration);
    /// Wall-clock timestamp for reports, RFC 3339.
    fn timestamp(&self) -> String;
}

pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }

    fn timestamp(&self) -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Completed,
}

/// Aggregate totals for one scheduler invocation.
#[derive(Debug, Serialize)]
pub struct ScheduleSummary {
    pub total_executions:        u64,
    pub duration_seconds:        f64,
    pub total_postcards_updated: u64,
    pub failed_cycles:           u64,
    pub reports:                 Vec<CycleReport>,
}

pub struct DriftScheduler {
    config: SchedulerConfig,
    state:  SchedulerState,
}

impl DriftScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Run cycles until the duration budget is spent.
    ///
    /// Always returns a summary: cycle failures are logged and counted,
    /// never raised to the caller; even a run where every cycle failed
    /// completes normally with its best-effort aggregate.
    pub fn run<R: PostcardRepository>(
        &mut self,
        engine: &mut DriftEngine<R>,
        clock: &dyn Clock,
    ) -> ScheduleSummary {
        self.state = SchedulerState::Running;
        let interval = self.config.interval();
        let duration = self.config.duration();
        let start = clock.now();

        log::info!(
            "starting {:.0}s simulation with {:.1}s intervals",
            duration.as_secs_f64(),
            interval.as_secs_f64()
        );

        let mut reports = Vec::new();
        let mut failed_cycles = 0u64;
        let mut total_executions = 0u64;

        while clock.now() - start < duration {
            let cycle_start = clock.now();
            match engine.run_cycle(&clock.timestamp()) {
                Ok(report) => {
                    log::info!(
                        "completed execution {}, updated {}, elapsed: {:.1}s",
                        total_executions + 1,
                        report.updated_count,
                        (clock.now() - start).as_secs_f64()
                    );
                    reports.push(report);
                }
                Err(e) => {
                    log::error!("cycle {} failed: {e}", total_executions + 1);
                    failed_cycles += 1;
                }
            }
            total_executions += 1;

            // Compensate the sleep for the cycle's own cost; an
            // overrun clamps to zero rather than skipping a cycle, and
            // the final sleep is capped at the remaining budget.
            let cycle_elapsed = clock.now() - cycle_start;
            let remaining = duration.saturating_sub(clock.now() - start);
            let sleep_time = interval.saturating_sub(cycle_elapsed).min(remaining);
            if sleep_time > Duration::ZERO {
                clock.sleep(sleep_time);
            }
        }

        self.state = SchedulerState::Completed;
        let observed = clock.now() - start;
        log::info!(
            "simulation completed after {total_executions} executions in {:.1}s",
            observed.as_secs_f64()
        );

        ScheduleSummary {
            total_executions,
            duration_seconds: observed.as_secs_f64(),
            total_postcards_updated: reports.iter().map(|r| r.updated_count as u64).sum(),
            failed_cycles,
            reports,
        }
    }
}
