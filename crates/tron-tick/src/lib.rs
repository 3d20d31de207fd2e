//! Fixed-period tick scheduler for game loops.
//!
//! A game collects player intents for one tick period, then simulates.
//! [`TickScheduler::wait_for_tick`] resolves at the end of each period and
//! is cancel-safe, so it sits in a `tokio::select!` next to the intent
//! receiver without losing its deadline:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(intent) = intents.recv() => { /* buffer it */ }
//!         info = scheduler.wait_for_tick() => {
//!             arena.update(&buffered);
//!             scheduler.record_tick_end();
//!         }
//!     }
//! }
//! ```
//!
//! Windows are hard deadlines: activity never extends them, and a window
//! that closes late is not made up for. The next one opens at the moment
//! the late one fired.

use std::time::{Duration, Instant};

use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, trace, warn};

/// Scheduler settings.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Length of one collection window.
    pub period: Duration,
    /// Fraction of `period` the simulation may use before a warning is
    /// logged. Clamped to `0.0..=1.0`.
    pub budget_warn_threshold: f64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(50),
            budget_warn_threshold: 0.8,
        }
    }
}

impl TickConfig {
    /// Shortest accepted period.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            ..Default::default()
        }
    }

    /// Raises `period` to [`Self::MIN_PERIOD`] and clamps the budget
    /// threshold. Called by [`TickScheduler::new`].
    pub fn validated(mut self) -> Self {
        if self.period < Self::MIN_PERIOD {
            warn!(
                period_us = self.period.as_micros() as u64,
                "tick period below minimum, clamping"
            );
            self.period = Self::MIN_PERIOD;
        }
        self.budget_warn_threshold = self.budget_warn_threshold.clamp(0.0, 1.0);
        self
    }
}

/// What [`TickScheduler::wait_for_tick`] reports for one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInfo {
    /// Window number, starting at 1.
    pub tick: u64,
    /// The window closed more than a tenth of a period late.
    pub overrun: bool,
    /// Whole windows lost to the delay.
    pub ticks_skipped: u64,
}

/// Counters kept across the scheduler's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickStats {
    pub overruns: u64,
    pub skipped: u64,
    /// Longest simulation step seen by `record_tick_end`.
    pub max_tick_time: Duration,
    /// Last simulation step over the period.
    pub budget_utilization: f64,
}

/// Fixed-period tick scheduler. One per running game.
pub struct TickScheduler {
    config: TickConfig,
    tick_count: u64,
    deadline: TokioInstant,
    /// Set when a window closes, taken by `record_tick_end`.
    fired_at: Option<Instant>,
    stats: TickStats,
}

impl TickScheduler {
    /// Creates a scheduler whose first window opens now.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        debug!(
            period_ms = config.period.as_secs_f64() * 1000.0,
            "tick scheduler created"
        );
        Self {
            deadline: TokioInstant::now() + config.period,
            config,
            tick_count: 0,
            fired_at: None,
            stats: TickStats::default(),
        }
    }

    pub fn with_period(period: Duration) -> Self {
        Self::new(TickConfig::with_period(period))
    }

    /// Waits until the current window closes.
    ///
    /// Cancel-safe: dropping the future before it resolves leaves the
    /// deadline untouched, so calling it again waits for the same instant.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let deadline = self.deadline;
        let period = self.config.period;

        time::sleep_until(deadline).await;

        let now = TokioInstant::now();
        self.tick_count += 1;
        self.fired_at = Some(Instant::now());
        self.deadline = now + period;

        let late_by = now.saturating_duration_since(deadline);
        let overrun = late_by > period / 10;
        let ticks_skipped = if overrun {
            (late_by.as_nanos() / period.as_nanos()) as u64
        } else {
            0
        };
        if overrun {
            self.stats.overruns += 1;
            self.stats.skipped += ticks_skipped;
            warn!(
                tick = self.tick_count,
                skipped = ticks_skipped,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "tick fired late"
            );
        }
        trace!(tick = self.tick_count, "tick fired");

        TickInfo {
            tick: self.tick_count,
            overrun,
            ticks_skipped,
        }
    }

    /// Marks the end of the simulation step for the window that just
    /// closed. A second call for the same window does nothing.
    pub fn record_tick_end(&mut self) {
        let Some(fired_at) = self.fired_at.take() else {
            return;
        };
        let elapsed = fired_at.elapsed();
        let utilization = elapsed.as_secs_f64() / self.config.period.as_secs_f64();
        self.stats.budget_utilization = utilization;
        self.stats.max_tick_time = self.stats.max_tick_time.max(elapsed);

        if utilization >= self.config.budget_warn_threshold {
            warn!(
                tick = self.tick_count,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                utilization,
                "simulation step is close to the tick period"
            );
        }
    }

    /// Windows closed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    pub fn period(&self) -> Duration {
        self.config.period
    }
}
