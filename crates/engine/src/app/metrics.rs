//! Per-window rates for the overlay and the `loop_metrics` log line. Frame
//! timing comes from the loop; tick, event and visibility counts are diffed
//! from [`EngineCounters`] samples so they reflect what the engine did.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::grid_engine::EngineCounters;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    /// Simulation steps discarded because a frame fell too far behind.
    pub dropped_ticks: u32,
    pub events_applied: u64,
    pub events_dropped: u64,
    pub visibility_passes: u64,
}

/// Shared read side of the loop metrics. Clones see the same latest window.
#[derive(Clone, Debug, Default)]
pub struct MetricsHandle {
    latest: Arc<RwLock<LoopMetricsSnapshot>>,
    poison_reported: Arc<AtomicBool>,
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        let guard = self.latest.read().unwrap_or_else(|poisoned| {
            self.report_poison("read");
            PoisonError::into_inner(poisoned)
        });
        *guard
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        let mut guard = self.latest.write().unwrap_or_else(|poisoned| {
            self.report_poison("write");
            PoisonError::into_inner(poisoned)
        });
        *guard = snapshot;
    }

    fn report_poison(&self, operation: &'static str) {
        if !self.poison_reported.swap(true, Ordering::Relaxed) {
            warn!(operation, "loop_metrics_lock_poisoned");
        }
    }
}

/// One open metrics window. Closing it yields a snapshot and opens the next
/// window from the same sample.
#[derive(Debug)]
pub(crate) struct MetricsWindow {
    opened_at: Instant,
    length: Duration,
    baseline: EngineCounters,
    frames: u32,
    frame_time_total: Duration,
    dropped_ticks: u32,
}

impl MetricsWindow {
    pub(crate) fn open(length: Duration, now: Instant, baseline: EngineCounters) -> Self {
        Self {
            opened_at: now,
            length,
            baseline,
            frames: 0,
            frame_time_total: Duration::ZERO,
            dropped_ticks: 0,
        }
    }

    pub(crate) fn record_frame(&mut self, frame_dt: Duration, dropped_ticks: u32) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_total = self.frame_time_total.saturating_add(frame_dt);
        self.dropped_ticks = self.dropped_ticks.saturating_add(dropped_ticks);
    }

    pub(crate) fn close_if_due(
        &mut self,
        now: Instant,
        counters: EngineCounters,
    ) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.opened_at);
        if elapsed < self.length {
            return None;
        }

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let delta = counters.since(self.baseline);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            self.frame_time_total.as_secs_f32() * 1000.0 / self.frames as f32
        };
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: delta.ticks as f32 / seconds,
            frame_time_ms,
            dropped_ticks: self.dropped_ticks,
            events_applied: delta.events_applied,
            events_dropped: delta.events_dropped,
            visibility_passes: delta.visibility_passes,
        };

        *self = Self::open(self.length, now, counters);
        Some(snapshot)
    }
}
