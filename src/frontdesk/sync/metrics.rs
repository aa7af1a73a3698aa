//! # Sync Metrics
//!
//! Counters and timings for drain cycles, kept in memory for diagnostics
//! screens and log summaries.

use crate::frontdesk::sync::DrainResult;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct SyncMetrics {
    pub total_drains: u64,
    pub completed_drains: u64,
    pub faulted_drains: u64,
    /// Drains refused because another one held the lock
    pub overlapping_drains: u64,
    pub actions_synced: u64,
    pub actions_failed: u64,
    pub actions_pruned: u64,
    pub average_drain_duration: Duration,
    pub last_drain_duration: Option<Duration>,
    pub last_drain_start: Option<Instant>,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_drain_start(&mut self) {
        self.last_drain_start = Some(Instant::now());
        self.total_drains += 1;
    }

    pub fn record_drain_success(&mut self, result: &DrainResult, pruned: u64) {
        if let Some(start) = self.last_drain_start.take() {
            let duration = start.elapsed();
            self.last_drain_duration = Some(duration);
            self.completed_drains += 1;

            // Update rolling average
            let completed = self.completed_drains.min(u64::from(u32::MAX)) as u32;
            let total_duration = self.average_drain_duration * (completed - 1) + duration;
            self.average_drain_duration = total_duration / completed;
        }
        self.actions_synced += result.synced;
        self.actions_failed += result.failed;
        self.actions_pruned += pruned;
    }

    pub fn record_drain_failure(&mut self) {
        self.last_drain_start = None;
        self.faulted_drains += 1;
    }

    pub fn record_overlap(&mut self) {
        self.overlapping_drains += 1;
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_drains == 0 {
            0.0
        } else {
            self.completed_drains as f64 / self.total_drains as f64
        }
    }
}
