//! Per-run loop counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// What happened in one detection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The frame source had no frame yet.
    FrameUnavailable,
    /// The render target was not mounted yet.
    RendererUnavailable,
    /// The detector found no face.
    NoFace,
    /// The detector call failed.
    DetectorFailed,
    /// A face was found but its eyes collapsed to one point.
    Degenerate,
    /// A face was aligned; `emitted` is false when the overlay is hidden
    /// or the renderer rejected the transform.
    Aligned { emitted: bool },
}

/// Counters shared between the loop task and observers.
#[derive(Debug, Default)]
pub struct LoopStats {
    cycles: AtomicU64,
    faces: AtomicU64,
    misses: AtomicU64,
    detector_failures: AtomicU64,
    skipped: AtomicU64,
    transforms_emitted: AtomicU64,
}

/// Point-in-time copy of [`LoopStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub cycles: u64,
    pub faces: u64,
    pub misses: u64,
    pub detector_failures: u64,
    pub skipped: u64,
    pub transforms_emitted: u64,
}

impl LoopStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished cycle.
    pub fn record(&self, outcome: CycleOutcome) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            CycleOutcome::FrameUnavailable
            | CycleOutcome::RendererUnavailable
            | CycleOutcome::Degenerate => &self.skipped,
            CycleOutcome::NoFace => &self.misses,
            CycleOutcome::DetectorFailed => &self.detector_failures,
            CycleOutcome::Aligned { emitted } => {
                if emitted {
                    self.transforms_emitted.fetch_add(1, Ordering::Relaxed);
                }
                &self.faces
            }
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            faces: self.faces.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            detector_failures: self.detector_failures.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            transforms_emitted: self.transforms_emitted.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcomes() {
        let stats = LoopStats::new();
        stats.record(CycleOutcome::NoFace);
        stats.record(CycleOutcome::Aligned { emitted: true });
        stats.record(CycleOutcome::Aligned { emitted: false });
        stats.record(CycleOutcome::DetectorFailed);
        stats.record(CycleOutcome::FrameUnavailable);
        stats.record(CycleOutcome::Degenerate);

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                cycles: 6,
                faces: 2,
                misses: 1,
                detector_failures: 1,
                skipped: 2,
                transforms_emitted: 1,
            }
        );
    }
}
