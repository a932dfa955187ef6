//! Tracking session and detection loop.
//!
//! A session owns the collaborators and drives at most one detection
//! loop at a time. Each run gets a fresh run flag and a fresh
//! [`AlignmentCalculator`], so smoothing history never leaks between runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eyeline_alignment_core::{AlignmentCalculator, ReferenceConfig};
use eyeline_common::clock::{RateController, SessionClock};
use eyeline_common::config::AppConfig;
use eyeline_common::error::{EyelineError, EyelineResult};
use eyeline_overlay_model::FrameSize;
use serde::{Deserialize, Serialize};

use crate::ports::{Collaborators, DebugOverlay, DetectorOptions, EYE_MARKER_RADIUS};
use crate::stats::{CycleOutcome, LoopStats, StatsSnapshot};

/// Configuration for a tracking session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Samples averaged per smoothing channel.
    pub smoothing_window: usize,

    /// Options passed to every detection call.
    pub detector: DetectorOptions,

    /// Display size detections are rescaled into; `None` keeps frame space.
    pub display_size: Option<FrameSize>,

    /// Initial presentation toggles.
    pub presentation: PresentationOptions,
}

impl SessionConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        let tracking = &config.tracking;
        Self {
            smoothing_window: tracking.smoothing_window,
            detector: DetectorOptions {
                input_size: tracking.detector_input_size,
                score_threshold: tracking.detector_score_threshold,
            },
            display_size: Some(tracking.display_size),
            presentation: PresentationOptions {
                show_overlay: tracking.show_overlay,
                show_landmarks: tracking.show_landmarks,
            },
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

/// Which outputs the loop forwards to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationOptions {
    pub show_overlay: bool,
    pub show_landmarks: bool,
}

impl Default for PresentationOptions {
    fn default() -> Self {
        Self {
            show_overlay: true,
            show_landmarks: true,
        }
    }
}

/// Presentation toggles readable by the loop while it runs.
#[derive(Debug)]
struct PresentationFlags {
    show_overlay: AtomicBool,
    show_landmarks: AtomicBool,
}

impl PresentationFlags {
    fn new(options: PresentationOptions) -> Self {
        Self {
            show_overlay: AtomicBool::new(options.show_overlay),
            show_landmarks: AtomicBool::new(options.show_landmarks),
        }
    }

    fn set(&self, options: PresentationOptions) {
        self.show_overlay
            .store(options.show_overlay, Ordering::Relaxed);
        self.show_landmarks
            .store(options.show_landmarks, Ordering::Relaxed);
    }

    fn get(&self) -> PresentationOptions {
        PresentationOptions {
            show_overlay: self.show_overlay.load(Ordering::Relaxed),
            show_landmarks: self.show_landmarks.load(Ordering::Relaxed),
        }
    }
}

/// State of the detection loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    /// No loop is scheduled to continue.
    Idle,
    /// The loop keeps scheduling cycles.
    Running,
}

/// Clonable handle that stops the current run from any thread.
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    /// Request the loop to stop at its next cycle boundary.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Summary returned when a detection loop ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopSummary {
    pub stats: StatsSnapshot,
    pub duration_secs: f64,
    pub cycles_per_sec: f64,
}

/// A tracking session that coordinates the detection loop.
pub struct TrackingSession {
    config: SessionConfig,
    reference: ReferenceConfig,
    collaborators: Collaborators,
    presentation: Arc<PresentationFlags>,
    running: Option<Arc<AtomicBool>>,
    stats: Arc<LoopStats>,
    loop_task: Option<tokio::task::JoinHandle<LoopSummary>>,
}

impl TrackingSession {
    /// Create an idle session.
    pub fn new(
        config: SessionConfig,
        reference: ReferenceConfig,
        collaborators: Collaborators,
    ) -> Self {
        let presentation = Arc::new(PresentationFlags::new(config.presentation));
        Self {
            config,
            reference,
            collaborators,
            presentation,
            running: None,
            stats: Arc::new(LoopStats::new()),
            loop_task: None,
        }
    }

    /// Current loop state.
    pub fn state(&self) -> LoopState {
        match &self.running {
            Some(flag) if flag.load(Ordering::SeqCst) => LoopState::Running,
            _ => LoopState::Idle,
        }
    }

    /// Load models and start the detection loop.
    ///
    /// Calling this while running is a no-op. If a previous run is still
    /// finishing its last cycle, it is awaited first so two loops never
    /// overlap.
    pub async fn start(&mut self) -> EyelineResult<()> {
        if self.state() == LoopState::Running {
            tracing::debug!("Tracking already running; start ignored");
            return Ok(());
        }

        self.join().await;

        tracing::info!(detector = %self.collaborators.detector.name(), "Loading detection models");
        if let Err(e) = self.collaborators.loader.load().await {
            tracing::error!(error = %e, "Model loading failed; tracking not started");
            return Err(match e {
                e @ EyelineError::ModelLoad { .. } => e,
                other => EyelineError::model_load(other.to_string()),
            });
        }

        let running = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(LoopStats::new());
        let detection_loop = DetectionLoop {
            running: Arc::clone(&running),
            calculator: AlignmentCalculator::new(self.reference, self.config.smoothing_window),
            collaborators: self.collaborators.clone(),
            presentation: Arc::clone(&self.presentation),
            stats: Arc::clone(&stats),
            detector_options: self.config.detector,
            display_size: self.config.display_size,
        };

        self.running = Some(running);
        self.stats = stats;
        self.loop_task = Some(tokio::spawn(detection_loop.run()));

        tracing::info!("Tracking started");
        Ok(())
    }

    /// Stop the loop. A cycle already awaiting the detector finishes,
    /// then the loop ends without scheduling another cycle.
    pub fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.store(false, Ordering::SeqCst);
            tracing::info!("Tracking stop requested");
        }
    }

    /// Wait for the most recent loop to end and return its summary.
    ///
    /// Returns `None` if no loop was started or it was already joined.
    /// Only call this after [`stop`](Self::stop) or a [`StopHandle`] was used.
    pub async fn join(&mut self) -> Option<LoopSummary> {
        let handle = self.loop_task.take()?;
        match handle.await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!(error = %e, "Detection loop task join failed");
                None
            }
        }
    }

    /// Handle for stopping the current run from outside the session owner.
    pub fn stop_handle(&self) -> Option<StopHandle> {
        self.running.as_ref().map(|running| StopHandle {
            running: Arc::clone(running),
        })
    }

    /// Change presentation toggles; takes effect from the next cycle.
    pub fn set_presentation(&self, options: PresentationOptions) {
        let previous = self.presentation();
        self.presentation.set(options);
        tracing::info!(?previous, current = ?options, "Presentation changed");
    }

    pub fn presentation(&self) -> PresentationOptions {
        self.presentation.get()
    }

    /// Counters of the current or most recent run.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.store(false, Ordering::SeqCst);
        }
    }
}

/// Clears the run flag when the loop task ends, including by panic.
struct RunGuard(Arc<AtomicBool>);

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// One run of the detection loop. Owned by the spawned task.
struct DetectionLoop {
    running: Arc<AtomicBool>,
    calculator: AlignmentCalculator,
    collaborators: Collaborators,
    presentation: Arc<PresentationFlags>,
    stats: Arc<LoopStats>,
    detector_options: DetectorOptions,
    display_size: Option<FrameSize>,
}

impl DetectionLoop {
    /// Run cycles back to back until the run flag is cleared.
    async fn run(mut self) -> LoopSummary {
        let _guard = RunGuard(Arc::clone(&self.running));
        let clock = SessionClock::start();
        let mut progress = RateController::new(Duration::from_secs(5));
        tracing::info!(epoch_wall = %clock.epoch_wall(), "Detection loop started");

        while self.running.load(Ordering::SeqCst) {
            let outcome = self.run_cycle().await;
            self.stats.record(outcome);

            if progress.should_tick(clock.elapsed_ns()) {
                let snapshot = self.stats.snapshot();
                tracing::debug!(
                    cycles = snapshot.cycles,
                    faces = snapshot.faces,
                    misses = snapshot.misses,
                    failures = snapshot.detector_failures,
                    "Tracking progress"
                );
            }

            tokio::task::yield_now().await;
        }

        let stats = self.stats.snapshot();
        let summary = LoopSummary {
            stats,
            duration_secs: clock.elapsed_secs(),
            cycles_per_sec: clock.rate_per_sec(stats.cycles),
        };
        tracing::info!(
            duration_secs = summary.duration_secs,
            cycles = stats.cycles,
            transforms = stats.transforms_emitted,
            cycles_per_sec = summary.cycles_per_sec,
            "Detection loop stopped"
        );
        summary
    }

    async fn run_cycle(&mut self) -> CycleOutcome {
        let Some(frame) = self.collaborators.frames.current_frame() else {
            return CycleOutcome::FrameUnavailable;
        };
        let renderer = &self.collaborators.renderer;
        if !renderer.is_ready() {
            return CycleOutcome::RendererUnavailable;
        }

        let detection = match self
            .collaborators
            .detector
            .detect(&frame, &self.detector_options)
            .await
        {
            Ok(Some(detection)) => detection,
            Ok(None) => return CycleOutcome::NoFace,
            Err(e) => {
                tracing::warn!(frame = frame.sequence, error = %e, "Detection failed");
                return CycleOutcome::DetectorFailed;
            }
        };

        let detection = match self.display_size {
            Some(display) => detection.resized(frame.size, display),
            None => detection,
        };

        let alignment = match self.calculator.align(&detection.landmarks) {
            Ok(alignment) => alignment,
            Err(e) => {
                tracing::debug!(frame = frame.sequence, error = %e, "Skipping alignment");
                return CycleOutcome::Degenerate;
            }
        };

        let presentation = self.presentation.get();
        let mut emitted = false;
        if presentation.show_overlay {
            match renderer.apply_transform(&alignment.transform) {
                Ok(()) => emitted = true,
                Err(e) => tracing::warn!(error = %e, "Failed to apply overlay transform"),
            }
        }
        if presentation.show_landmarks {
            let overlay = DebugOverlay {
                landmarks: detection.landmarks,
                eyes: alignment.eyes,
                marker_radius: EYE_MARKER_RADIUS,
            };
            if let Err(e) = renderer.draw_landmarks(&overlay) {
                tracing::warn!(error = %e, "Failed to draw landmarks");
            }
        }

        CycleOutcome::Aligned { emitted }
    }
}
