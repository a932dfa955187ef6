//! Replay a detection recording through the tracking loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use eyeline_alignment_core::ReferenceConfig;
use eyeline_common::config::AppConfig;
use eyeline_tracking_engine::replay::{
    JsonLinesRenderer, PreloadedModels, Recording, ReplayDetector, ReplayFrameSource,
};
use eyeline_tracking_engine::{
    Collaborators, PresentationOptions, SessionConfig, TrackingSession,
};

pub async fn run(
    config: AppConfig,
    path: PathBuf,
    latency_ms: u64,
    show_overlay: bool,
    show_landmarks: bool,
) -> anyhow::Result<()> {
    let recording =
        Recording::load(&path).map_err(|e| anyhow::anyhow!("Failed to load recording: {e}"))?;
    let reference = ReferenceConfig::new(&config.reference)
        .map_err(|e| anyhow::anyhow!("Invalid reference asset: {e}"))?;

    eprintln!("Replaying: {}", path.display());
    eprintln!(
        "  Frames: {} ({}x{})",
        recording.len(),
        recording.header.frame_size.width,
        recording.header.frame_size.height
    );
    eprintln!("  Detector latency: {latency_ms}ms");
    eprintln!();

    let frames = Arc::new(ReplayFrameSource::for_recording(&recording));
    let mut detector = ReplayDetector::new(recording.detections);
    if latency_ms > 0 {
        detector = detector.with_latency(Duration::from_millis(latency_ms));
    }
    let renderer = Arc::new(JsonLinesRenderer::new(std::io::stdout()));

    let mut session_config = SessionConfig::from_app_config(&config);
    session_config.presentation = PresentationOptions {
        show_overlay,
        show_landmarks,
    };

    let collaborators = Collaborators {
        frames: frames.clone(),
        detector: Arc::new(detector),
        loader: Arc::new(PreloadedModels),
        renderer: renderer.clone(),
    };
    let mut session = TrackingSession::new(session_config, reference, collaborators);
    session.start().await?;

    tokio::select! {
        _ = wait_for_exhaustion(&frames) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            eprintln!("Interrupted");
        }
    }

    session.stop();
    let summary = session
        .join()
        .await
        .ok_or_else(|| anyhow::anyhow!("Detection loop did not report a summary"))?;

    let stats = summary.stats;
    eprintln!();
    eprintln!("Replay finished in {:.2}s", summary.duration_secs);
    eprintln!("  Frames served: {}", frames.frames_served());
    eprintln!("  Faces: {}", stats.faces);
    eprintln!("  Misses: {}", stats.misses);
    eprintln!("  Detector failures: {}", stats.detector_failures);
    eprintln!("  Skipped cycles: {}", stats.skipped);
    eprintln!("  Transforms emitted: {}", stats.transforms_emitted);
    eprintln!("  Records written: {}", renderer.records_written());

    Ok(())
}

async fn wait_for_exhaustion(frames: &ReplayFrameSource) {
    while !frames.is_exhausted() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
