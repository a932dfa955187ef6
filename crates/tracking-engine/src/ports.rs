//! Interfaces to the external collaborators of the detection loop.

use std::sync::Arc;

use eyeline_alignment_core::geometry::EyeCenters;
use eyeline_common::error::EyelineResult;
use eyeline_overlay_model::{FaceDetection, FrameSize, LandmarkSet, Transform};
use serde::{Deserialize, Serialize};

/// Radius of the eye-center markers drawn in debug mode.
pub const EYE_MARKER_RADIUS: f64 = 5.0;

/// One frame handed from the frame source to the detector.
///
/// Pixel data is opaque to the loop; only the detector interprets it.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Monotonic frame counter assigned by the source.
    pub sequence: u64,

    /// Frame dimensions in pixels.
    pub size: FrameSize,

    /// Encoded or raw pixel data.
    pub data: Arc<[u8]>,
}

impl VideoFrame {
    /// A frame with no pixel payload, for sources that hand the detector
    /// a reference instead of pixels.
    pub fn empty(sequence: u64, size: FrameSize) -> Self {
        Self {
            sequence,
            size,
            data: Arc::from(Vec::<u8>::new()),
        }
    }
}

/// Options passed to every detection call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorOptions {
    /// Square size the detector resizes frames to.
    pub input_size: u32,

    /// Minimum face confidence.
    pub score_threshold: f64,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            input_size: 416,
            score_threshold: 0.5,
        }
    }
}

/// Data for the optional debug drawing of a detection.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugOverlay {
    pub landmarks: LandmarkSet,
    pub eyes: EyeCenters,
    pub marker_radius: f64,
}

/// Source of the current camera frame.
pub trait FrameSource: Send + Sync {
    /// The current frame, or `None` while the source is not ready.
    fn current_frame(&self) -> Option<VideoFrame>;
}

/// Single-face detector with landmarks.
#[async_trait::async_trait]
pub trait Detector: Send + Sync {
    /// Detect at most one face. `Ok(None)` means no face was found.
    async fn detect(
        &self,
        frame: &VideoFrame,
        options: &DetectorOptions,
    ) -> EyelineResult<Option<FaceDetection>>;

    /// Detector name for logging.
    fn name(&self) -> &str;
}

/// Loads detector weights before the first cycle.
#[async_trait::async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> EyelineResult<()>;
}

/// Presentation layer that places the overlay and draws debug output.
pub trait Renderer: Send + Sync {
    /// Whether the render target exists yet.
    fn is_ready(&self) -> bool {
        true
    }

    /// Place the overlay.
    fn apply_transform(&self, transform: &Transform) -> EyelineResult<()>;

    /// Draw landmarks and eye centers for debugging.
    fn draw_landmarks(&self, overlay: &DebugOverlay) -> EyelineResult<()>;
}

/// The set of collaborators a session drives.
#[derive(Clone)]
pub struct Collaborators {
    pub frames: Arc<dyn FrameSource>,
    pub detector: Arc<dyn Detector>,
    pub loader: Arc<dyn ModelLoader>,
    pub renderer: Arc<dyn Renderer>,
}
