//! Replay adapters that drive the loop from a recorded detection stream.
//!
//! A recording is JSONL: an optional `# {header}` first line, then one
//! line per frame holding either a [`FaceDetection`] or `null`.

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use eyeline_alignment_core::geometry::EyeCenters;
use eyeline_common::error::{EyelineError, EyelineResult};
use eyeline_overlay_model::{
    parse_detections, serialize_detections, FaceDetection, FrameSize, Point, Transform,
};
use serde::{Deserialize, Serialize};

use crate::ports::{
    DebugOverlay, Detector, DetectorOptions, FrameSource, ModelLoader, Renderer, VideoFrame,
};

/// Metadata line at the top of a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingHeader {
    pub schema_version: String,

    /// Size of the frames the detections were produced on.
    pub frame_size: FrameSize,
}

impl Default for RecordingHeader {
    fn default() -> Self {
        Self {
            schema_version: "1.0".to_string(),
            frame_size: FrameSize::new(480, 360),
        }
    }
}

/// A recorded sequence of per-frame detections.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    pub header: RecordingHeader,
    pub detections: Vec<Option<FaceDetection>>,
}

impl Recording {
    /// Load a recording from disk.
    pub fn load(path: impl AsRef<Path>) -> EyelineResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EyelineError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Parse recording content. A missing header falls back to defaults.
    pub fn parse(content: &str) -> EyelineResult<Self> {
        let header = content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .and_then(|line| line.strip_prefix('#'))
            .and_then(|json| serde_json::from_str::<RecordingHeader>(json.trim()).ok())
            .unwrap_or_default();
        let detections = parse_detections(content)?;
        Ok(Self { header, detections })
    }

    /// Serialize with a header line.
    pub fn to_jsonl(&self) -> EyelineResult<String> {
        let mut output = format!("# {}\n", serde_json::to_string(&self.header)?);
        output.push_str(&serialize_detections(&self.detections)?);
        Ok(output)
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

/// Hands out one placeholder frame per recorded detection, then reports
/// not-ready.
#[derive(Debug)]
pub struct ReplayFrameSource {
    size: FrameSize,
    total: u64,
    next: AtomicU64,
}

impl ReplayFrameSource {
    pub fn new(size: FrameSize, total: u64) -> Self {
        Self {
            size,
            total,
            next: AtomicU64::new(0),
        }
    }

    pub fn for_recording(recording: &Recording) -> Self {
        Self::new(recording.header.frame_size, recording.len() as u64)
    }

    /// True once every frame has been handed out.
    pub fn is_exhausted(&self) -> bool {
        self.next.load(Ordering::SeqCst) >= self.total
    }

    pub fn frames_served(&self) -> u64 {
        self.next.load(Ordering::SeqCst).min(self.total)
    }
}

impl FrameSource for ReplayFrameSource {
    fn current_frame(&self) -> Option<VideoFrame> {
        let sequence = self
            .next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.total).then_some(n + 1)
            })
            .ok()?;
        Some(VideoFrame::empty(sequence, self.size))
    }
}

/// Returns the recorded detection for each frame sequence number.
#[derive(Debug)]
pub struct ReplayDetector {
    detections: Vec<Option<FaceDetection>>,
    latency: Option<Duration>,
    calls: AtomicU64,
}

impl ReplayDetector {
    pub fn new(detections: Vec<Option<FaceDetection>>) -> Self {
        Self {
            detections,
            latency: None,
            calls: AtomicU64::new(0),
        }
    }

    /// Simulate inference time on every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Detector for ReplayDetector {
    async fn detect(
        &self,
        frame: &VideoFrame,
        options: &DetectorOptions,
    ) -> EyelineResult<Option<FaceDetection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let detection = self
            .detections
            .get(frame.sequence as usize)
            .ok_or_else(|| {
                EyelineError::detection(format!("no recorded detection for frame {}", frame.sequence))
            })?
            .clone();
        Ok(detection.filter(|d| d.score >= options.score_threshold))
    }

    fn name(&self) -> &str {
        "replay"
    }
}

/// Model loader for collaborators that need no weights.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreloadedModels;

#[async_trait::async_trait]
impl ModelLoader for PreloadedModels {
    async fn load(&self) -> EyelineResult<()> {
        Ok(())
    }
}

/// One line written by [`JsonLinesRenderer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderRecord {
    Transform {
        #[serde(flatten)]
        transform: Transform,
    },
    Eyes {
        #[serde(flatten)]
        eyes: EyeCenters,
        marker_radius: f64,
        landmarks: Vec<Point>,
    },
}

/// Renderer that writes every emitted output as a JSON line.
pub struct JsonLinesRenderer<W: Write + Send> {
    writer: Mutex<W>,
    records: AtomicU64,
}

impl<W: Write + Send> JsonLinesRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            records: AtomicU64::new(0),
        }
    }

    /// Number of lines written so far.
    pub fn records_written(&self) -> u64 {
        self.records.load(Ordering::SeqCst)
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> EyelineResult<W> {
        let mut writer = self
            .writer
            .into_inner()
            .map_err(|_| EyelineError::render("renderer writer lock poisoned"))?;
        writer.flush()?;
        Ok(writer)
    }

    fn write_record(&self, record: &RenderRecord) -> EyelineResult<()> {
        let json = serde_json::to_string(record)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| EyelineError::render("renderer writer lock poisoned"))?;
        writeln!(writer, "{json}")
            .map_err(|e| EyelineError::render(format!("Failed to write record: {e}")))?;
        self.records.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl<W: Write + Send> Renderer for JsonLinesRenderer<W> {
    fn apply_transform(&self, transform: &Transform) -> EyelineResult<()> {
        self.write_record(&RenderRecord::Transform {
            transform: *transform,
        })
    }

    fn draw_landmarks(&self, overlay: &DebugOverlay) -> EyelineResult<()> {
        self.write_record(&RenderRecord::Eyes {
            eyes: overlay.eyes,
            marker_radius: overlay.marker_radius,
            landmarks: overlay.landmarks.points().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyeline_overlay_model::{BoundingBox, LandmarkSet, Point, LANDMARK_COUNT};

    fn detection(score: f64) -> FaceDetection {
        FaceDetection {
            bounding_box: BoundingBox {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
            },
            score,
            landmarks: LandmarkSet::new(vec![Point::ORIGIN; LANDMARK_COUNT]).unwrap(),
        }
    }

    #[test]
    fn test_parse_header_and_detections() {
        let recording = Recording {
            header: RecordingHeader {
                schema_version: "1.0".into(),
                frame_size: FrameSize::new(640, 480),
            },
            detections: vec![None, Some(detection(0.9))],
        };
        let parsed = Recording::parse(&recording.to_jsonl().unwrap()).unwrap();
        assert_eq!(parsed, recording);
    }

    #[test]
    fn test_missing_header_uses_default_size() {
        let recording = Recording::parse("null\nnull\n").unwrap();
        assert_eq!(recording.header.frame_size, FrameSize::new(480, 360));
        assert_eq!(recording.len(), 2);
    }

    #[test]
    fn test_frame_source_exhausts() {
        let source = ReplayFrameSource::new(FrameSize::new(480, 360), 2);
        assert_eq!(source.current_frame().unwrap().sequence, 0);
        assert_eq!(source.current_frame().unwrap().sequence, 1);
        assert!(source.current_frame().is_none());
        assert!(source.is_exhausted());
        assert_eq!(source.frames_served(), 2);
    }

    #[tokio::test]
    async fn test_detector_applies_score_threshold() {
        let detector = ReplayDetector::new(vec![Some(detection(0.3)), Some(detection(0.8))]);
        let options = DetectorOptions::default();
        let size = FrameSize::new(480, 360);

        let low = detector.detect(&VideoFrame::empty(0, size), &options).await.unwrap();
        let high = detector.detect(&VideoFrame::empty(1, size), &options).await.unwrap();
        assert!(low.is_none());
        assert!(high.is_some());
        assert!(detector.detect(&VideoFrame::empty(9, size), &options).await.is_err());
        assert_eq!(detector.calls(), 3);
    }

    #[test]
    fn test_json_lines_renderer_output() {
        let renderer = JsonLinesRenderer::new(Vec::new());
        let transform = Transform::new(1.0, 0.0, -64.0, 145.0, Point::new(164.0, 55.0));
        renderer.apply_transform(&transform).unwrap();
        assert_eq!(renderer.records_written(), 1);

        let output = String::from_utf8(renderer.into_inner().unwrap()).unwrap();
        let record: RenderRecord = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(record, RenderRecord::Transform { transform });
        assert!(output.contains(r#""type":"transform""#));
    }

    #[test]
    fn test_json_lines_renderer_writes_landmarks_with_eyes() {
        let renderer = JsonLinesRenderer::new(Vec::new());
        let landmarks = LandmarkSet::new(vec![Point::new(3.0, 4.0); LANDMARK_COUNT]).unwrap();
        let eyes = EyeCenters {
            left: Point::new(100.0, 200.0),
            right: Point::new(172.0, 200.0),
        };
        renderer
            .draw_landmarks(&DebugOverlay {
                landmarks,
                eyes,
                marker_radius: 5.0,
            })
            .unwrap();

        let output = String::from_utf8(renderer.into_inner().unwrap()).unwrap();
        match serde_json::from_str::<RenderRecord>(output.trim()).unwrap() {
            RenderRecord::Eyes {
                eyes: written,
                marker_radius,
                landmarks,
            } => {
                assert_eq!(written, eyes);
                assert_eq!(marker_radius, 5.0);
                assert_eq!(landmarks.len(), LANDMARK_COUNT);
                assert_eq!(landmarks[0], Point::new(3.0, 4.0));
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }
}
