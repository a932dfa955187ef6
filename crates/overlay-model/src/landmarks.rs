//! Facial landmark types produced by the external detector.
//!
//! Landmarks follow the 68-point iBUG layout. Recorded detections are
//! stored as JSONL, one detection per frame, where a `null` line means
//! no face was found in that frame.

use serde::{Deserialize, Serialize};

use crate::point::{FrameSize, Point};

/// Number of points in a full landmark set.
pub const LANDMARK_COUNT: usize = 68;

/// Index range of the left eye contour (six points).
pub const LEFT_EYE: std::ops::Range<usize> = 36..42;

/// Index range of the right eye contour (six points).
pub const RIGHT_EYE: std::ops::Range<usize> = 42..48;

/// Offset of the corner conventionally labeled "outer" within an eye contour.
const OUTER_CORNER: usize = 0;

/// Offset of the corner conventionally labeled "inner" within an eye contour.
const INNER_CORNER: usize = 3;

/// An ordered, fixed-length set of facial landmarks for one face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct LandmarkSet {
    points: Vec<Point>,
}

/// The two contour corners used to approximate an eye center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeCorners {
    /// First contour point of the eye.
    pub outer: Point,
    /// Fourth contour point of the eye.
    pub inner: Point,
}

impl LandmarkSet {
    /// Build a landmark set, validating the point count.
    pub fn new(points: Vec<Point>) -> Result<Self, ModelError> {
        if points.len() != LANDMARK_COUNT {
            return Err(ModelError::InvalidLandmarks {
                message: format!(
                    "expected {LANDMARK_COUNT} points, got {}",
                    points.len()
                ),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(ModelError::InvalidLandmarks {
                message: format!("point {index} is not finite"),
            });
        }
        Ok(Self { points })
    }

    /// All points in detector order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The six left-eye contour points.
    pub fn left_eye(&self) -> &[Point] {
        &self.points[LEFT_EYE]
    }

    /// The six right-eye contour points.
    pub fn right_eye(&self) -> &[Point] {
        &self.points[RIGHT_EYE]
    }

    pub fn left_eye_corners(&self) -> EyeCorners {
        corners(self.left_eye())
    }

    pub fn right_eye_corners(&self) -> EyeCorners {
        corners(self.right_eye())
    }

    /// Rescale every point from `from` pixel space into `to` pixel space.
    ///
    /// Returns an unchanged copy when `from` has a zero dimension.
    pub fn resized(&self, from: FrameSize, to: FrameSize) -> LandmarkSet {
        match from.scale_to(to) {
            Some((sx, sy)) => LandmarkSet {
                points: self.points.iter().map(|p| p.scaled(sx, sy)).collect(),
            },
            None => self.clone(),
        }
    }
}

fn corners(eye: &[Point]) -> EyeCorners {
    EyeCorners {
        outer: eye[OUTER_CORNER],
        inner: eye[INNER_CORNER],
    }
}

impl TryFrom<Vec<Point>> for LandmarkSet {
    type Error = ModelError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        LandmarkSet::new(points)
    }
}

impl From<LandmarkSet> for Vec<Point> {
    fn from(set: LandmarkSet) -> Self {
        set.points
    }
}

/// Axis-aligned face bounding box in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn scaled(&self, sx: f64, sy: f64) -> BoundingBox {
        BoundingBox {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }
}

/// A single-face detection with its landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub bounding_box: BoundingBox,

    /// Detector confidence in `[0.0, 1.0]`.
    #[serde(default = "default_score")]
    pub score: f64,

    pub landmarks: LandmarkSet,
}

fn default_score() -> f64 {
    1.0
}

impl FaceDetection {
    /// Rescale the box and landmarks from frame space into display space.
    pub fn resized(&self, from: FrameSize, to: FrameSize) -> FaceDetection {
        let bounding_box = match from.scale_to(to) {
            Some((sx, sy)) => self.bounding_box.scaled(sx, sy),
            None => self.bounding_box,
        };
        FaceDetection {
            bounding_box,
            score: self.score,
            landmarks: self.landmarks.resized(from, to),
        }
    }
}

/// Parse recorded detections from JSONL content.
///
/// Blank lines and `#` comments are skipped; `null` lines yield `None`.
pub fn parse_detections(jsonl: &str) -> Result<Vec<Option<FaceDetection>>, ModelError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            serde_json::from_str(line).map_err(|source| ModelError::Parse {
                line: line_no,
                source,
            })
        })
        .collect()
}

/// Serialize detections to JSONL format.
pub fn serialize_detections(
    detections: &[Option<FaceDetection>],
) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for detection in detections {
        output.push_str(&serde_json::to_string(detection)?);
        output.push('\n');
    }
    Ok(output)
}

/// Errors raised when building or parsing model values.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid landmarks: {message}")]
    InvalidLandmarks { message: String },

    #[error("Parse error on line {line}: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
}
