//! Landmark-to-transform alignment.
//!
//! Compares the live eye line against the reference eye line of the
//! overlay image and produces a smoothed placement:
//!
//! ```text
//! scale     = |live_left - live_right| / reference inter-eye distance
//! rotation  = angle of live_left -> live_right
//! translate = live_left - reference left eye center
//! ```
//!
//! Each raw value goes through its own smoothing channel.

use eyeline_common::error::{EyelineError, EyelineResult};
use eyeline_overlay_model::{LandmarkSet, Transform};
use serde::{Deserialize, Serialize};

use crate::geometry::EyeCenters;
use crate::reference::{ReferenceConfig, MIN_EYE_DISTANCE};
use crate::smoothing::{Channel, SmoothingFilter};

/// Unsmoothed placement measured from a single detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawAlignment {
    pub scale: f64,
    pub rotation_radians: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

/// Result of aligning one detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    pub eyes: EyeCenters,
    pub raw: RawAlignment,
    pub transform: Transform,
}

/// Alignment state for one tracking run.
///
/// Owns its smoothing history; create a new calculator per run.
#[derive(Debug, Clone)]
pub struct AlignmentCalculator {
    reference: ReferenceConfig,
    filter: SmoothingFilter,
}

impl AlignmentCalculator {
    pub fn new(reference: ReferenceConfig, smoothing_window: usize) -> Self {
        Self {
            reference,
            filter: SmoothingFilter::new(smoothing_window),
        }
    }

    pub fn reference(&self) -> &ReferenceConfig {
        &self.reference
    }

    pub fn filter(&self) -> &SmoothingFilter {
        &self.filter
    }

    /// Measure the raw placement for the given live eye centers.
    ///
    /// Fails without touching smoothing state when the eyes coincide.
    pub fn measure(&self, eyes: &EyeCenters) -> EyelineResult<RawAlignment> {
        let live_distance = eyes.distance();
        if !live_distance.is_finite() || live_distance < MIN_EYE_DISTANCE {
            return Err(EyelineError::degenerate(format!(
                "live eye centers are {live_distance}px apart"
            )));
        }

        let reference_left = self.reference.left_eye_center();
        Ok(RawAlignment {
            scale: live_distance / self.reference.inter_eye_distance(),
            rotation_radians: eyes.rotation(),
            translate_x: eyes.left.x - reference_left.x,
            translate_y: eyes.left.y - reference_left.y,
        })
    }

    /// Feed a raw measurement through the smoothing channels.
    pub fn smooth(&mut self, raw: &RawAlignment) -> Transform {
        let scale = self.filter.push(Channel::Scale, raw.scale);
        let rotation = self.filter.push(Channel::Rotation, raw.rotation_radians);
        let top = self.filter.push(Channel::Top, raw.translate_y);
        let left = self.filter.push(Channel::Left, raw.translate_x);

        Transform::new(
            scale,
            rotation,
            left,
            top,
            self.reference.left_eye_center(),
        )
    }

    /// Align one landmark set: eye centers, raw measurement, then smoothing.
    pub fn align(&mut self, landmarks: &LandmarkSet) -> EyelineResult<Alignment> {
        let eyes = EyeCenters::from_landmarks(landmarks);
        let raw = self.measure(&eyes)?;
        let transform = self.smooth(&raw);

        tracing::trace!(
            raw_scale = raw.scale,
            raw_rotation = raw.rotation_radians,
            scale = transform.scale,
            rotation = transform.rotation_radians,
            "Aligned overlay"
        );

        Ok(Alignment {
            eyes,
            raw,
            transform,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyeline_overlay_model::{Point, ReferenceAsset, LANDMARK_COUNT};

    /// Landmarks whose eye corners straddle the given centers by +-10px.
    fn landmarks_with_eyes(left: Point, right: Point) -> LandmarkSet {
        let mut points = vec![Point::ORIGIN; LANDMARK_COUNT];
        points[36] = Point::new(left.x - 10.0, left.y);
        points[39] = Point::new(left.x + 10.0, left.y);
        points[42] = Point::new(right.x - 10.0, right.y);
        points[45] = Point::new(right.x + 10.0, right.y);
        LandmarkSet::new(points).unwrap()
    }

    fn calculator() -> AlignmentCalculator {
        let reference = ReferenceConfig::new(&ReferenceAsset::default()).unwrap();
        AlignmentCalculator::new(reference, 3)
    }

    #[test]
    fn test_reference_worked_example() {
        let calc = calculator();
        let eyes = EyeCenters {
            left: Point::new(100.0, 200.0),
            right: Point::new(172.0, 200.0),
        };
        let raw = calc.measure(&eyes).unwrap();
        assert_eq!(raw.scale, 1.0);
        assert_eq!(raw.rotation_radians, 0.0);
        assert_eq!(raw.translate_x, -64.0);
        assert_eq!(raw.translate_y, 145.0);
    }

    #[test]
    fn test_steady_input_converges_to_raw() {
        let mut calc = calculator();
        let landmarks = landmarks_with_eyes(Point::new(100.0, 200.0), Point::new(172.0, 200.0));
        let mut last = None;
        for _ in 0..3 {
            last = Some(calc.align(&landmarks).unwrap());
        }
        let alignment = last.unwrap();
        assert_eq!(alignment.eyes.left, Point::new(100.0, 200.0));
        assert_eq!(alignment.transform.scale, 1.0);
        assert_eq!(alignment.transform.rotation_radians, 0.0);
        assert_eq!(alignment.transform.translate_x, -64.0);
        assert_eq!(alignment.transform.translate_y, 145.0);
        assert_eq!(alignment.transform.origin, Point::new(164.0, 55.0));
    }

    #[test]
    fn test_transform_is_smoothed_across_cycles() {
        let mut calc = calculator();
        let near = landmarks_with_eyes(Point::new(100.0, 200.0), Point::new(172.0, 200.0));
        let far = landmarks_with_eyes(Point::new(100.0, 200.0), Point::new(136.0, 200.0));

        calc.align(&near).unwrap();
        let second = calc.align(&far).unwrap();
        assert_eq!(second.raw.scale, 0.5);
        assert_eq!(second.transform.scale, 0.75);
    }

    #[test]
    fn test_tilted_eyes_produce_rotation() {
        let calc = calculator();
        let eyes = EyeCenters {
            left: Point::new(100.0, 100.0),
            right: Point::new(150.0, 150.0),
        };
        let raw = calc.measure(&eyes).unwrap();
        assert!((raw.rotation_radians - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert!(raw.scale > 0.0);
    }

    #[test]
    fn test_degenerate_eyes_leave_smoothing_untouched() {
        let mut calc = calculator();
        let collapsed = landmarks_with_eyes(Point::new(120.0, 80.0), Point::new(120.0, 80.0));
        let err = calc.align(&collapsed).unwrap_err();
        assert!(matches!(err, EyelineError::DegenerateLandmarks { .. }));
        for channel in Channel::ALL {
            assert!(calc.filter().channel(channel).is_none());
        }
    }
}
