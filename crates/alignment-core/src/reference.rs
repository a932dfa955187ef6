//! Immutable reference geometry derived from the overlay asset.

use eyeline_common::error::{EyelineError, EyelineResult};
use eyeline_overlay_model::{FrameSize, Point, ReferenceAsset};

use crate::geometry::distance;

/// Smallest eye distance, in pixels, that still yields a usable scale.
pub const MIN_EYE_DISTANCE: f64 = 1e-6;

/// Reference eye geometry, computed once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceConfig {
    left_eye_center: Point,
    right_eye_center: Point,
    inter_eye_distance: f64,
    asset_size: FrameSize,
}

impl ReferenceConfig {
    /// Derive the reference configuration from asset metadata.
    pub fn new(asset: &ReferenceAsset) -> EyelineResult<Self> {
        if !asset.left_eye_center.is_finite() || !asset.right_eye_center.is_finite() {
            return Err(EyelineError::config(
                "reference eye centers must be finite",
            ));
        }
        let inter_eye_distance = distance(asset.left_eye_center, asset.right_eye_center);
        if inter_eye_distance < MIN_EYE_DISTANCE {
            return Err(EyelineError::config(format!(
                "reference eye centers are {inter_eye_distance}px apart; they must be distinct"
            )));
        }
        Ok(Self {
            left_eye_center: asset.left_eye_center,
            right_eye_center: asset.right_eye_center,
            inter_eye_distance,
            asset_size: asset.size,
        })
    }

    pub fn left_eye_center(&self) -> Point {
        self.left_eye_center
    }

    pub fn right_eye_center(&self) -> Point {
        self.right_eye_center
    }

    pub fn inter_eye_distance(&self) -> f64 {
        self.inter_eye_distance
    }

    pub fn asset_size(&self) -> FrameSize {
        self.asset_size
    }
}
