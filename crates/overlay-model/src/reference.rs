//! Reference asset metadata for the overlay image.

use serde::{Deserialize, Serialize};

use crate::point::{FrameSize, Point};

/// Fixed geometry of the overlay image, supplied once at startup.
///
/// Eye centers are pixel coordinates on the image at its native size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceAsset {
    /// Left eye center on the overlay image.
    pub left_eye_center: Point,

    /// Right eye center on the overlay image.
    pub right_eye_center: Point,

    /// Native image dimensions.
    pub size: FrameSize,
}

impl ReferenceAsset {
    pub fn new(left_eye_center: Point, right_eye_center: Point, size: FrameSize) -> Self {
        Self {
            left_eye_center,
            right_eye_center,
            size,
        }
    }
}

impl Default for ReferenceAsset {
    /// The bundled 400x250 overlay with level eyes 72px apart.
    fn default() -> Self {
        Self {
            left_eye_center: Point::new(164.0, 55.0),
            right_eye_center: Point::new(236.0, 55.0),
            size: FrameSize::new(400, 250),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_asset_json_shape() {
        let json = serde_json::to_value(ReferenceAsset::default()).unwrap();
        assert_eq!(json["left_eye_center"]["x"], 164.0);
        assert_eq!(json["right_eye_center"]["x"], 236.0);
        assert_eq!(json["size"]["width"], 400);
        assert_eq!(json["size"]["height"], 250);
    }
}
