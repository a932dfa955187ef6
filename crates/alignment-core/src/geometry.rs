//! Plane geometry on pixel-space points.

use eyeline_overlay_model::{EyeCorners, LandmarkSet, Point};
use serde::{Deserialize, Serialize};

/// Arithmetic mean of two points.
pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Signed angle of the line from `left` to `right` relative to horizontal.
///
/// Level eyes give `0.0`. Positive angles rotate clockwise in image
/// coordinates, where `y` grows downwards.
pub fn rotation_angle(left: Point, right: Point) -> f64 {
    (right.y - left.y).atan2(right.x - left.x)
}

/// Approximate an eye center as the midpoint of two contour corners.
///
/// This is intentionally not the contour centroid.
pub fn eye_center(corners: EyeCorners) -> Point {
    midpoint(corners.outer, corners.inner)
}

/// Live eye centers of one detected face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeCenters {
    pub left: Point,
    pub right: Point,
}

impl EyeCenters {
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Self {
        Self {
            left: eye_center(landmarks.left_eye_corners()),
            right: eye_center(landmarks.right_eye_corners()),
        }
    }

    /// Distance between the two centers.
    pub fn distance(&self) -> f64 {
        distance(self.left, self.right)
    }

    /// Rotation of the eye line.
    pub fn rotation(&self) -> f64 {
        rotation_angle(self.left, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn coord() -> impl Strategy<Value = f64> {
        -5000.0f64..5000.0
    }

    proptest! {
        #[test]
        fn distance_to_self_is_zero(x in coord(), y in coord()) {
            let p = Point::new(x, y);
            prop_assert_eq!(distance(p, p), 0.0);
        }

        #[test]
        fn distance_is_symmetric(ax in coord(), ay in coord(), bx in coord(), by in coord()) {
            let a = Point::new(ax, ay);
            let b = Point::new(bx, by);
            prop_assert_eq!(distance(a, b), distance(b, a));
        }

        #[test]
        fn level_points_have_zero_rotation(lx in coord(), rx in coord(), y in coord()) {
            prop_assume!(rx > lx);
            prop_assert_eq!(rotation_angle(Point::new(lx, y), Point::new(rx, y)), 0.0);
        }

        #[test]
        fn midpoint_is_equidistant(ax in coord(), ay in coord(), bx in coord(), by in coord()) {
            let a = Point::new(ax, ay);
            let b = Point::new(bx, by);
            let m = midpoint(a, b);
            prop_assert!((distance(a, m) - distance(m, b)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_distance_three_four_five() {
        assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_rotation_quadrants() {
        let origin = Point::ORIGIN;
        assert!((rotation_angle(origin, Point::new(0.0, 10.0)) - FRAC_PI_2).abs() < 1e-12);
        assert!((rotation_angle(origin, Point::new(10.0, 10.0)) - FRAC_PI_2 / 2.0).abs() < 1e-12);
        assert!((rotation_angle(origin, Point::new(10.0, -10.0)) + FRAC_PI_2 / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_eye_center_is_corner_midpoint() {
        let corners = EyeCorners {
            outer: Point::new(90.0, 198.0),
            inner: Point::new(110.0, 202.0),
        };
        assert_eq!(eye_center(corners), Point::new(100.0, 200.0));
    }
}
