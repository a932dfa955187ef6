//! Overlay placement emitted once per successful detection cycle.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::point::Point;

/// Smoothed, ready-to-apply placement of the overlay.
///
/// Translation is applied to the overlay element's top-left corner.
/// Rotation and scale pivot around `origin`, which is pinned to the
/// reference left eye center on the overlay image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
    pub rotation_radians: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub origin: Point,
}

impl Transform {
    /// Build a transform, folding a rotation of exactly `-π` onto `π`.
    pub fn new(
        scale: f64,
        rotation_radians: f64,
        translate_x: f64,
        translate_y: f64,
        origin: Point,
    ) -> Self {
        Self {
            scale,
            rotation_radians: normalize_angle(rotation_radians),
            translate_x,
            translate_y,
            origin,
        }
    }

    /// Rotation in degrees, for logging and display.
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_radians.to_degrees()
    }

    /// Style declarations a web-style renderer applies to the overlay element.
    pub fn css_style(&self) -> String {
        format!(
            "transform-origin: {}px {}px; scale: {}; rotate: {}rad; top: {}px; left: {}px;",
            self.origin.x,
            self.origin.y,
            self.scale,
            self.rotation_radians,
            self.translate_y,
            self.translate_x
        )
    }
}

/// Map an angle into `(-π, π]`.
pub fn normalize_angle(radians: f64) -> f64 {
    if !radians.is_finite() {
        return radians;
    }
    let mut angle = radians % (2.0 * PI);
    if angle <= -PI {
        angle += 2.0 * PI;
    } else if angle > PI {
        angle -= 2.0 * PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalized_angle_stays_in_half_open_range(angle in -100.0f64..100.0) {
            let a = normalize_angle(angle);
            prop_assert!(a > -PI && a <= PI);
        }
    }

    #[test]
    fn test_minus_pi_folds_to_pi() {
        let t = Transform::new(1.0, -PI, 0.0, 0.0, Point::ORIGIN);
        assert_eq!(t.rotation_radians, PI);
    }

    #[test]
    fn test_normalize_keeps_in_range_values() {
        assert_eq!(normalize_angle(0.5), 0.5);
        assert_eq!(normalize_angle(PI), PI);
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_css_style_string_is_stable() {
        let t = Transform::new(1.25, 0.1, -64.0, 145.0, Point::new(164.0, 55.0));
        assert_eq!(
            t.css_style(),
            "transform-origin: 164px 55px; scale: 1.25; rotate: 0.1rad; top: 145px; left: -64px;"
        );
    }
}
