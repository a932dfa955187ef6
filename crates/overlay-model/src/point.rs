//! Pixel-space point and size types.

use serde::{Deserialize, Serialize};

/// A 2D point in the pixel space of a frame or display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale each axis independently.
    pub fn scaled(&self, sx: f64, sy: f64) -> Point {
        Point {
            x: self.x * sx,
            y: self.y * sy,
        }
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Pixel dimensions of a frame, display, or image asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Per-axis factors that map coordinates in `self` onto `target`.
    ///
    /// Returns `None` if `self` has a zero dimension.
    pub fn scale_to(&self, target: FrameSize) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        Some((
            target.width as f64 / self.width as f64,
            target.height as f64 / self.height as f64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_point() {
        let p = Point::new(10.0, 20.0).scaled(0.5, 2.0);
        assert_eq!(p, Point::new(5.0, 40.0));
    }

    #[test]
    fn test_scale_to_display() {
        let frame = FrameSize::new(640, 480);
        let (sx, sy) = frame.scale_to(FrameSize::new(480, 360)).unwrap();
        assert!((sx - 0.75).abs() < 1e-12);
        assert!((sy - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_scale_from_empty_size() {
        assert!(FrameSize::new(0, 480)
            .scale_to(FrameSize::new(480, 360))
            .is_none());
    }

    #[test]
    fn test_non_finite_point() {
        assert!(Point::new(1.0, 2.0).is_finite());
        assert!(!Point::new(f64::NAN, 2.0).is_finite());
    }
}
