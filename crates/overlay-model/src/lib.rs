//! Eyeline Overlay Model
//!
//! Defines the core data contracts shared by the tracking pipeline:
//! - **Points and sizes:** Pixel-space coordinates of a frame or display
//! - **Landmarks:** The 68-point facial landmark set and single-face detections
//! - **Reference asset:** Fixed eye geometry of the overlay image
//! - **Transform:** The ready-to-apply placement of the overlay
//!
//! All coordinates are in pixels. Detections are produced in frame space
//! and rescaled to display space before any geometry is computed.

pub mod landmarks;
pub mod point;
pub mod reference;
pub mod transform;

pub use landmarks::*;
pub use point::*;
pub use reference::*;
pub use transform::*;
