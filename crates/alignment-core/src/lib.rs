//! Eyeline Alignment Core
//!
//! Turns live eye landmarks into an overlay placement:
//! - **Geometry:** Midpoints, distances, and in-plane rotation of the eye line
//! - **Smoothing:** Bounded moving average, one window per tracked metric
//! - **Alignment:** Combines the reference eye geometry with live eyes
//!
//! This crate is pure computation: no I/O, no async, no detector.
//! All inputs are data; all outputs are data.

pub mod alignment;
pub mod geometry;
pub mod reference;
pub mod smoothing;

pub use alignment::{Alignment, AlignmentCalculator, RawAlignment};
pub use reference::ReferenceConfig;
pub use smoothing::{Channel, SmoothingFilter};
