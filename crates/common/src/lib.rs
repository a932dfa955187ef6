//! Eyeline Common Utilities
//!
//! Shared infrastructure for all Eyeline crates:
//! - Error types and result aliases
//! - Clock utilities for run timing and throughput
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
