//! Eyeline Tracking Engine
//!
//! Runs the detection loop that keeps the overlay aligned with a live
//! face. The loop talks to the outside world only through the ports in
//! [`ports`]; camera, detector model, and renderer are supplied by the
//! embedding application.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 TrackingSession                   │
//! │  start() ── ModelLoader ──► spawn DetectionLoop   │
//! │  stop()  ── clears the run flag                   │
//! │                                                   │
//! │  DetectionLoop (one cycle at a time)              │
//! │  ┌─────────────┐  ┌──────────┐  ┌──────────────┐  │
//! │  │ FrameSource │─►│ Detector │─►│ Alignment    │  │
//! │  └─────────────┘  └──────────┘  │ Calculator   │  │
//! │                                 └──────┬───────┘  │
//! │                                        ▼          │
//! │                                   Renderer        │
//! └──────────────────────────────────────────────────┘
//! ```

pub mod ports;
pub mod replay;
pub mod session;
pub mod stats;

pub use ports::*;
pub use session::*;
pub use stats::{CycleOutcome, LoopStats, StatsSnapshot};
