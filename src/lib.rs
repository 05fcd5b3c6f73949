//! Point Cloud Recorder - duration-bounded 3D point capture and conversion.
//!
//! This library captures a time-bounded stream of 3D point samples from a
//! streaming source, persists them as a structured JSON record, and converts
//! that record into a dense little-endian float32 blob for downstream
//! consumption.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Point Cloud Recorder                     │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌───────────────┐   ┌──────────────────┐  │
//! │  │   Source   │──▶│ StreamCapture │──▶│ record (JSON)    │  │
//! │  │ (batches)  │   │ (window+filter)│  │ x,y,z records    │  │
//! │  └────────────┘   └───────────────┘   └────────┬─────────┘  │
//! │                                                │            │
//! │                                                ▼            │
//! │                                       ┌──────────────────┐  │
//! │                                       │ encode (binary)  │  │
//! │                                       │ LE float32 blob  │  │
//! │                                       └──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Capture and conversion are independent process lifetimes; the record
//! file is the only state shared between them.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pointcloud_recorder::{
//!     capture::StreamCapture,
//!     source::{BatchSource, ChannelSource},
//!     stats::CaptureStats,
//! };
//!
//! let mut source = ChannelSource::new();
//! let receiver = source.subscribe("/yrl_cloud").expect("subscribe failed");
//!
//! let stats = Arc::new(CaptureStats::new());
//! let capture = StreamCapture::new(Duration::from_secs_f64(20.0), stats);
//! let running = Arc::new(AtomicBool::new(true));
//! let points = capture.run(&receiver, &running).expect("capture failed");
//! ```

pub mod capture;
pub mod config;
pub mod encode;
pub mod record;
pub mod source;
pub mod stats;

// Re-export key types at crate root for convenience
pub use capture::{CaptureSession, Disposition, StreamCapture};
pub use config::Config;
pub use encode::{DecodeError, EncodeError, BYTES_PER_POINT};
pub use record::RecordError;
pub use source::{BatchSource, ChannelSource, Point3D, PointBatch, PointSet, ReplaySource, SourceError};
pub use stats::{CaptureStats, StatsSnapshot};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
