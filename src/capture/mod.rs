//! Duration-bounded streaming capture.
//!
//! This module contains:
//! - The capture session state machine (window expiry, validity filtering)
//! - The capture loop consuming batches from a subscribed source

pub mod session;
pub mod stream;

// Re-export commonly used types
pub use session::{CaptureSession, Disposition};
pub use stream::StreamCapture;
