//! The capture loop: single consumer draining the delivery channel into a
//! session until the window expires.

use crate::capture::session::{CaptureSession, Disposition};
use crate::source::types::{PointBatch, PointSet};
use crate::source::SourceError;
use crate::stats::CaptureStats;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long to wait for a batch before re-checking the stop flag.
const RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Drives a [`CaptureSession`] from a subscribed batch receiver.
pub struct StreamCapture {
    session: CaptureSession,
    stats: Arc<CaptureStats>,
}

impl StreamCapture {
    pub fn new(window: Duration, stats: Arc<CaptureStats>) -> Self {
        Self {
            session: CaptureSession::new(window),
            stats,
        }
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    /// Consume batches until the capture window expires.
    ///
    /// Returns the ordered set of valid points. The receiver is dropped on
    /// return, which unsubscribes the source. Failure modes:
    ///
    /// - the source hanging up before expiry is a fatal transport error;
    /// - a cleared `running` flag (Ctrl+C) ends the capture early with the
    ///   points gathered so far.
    ///
    /// Expiry is only evaluated when a batch arrives, so a session that
    /// never receives one runs until the stop flag clears it.
    pub fn run(
        mut self,
        batches: &Receiver<PointBatch>,
        running: &Arc<AtomicBool>,
    ) -> Result<PointSet, SourceError> {
        log::info!(
            "capture session {} started at {}",
            self.session.id(),
            self.session.started_at()
        );

        while running.load(Ordering::SeqCst) {
            match batches.recv_timeout(RECV_TIMEOUT) {
                Ok(batch) => {
                    self.stats.record_batch();
                    match self.session.offer(batch) {
                        Disposition::Accepted {
                            appended,
                            discarded,
                        } => {
                            self.stats.record_appended(appended as u64);
                            self.stats.record_discarded(discarded as u64);
                        }
                        Disposition::Expired => {
                            self.stats.record_expired_batch();
                            break;
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Err(SourceError::Disconnected),
            }
        }

        log::info!(
            "capture session {} finished with {} points ({} discarded)",
            self.session.id(),
            self.session.point_count(),
            self.session.discarded()
        );
        Ok(self.session.into_points())
    }
}
