//! Capture session state: one bounded time window of point accumulation.
//!
//! A session is created when capture starts, mutated once per arriving
//! batch, and finalized the first time a batch arrives after the window has
//! elapsed. The expiry-triggering batch is dropped whole: its valid points
//! are not appended. Downstream consumers rely on that drop policy, so do
//! not "fix" it by appending before finalizing.

use crate::source::types::{Point3D, PointBatch, PointSet};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// What happened to a batch offered to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The batch was inspected; `appended` finite points were kept and
    /// `discarded` points had a non-finite coordinate.
    Accepted { appended: usize, discarded: usize },
    /// The capture window had already elapsed; the batch was dropped whole
    /// and the session is now finalized.
    Expired,
}

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Active,
    Finalized,
}

/// A single capture session accumulating valid points over a bounded window.
///
/// The session exclusively owns its `PointSet` for its whole lifetime;
/// batches are offered serially by one consumer, so no locking is needed.
pub struct CaptureSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    window: Duration,
    points: PointSet,
    discarded: u64,
    state: SessionState,
}

impl CaptureSession {
    /// Start a session now with the given capture window.
    pub fn new(window: std::time::Duration) -> Self {
        Self::starting_at(window, Utc::now())
    }

    /// Start a session with an explicit start stamp.
    pub fn starting_at(window: std::time::Duration, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            window: Duration::from_std(window).unwrap_or(Duration::MAX),
            points: PointSet::new(),
            discarded: 0,
            state: SessionState::Active,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Number of points with a non-finite coordinate filtered out so far.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    pub fn is_finalized(&self) -> bool {
        self.state == SessionState::Finalized
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Offer a batch at the current wall-clock time.
    pub fn offer(&mut self, batch: PointBatch) -> Disposition {
        self.offer_at(batch, Utc::now())
    }

    /// Offer a batch as of `now`.
    ///
    /// Expiry is evaluated before the batch contents are inspected: a batch
    /// arriving after the window has elapsed finalizes the session and is
    /// dropped entirely. Offering to an already-finalized session is a no-op
    /// that reports `Expired` again.
    pub fn offer_at(&mut self, batch: PointBatch, now: DateTime<Utc>) -> Disposition {
        if self.state == SessionState::Finalized {
            return Disposition::Expired;
        }

        if now - self.started_at > self.window {
            log::info!(
                "session {} window elapsed, dropping batch of {} points",
                self.id,
                batch.len()
            );
            self.state = SessionState::Finalized;
            return Disposition::Expired;
        }

        let mut appended = 0;
        let mut discarded = 0;
        for point in batch.points {
            if point.is_finite() {
                self.points.push(point);
                appended += 1;
            } else {
                log::debug!("session {}: discarding non-finite sample", self.id);
                discarded += 1;
            }
        }
        self.discarded += discarded as u64;

        Disposition::Accepted {
            appended,
            discarded,
        }
    }

    /// Consume the session, yielding the accumulated points.
    pub fn into_points(self) -> PointSet {
        self.points
    }

    /// Borrow the accumulated points without ending the session.
    pub fn points(&self) -> &[Point3D] {
        self.points.points()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(window: u64) -> std::time::Duration {
        std::time::Duration::from_secs(window)
    }

    #[test]
    fn test_filters_non_finite_points() {
        let start = Utc::now();
        let mut session = CaptureSession::starting_at(secs(20), start);

        let disposition = session.offer_at(
            PointBatch::new(vec![
                Point3D::new(1.0, f64::NAN, 2.0),
                Point3D::new(3.0, 4.0, 5.0),
            ]),
            start,
        );

        assert_eq!(
            disposition,
            Disposition::Accepted {
                appended: 1,
                discarded: 1
            }
        );
        assert_eq!(session.into_points().points(), &[Point3D::new(3.0, 4.0, 5.0)]);
    }

    #[test]
    fn test_expiry_drops_triggering_batch_whole() {
        let start = Utc::now();
        let mut session = CaptureSession::starting_at(secs(20), start);

        // Arrivals at 0, 5, 10, 15 seconds land inside the window.
        for t in [0, 5, 10, 15] {
            let disposition = session.offer_at(
                PointBatch::new(vec![Point3D::new(t as f64, 0.0, 0.0)]),
                start + Duration::seconds(t),
            );
            assert!(matches!(disposition, Disposition::Accepted { .. }));
        }

        // The arrival at 21 seconds is past the window: dropped whole, even
        // though its point is valid.
        let disposition = session.offer_at(
            PointBatch::new(vec![Point3D::new(21.0, 0.0, 0.0)]),
            start + Duration::seconds(21),
        );
        assert_eq!(disposition, Disposition::Expired);
        assert!(session.is_finalized());

        let xs: Vec<f64> = session.into_points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0, 15.0]);
    }

    #[test]
    fn test_arrival_exactly_at_window_is_kept() {
        let start = Utc::now();
        let mut session = CaptureSession::starting_at(secs(20), start);

        // The cutoff is strict: elapsed must exceed the window.
        let disposition = session.offer_at(
            PointBatch::new(vec![Point3D::new(1.0, 1.0, 1.0)]),
            start + Duration::seconds(20),
        );
        assert!(matches!(disposition, Disposition::Accepted { appended: 1, .. }));
    }

    #[test]
    fn test_offer_after_finalization_is_noop() {
        let start = Utc::now();
        let mut session = CaptureSession::starting_at(secs(1), start);

        session.offer_at(PointBatch::new(vec![]), start + Duration::seconds(2));
        assert!(session.is_finalized());

        let disposition = session.offer_at(
            PointBatch::new(vec![Point3D::new(1.0, 2.0, 3.0)]),
            start + Duration::seconds(3),
        );
        assert_eq!(disposition, Disposition::Expired);
        assert_eq!(session.point_count(), 0);
    }
}
