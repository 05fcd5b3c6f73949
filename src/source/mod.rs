//! Streaming point sources for the capture phase.
//!
//! The external transport (in production, a sensor middleware topic) is
//! modeled as the [`BatchSource`] capability: subscribing to a topic yields
//! the receiving half of a bounded channel over which ordered batches
//! arrive. Two implementations are provided: [`ReplaySource`] plays recorded
//! batches from a file or stdin, and [`ChannelSource`] lets a caller feed
//! batches in-process.

pub mod replay;
pub mod types;

// Re-export commonly used types
pub use replay::ReplaySource;
pub use types::{Point3D, PointBatch, PointSet};

use crossbeam_channel::{bounded, Receiver, Sender};

/// Capacity of the delivery channel between a source and the capture loop.
pub const CHANNEL_CAPACITY: usize = 10_000;

/// A streaming source of point batches.
///
/// Delivery rate and batch size are unspecified and unbounded; the only
/// guarantee is strict FIFO ordering into a single consumer.
pub trait BatchSource {
    /// Subscribe to the given topic and start delivery.
    ///
    /// Dropping the returned receiver unsubscribes: the source observes the
    /// closed channel and stops delivering.
    fn subscribe(&mut self, topic: &str) -> Result<Receiver<PointBatch>, SourceError>;
}

/// Errors raised by a batch source. All are fatal to the capture phase.
#[derive(Debug)]
pub enum SourceError {
    /// The underlying input could not be read.
    Io(String),
    /// The input contained a batch that could not be parsed.
    Malformed(String),
    /// The source hung up before the capture window expired.
    Disconnected,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Io(e) => write!(f, "source IO error: {e}"),
            SourceError::Malformed(e) => write!(f, "malformed batch: {e}"),
            SourceError::Disconnected => write!(f, "source disconnected before capture finished"),
        }
    }
}

impl std::error::Error for SourceError {}

/// An in-process source fed through a channel sender.
///
/// Used by tests and demos to stand in for a live transport: hold on to the
/// [`handle`](ChannelSource::handle), subscribe, then send batches from any
/// thread.
pub struct ChannelSource {
    sender: Sender<PointBatch>,
    receiver: Receiver<PointBatch>,
}

impl ChannelSource {
    pub fn new() -> Self {
        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        Self { sender, receiver }
    }

    /// The feeding half. Dropping every clone disconnects the source.
    pub fn handle(&self) -> Sender<PointBatch> {
        self.sender.clone()
    }
}

impl Default for ChannelSource {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchSource for ChannelSource {
    fn subscribe(&mut self, topic: &str) -> Result<Receiver<PointBatch>, SourceError> {
        log::debug!("channel source subscribed to {topic}");
        Ok(self.receiver.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_source_delivers_in_order() {
        let mut source = ChannelSource::new();
        let feeder = source.handle();
        let receiver = source.subscribe("/test").unwrap();

        for x in 0..3 {
            feeder
                .send(PointBatch::new(vec![Point3D::new(x as f64, 0.0, 0.0)]))
                .unwrap();
        }

        for x in 0..3 {
            let batch = receiver.recv().unwrap();
            assert_eq!(batch.points[0].x, x as f64);
        }
    }
}
