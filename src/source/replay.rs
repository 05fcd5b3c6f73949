//! Replay source: plays recorded point batches through the delivery channel.
//!
//! Input is newline-delimited JSON, one batch per line, each line an array
//! of `{x, y, z}` records. Batches are sent from a feeder thread at a fixed
//! pacing interval, emulating live delivery. The whole input is read and
//! parsed up front so a malformed recording fails the subscription instead
//! of dying mid-capture.

use crate::source::types::{Point3D, PointBatch};
use crate::source::{BatchSource, SourceError, CHANNEL_CAPACITY};
use crossbeam_channel::{bounded, Receiver};
use std::io::Read;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// A source that replays batches from a recording file or stdin.
pub struct ReplaySource {
    /// Input path; `None` reads stdin to EOF.
    input: Option<PathBuf>,
    /// Delay between consecutive batch deliveries.
    interval: Duration,
}

impl ReplaySource {
    pub fn new(input: Option<PathBuf>, interval: Duration) -> Self {
        Self { input, interval }
    }

    fn read_input(&self) -> Result<String, SourceError> {
        match &self.input {
            Some(path) => std::fs::read_to_string(path)
                .map_err(|e| SourceError::Io(format!("cannot read {path:?}: {e}"))),
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|e| SourceError::Io(format!("cannot read stdin: {e}")))?;
                Ok(buf)
            }
        }
    }

    fn parse_batches(content: &str) -> Result<Vec<PointBatch>, SourceError> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                let points: Vec<Point3D> = serde_json::from_str(line)
                    .map_err(|e| SourceError::Malformed(format!("line {}: {e}", n + 1)))?;
                Ok(PointBatch::new(points))
            })
            .collect()
    }
}

impl BatchSource for ReplaySource {
    fn subscribe(&mut self, topic: &str) -> Result<Receiver<PointBatch>, SourceError> {
        let batches = Self::parse_batches(&self.read_input()?)?;
        log::info!(
            "replaying {} batches on {topic} at {:?} intervals",
            batches.len(),
            self.interval
        );

        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        let interval = self.interval;
        thread::spawn(move || {
            for batch in batches {
                // A closed channel means the consumer unsubscribed.
                if sender.send(batch).is_err() {
                    log::debug!("replay consumer unsubscribed, stopping feeder");
                    return;
                }
                thread::sleep(interval);
            }
            log::debug!("replay input exhausted");
        });

        Ok(receiver)
    }
}
