//! Demonstration of the point cloud capture pipeline.
//!
//! This example shows how to:
//! 1. Create an in-process batch source and subscribe to it
//! 2. Feed point batches (including deliberately invalid samples)
//! 3. Run a duration-bounded capture session
//! 4. Persist the capture record and convert it to a float32 blob
//!
//! Run with: cargo run --example capture_demo

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use pointcloud_recorder::{
    capture::StreamCapture,
    encode, record,
    source::{BatchSource, ChannelSource, Point3D, PointBatch},
    stats::CaptureStats,
    VERSION,
};

const WINDOW: Duration = Duration::from_secs(3);

fn main() {
    println!("Point Cloud Recorder - Capture Demo v{VERSION}");
    println!("==============================================");
    println!();

    let mut source = ChannelSource::new();
    let feeder = source.handle();
    let receiver = source.subscribe("/demo_cloud").expect("subscribe failed");

    println!("Feeding a synthetic helix for {WINDOW:?}...");
    println!();

    // Feeder thread: one batch of 8 points every 200ms, with an occasional
    // NaN sample mixed in, running past the window so expiry triggers.
    thread::spawn(move || {
        let mut t = 0.0f64;
        for round in 0.. {
            let mut points = Vec::with_capacity(8);
            for _ in 0..8 {
                points.push(Point3D::new(t.cos(), t.sin(), t / 10.0));
                t += 0.1;
            }
            if round % 5 == 0 {
                points.push(Point3D::new(f64::NAN, 0.0, 0.0));
            }
            if feeder.send(PointBatch::new(points)).is_err() {
                return;
            }
            thread::sleep(Duration::from_millis(200));
        }
    });

    let running = Arc::new(AtomicBool::new(true));
    let stats = Arc::new(CaptureStats::new());
    let capture = StreamCapture::new(WINDOW, Arc::clone(&stats));

    let points = match capture.run(&receiver, &running) {
        Ok(points) => points,
        Err(e) => {
            eprintln!("Capture failed: {e}");
            return;
        }
    };

    println!("Captured {} points", points.len());
    println!();
    println!("{}", stats.summary());
    println!();

    // Persist both artifacts next to each other.
    let dir = std::env::temp_dir().join("pointcloud-recorder-demo");
    let record_path = dir.join("pointcloud_capture.json");
    let blob_path = dir.join("points.bin");

    if let Err(e) = record::write(&points, &record_path) {
        eprintln!("Error writing record: {e}");
        return;
    }
    println!("Record:  {record_path:?}");

    let loaded = record::load(&record_path).expect("record round trip failed");
    let blob = match encode::encode(&loaded) {
        Ok(blob) => blob,
        Err(e) => {
            eprintln!("Encode failed: {e}");
            return;
        }
    };
    if let Err(e) = encode::write_blob(&blob, &blob_path) {
        eprintln!("Error writing blob: {e}");
        return;
    }
    println!(
        "Blob:    {blob_path:?} ({} bytes = 12 x {} points)",
        blob.len(),
        loaded.len()
    );
    println!();
    println!("Demo complete!");
}
