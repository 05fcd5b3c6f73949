//! Point Cloud Recorder CLI
//!
//! Two-phase pipeline: capture a duration-bounded point stream to a JSON
//! record, then convert the record to a little-endian float32 blob.

use clap::{Parser, Subcommand};
use pointcloud_recorder::{
    capture::StreamCapture,
    config::Config,
    encode, record,
    source::{BatchSource, ReplaySource},
    stats::CaptureStats,
    VERSION,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pointcloud-recorder")]
#[command(version = VERSION)]
#[command(about = "Duration-bounded 3D point capture and float32 blob conversion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a point stream into the JSON record file
    Capture {
        /// Capture window length in seconds
        #[arg(long)]
        duration: Option<f64>,

        /// Topic identifier to subscribe to
        #[arg(long)]
        topic: Option<String>,

        /// Destination of the capture record
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Replay batches from a recording file instead of stdin
        #[arg(long)]
        replay: Option<PathBuf>,

        /// Delay between replayed batches in milliseconds
        #[arg(long, default_value = "100")]
        interval_ms: u64,
    },

    /// Convert a capture record into the binary blob
    Convert {
        /// Capture record to read
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Destination of the binary blob
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show configuration
    Config,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Capture {
            duration,
            topic,
            output,
            replay,
            interval_ms,
        } => {
            cmd_capture(duration, topic, output, replay, interval_ms);
        }
        Commands::Convert { input, output } => {
            cmd_convert(input, output);
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_capture(
    duration: Option<f64>,
    topic: Option<String>,
    output: Option<PathBuf>,
    replay: Option<PathBuf>,
    interval_ms: u64,
) {
    println!("Point Cloud Recorder v{VERSION}");
    println!();

    let mut config = Config::load().unwrap_or_default();
    if let Some(secs) = duration {
        match Duration::try_from_secs_f64(secs) {
            Ok(d) => config.duration = d,
            Err(e) => {
                eprintln!("Error: invalid duration {secs}: {e}");
                std::process::exit(1);
            }
        }
    }
    if let Some(t) = topic {
        config.topic = t;
    }
    if let Some(path) = output {
        config.capture_output_path = path;
    }

    println!("Starting capture...");
    println!("  Topic: {}", config.topic);
    println!("  Window: {:.1}s", config.duration.as_secs_f64());
    println!(
        "  Input: {}",
        replay
            .as_ref()
            .map(|p| format!("{p:?}"))
            .unwrap_or_else(|| "stdin".to_string())
    );
    println!("  Record: {:?}", config.capture_output_path);
    println!();
    println!("Press Ctrl+C to stop early");
    println!();

    let mut source = ReplaySource::new(replay, Duration::from_millis(interval_ms));
    let receiver = match source.subscribe(&config.topic) {
        Ok(receiver) => receiver,
        Err(e) => {
            eprintln!("Error subscribing to {}: {e}", config.topic);
            std::process::exit(1);
        }
    };

    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(running.clone());

    let stats = Arc::new(CaptureStats::new());
    let capture = StreamCapture::new(config.duration, Arc::clone(&stats));

    let points = match capture.run(&receiver, &running) {
        Ok(points) => points,
        Err(e) => {
            eprintln!("Capture failed: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = record::write(&points, &config.capture_output_path) {
        eprintln!("Error writing capture record: {e}");
        std::process::exit(1);
    }

    println!(
        "Captured {} points to {:?}",
        points.len(),
        config.capture_output_path
    );
    println!();
    println!("{}", stats.summary());
}

fn cmd_convert(input: Option<PathBuf>, output: Option<PathBuf>) {
    let config = Config::load().unwrap_or_default();
    let input = input.unwrap_or(config.capture_output_path);
    let output = output.unwrap_or(config.binary_output_path);

    let points = match record::load(&input) {
        Ok(points) => points,
        Err(e) => {
            eprintln!("Error reading capture record: {e}");
            std::process::exit(1);
        }
    };

    let blob = match encode::encode(&points) {
        Ok(blob) => blob,
        Err(e) => {
            eprintln!("Encode failed: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = encode::write_blob(&blob, &output) {
        eprintln!("Error writing blob to {output:?}: {e}");
        std::process::exit(1);
    }

    println!(
        "Wrote {} points ({} bytes) to {:?}",
        points.len(),
        blob.len(),
        output
    );
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}
