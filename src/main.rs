// Demo harness: drives the detector with synthetic frames at camera
// cadence from one thread while the main thread runs the majority-vote
// query, the same split the robot code uses during autonomous init.

use anyhow::Result;
use sampling_detection::{DetectorConfig, Frame, GoldPosition, SamplingDetector};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const FRAME_WIDTH: usize = 640;
const FRAME_HEIGHT: usize = 480;
const FRAME_INTERVAL: Duration = Duration::from_millis(33); // ~30 fps
const FEED_FRAMES: usize = 90;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sampling_detection=info".into()),
        )
        .init();

    info!("Gold sample detector demo starting");

    let config = match DetectorConfig::load("config.yaml") {
        Ok(config) => {
            info!("Configuration loaded from config.yaml");
            config
        }
        Err(e) => {
            warn!("config.yaml not usable ({}), falling back to defaults", e);
            DetectorConfig::default()
        }
    };

    let window = config.vote.window;
    let detector = Arc::new(SamplingDetector::new(config));

    let feeder = Arc::clone(&detector);
    let feed_handle = thread::spawn(move || {
        let start = Instant::now();
        let mut definite_frames = 0usize;

        for n in 0..FEED_FRAMES {
            let mut frame = scene_frame(n);
            feeder.process_frame(&mut frame);
            if feeder.current_position() != GoldPosition::Unknown {
                definite_frames += 1;
            }
            thread::sleep(FRAME_INTERVAL);
        }

        let elapsed = start.elapsed().as_secs_f64();
        info!(
            "Feeder done: {} frames, {} with a definite estimate, {:.1} fps",
            FEED_FRAMES,
            definite_frames,
            FEED_FRAMES as f64 / elapsed
        );
    });

    let verdict = detector.vote_position(window);
    info!(
        "Majority vote over {} frames: {}",
        window,
        verdict.as_str()
    );

    feed_handle.join().ok();

    info!("Final sticky estimate: {}", detector.current_position().as_str());
    Ok(())
}

/// Synthetic sampling-field scene: two fixed silver squares and a gold
/// square that jitters slightly left of both, as the camera would see it
/// with the gold sample in the left position.
fn scene_frame(n: usize) -> Frame {
    let mut frame = Frame::new(FRAME_WIDTH, FRAME_HEIGHT);
    for i in 0..FRAME_WIDTH * FRAME_HEIGHT {
        frame.data[i * 3..i * 3 + 3].copy_from_slice(&[45, 45, 45]);
    }

    let jitter = n % 5;
    fill_square(&mut frame, 110 + jitter, 240, 70, [222, 178, 36]);
    fill_square(&mut frame, 320, 244, 44, [238, 238, 236]);
    fill_square(&mut frame, 500, 238, 44, [238, 238, 236]);
    frame
}

fn fill_square(frame: &mut Frame, cx: usize, cy: usize, side: usize, color: [u8; 3]) {
    let half = side / 2;
    for y in cy - half..cy - half + side {
        for x in cx - half..cx - half + side {
            let idx = (y * frame.width + x) * 3;
            frame.data[idx..idx + 3].copy_from_slice(&color);
        }
    }
}
