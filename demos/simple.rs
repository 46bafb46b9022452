//! Feeds a synthetic depth stream through the tracker and reports the first
//! time each joint is found.
//!
//! The stream imitates a 640x480 depth camera looking at a person who slowly
//! raises both arms. Run with `RUST_LOG=debug` to see per-frame output.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use skeltrack::depth;
use skeltrack::{JointId, Tracker};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;
const THRESHOLD_BEGIN: u16 = 50;
const THRESHOLD_END: u16 = 1500;
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Depth image of a person facing the sensor at about 1.1m, with a wall far
/// behind. `lift` in [0, 1] raises the arms from the hips to shoulder level.
fn synthetic_frame(lift: f32) -> Vec<u16> {
    let mut frame = vec![3000u16; WIDTH * HEIGHT];

    let mut fill = |x0: i32, y0: i32, x1: i32, y1: i32, z: u16| {
        for y in y0.max(0)..y1.min(HEIGHT as i32) {
            for x in x0.max(0)..x1.min(WIDTH as i32) {
                frame[y as usize * WIDTH + x as usize] = z;
            }
        }
    };

    fill(300, 40, 340, 120, 1080); // head
    fill(250, 120, 390, 420, 1100); // trunk

    let shoulder_y = 130;
    let arm_len = 200.0;
    let angle = (1.0 - lift.clamp(0.0, 1.0)) * std::f32::consts::FRAC_PI_2;

    for step in 0..40 {
        let t = step as f32 / 40.0 * arm_len;
        let dx = (t * angle.cos()) as i32;
        let dy = (t * angle.sin()) as i32;

        fill(230 - dx, shoulder_y + dy, 250 - dx, shoulder_y + dy + 24, 1090);
        fill(390 + dx, shoulder_y + dy, 410 + dx, shoulder_y + dy + 24, 1090);
    }

    frame
}

fn main() -> Result<(), skeltrack::Error> {
    env_logger::init();

    let mut tracker = Tracker::default();
    let mut found = BTreeSet::new();
    let mut frames = 0usize;

    let start = Instant::now();

    while start.elapsed() < Duration::from_secs(10) && found.len() < JointId::ALL.len() {
        let lift = (frames as f32 / 60.0).min(1.0);
        let mut depth = synthetic_frame(lift);

        // drop background and sensor noise
        depth::threshold(&mut depth, THRESHOLD_BEGIN..=THRESHOLD_END);

        let joints = tracker.track_joints(&depth, WIDTH, HEIGHT)?;
        frames += 1;

        for (id, joint) in &joints {
            if found.insert(*id) {
                let (x, y, z) = joint.coords();
                println!("Found joint {} at ({}, {}, {}) mm", id, x, y, z);
            }
        }

        if found.len() == JointId::ALL.len() {
            println!("Found all joints!");
        }

        std::thread::sleep(FRAME_INTERVAL);
    }

    println!(
        "Processed {} frames in {:.2} seconds.",
        frames,
        start.elapsed().as_secs_f32()
    );

    Ok(())
}
