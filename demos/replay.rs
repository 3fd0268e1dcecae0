//! Replays a tracker dump through the speed estimator.
//!
//! Input is newline-delimited JSON, one frame per line:
//!
//! ```text
//! {"number": 1, "dims": [1280, 720], "tracks": [{"track_id": 3, "bbox": [400, 500, 480, 560]}]}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;
use gatespeed::bbox::{BBox, Ltwh};
use gatespeed::{EstimatorConfig, Frame, SpeedEstimator, SpeedTracking};

#[derive(Parser, Debug)]
#[command(about = "Estimate vehicle speeds from a tracker dump")]
struct Args {
    /// Newline-delimited JSON frames
    input: PathBuf,

    /// Scene config (JSON); built-in scene constants when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the object count for every frame
    #[arg(long)]
    count: bool,

    /// Boxes in the dump are left-top-width-height instead of left-top-right-bottom
    #[arg(long)]
    ltwh: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EstimatorConfig::from_json_file(path)?,
        None => EstimatorConfig::default(),
    };

    let mut estimator = SpeedEstimator::new(config)?;
    let reader = BufReader::new(File::open(&args.input)?);

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut frame: Frame = match serde_json::from_str(&line) {
            Ok(frame) => frame,
            Err(err) => {
                eprintln!("line {}: wrong file format: {}", lineno + 1, err);
                continue;
            }
        };

        if args.ltwh {
            for obj in &mut frame.tracks {
                obj.bbox = BBox::<Ltwh>::from(<[f32; 4]>::from(obj.bbox)).as_ltrb();
            }
        }

        let report = estimator.advance(&frame);

        if args.count {
            println!("frame {}: {} objects", report.frame, report.live_count);
        }

        if let Some(debug) = &report.debug {
            let c = debug.calibration;
            let t = debug.trigger;
            println!(
                "frame {}: track {} gate ({:.0},{:.0})-({:.0},{:.0}) trigger ({:.0},{:.0})-({:.0},{:.0})",
                report.frame,
                debug.track_id,
                c.from.x,
                c.from.y,
                c.to.x,
                c.to.y,
                t.from.x,
                t.from.y,
                t.to.x,
                t.to.y
            );
        }

        for s in &report.speeds {
            println!(
                "frame {}: track {} at ({:.0},{:.0}) speed {}",
                report.frame,
                s.track_id,
                s.anchor.x,
                s.anchor.y,
                s.display_kmh()
            );
        }
    }

    Ok(())
}
