//! `flatmol` command-line renderer.
//!
//! ```text
//! flatmol [SESSION.json | -] [OUT_DIR] [OPTIONS.toml]
//! ```
//!
//! Restores a saved session (or builds a small jittering demo trajectory
//! when none is given or the session is `-`) and records every frame of the
//! selected object as numbered SVG files in `OUT_DIR` (default
//! `flatmol_frames`). An options file overrides the session's options.

use std::path::{Path, PathBuf};

use flatmol::capture::SvgSequenceCapture;
use flatmol::options::Options;
use flatmol::trajectory::{FramePayload, PositionKind};
use flatmol::{FlatmolError, Viewer};
use rand::Rng;
use web_time::Instant;

const DEFAULT_OUT_DIR: &str = "flatmol_frames";
const DEMO_FRAMES: usize = 24;
const DEMO_HELIX_LENGTH: usize = 40;

/// Alpha helix along Z followed by a six-membered ligand ring, with random
/// thermal jitter.
fn demo_frame(rng: &mut impl Rng, step: usize, confidences: &[f32]) -> FramePayload {
    let breathe = (step as f32 / DEMO_FRAMES as f32 * std::f32::consts::TAU).sin();
    let mut coordinates = Vec::with_capacity(DEMO_HELIX_LENGTH + 6);
    let mut chain_labels = Vec::with_capacity(DEMO_HELIX_LENGTH + 6);
    let mut categories = Vec::with_capacity(DEMO_HELIX_LENGTH + 6);

    for i in 0..DEMO_HELIX_LENGTH {
        let t = i as f32 * 100f32.to_radians();
        let radius = 2.3 + 0.2 * breathe;
        coordinates.push([
            radius * t.cos() + rng.random_range(-0.15..0.15),
            radius * t.sin() + rng.random_range(-0.15..0.15),
            1.5 * i as f32 - 30.0,
        ]);
        chain_labels.push("A".to_owned());
        categories.push(PositionKind::Backbone);
    }
    for k in 0..6 {
        let a = k as f32 * std::f32::consts::FRAC_PI_3;
        coordinates.push([
            8.0 + 1.39 * a.cos() + rng.random_range(-0.05..0.05),
            1.39 * a.sin() + rng.random_range(-0.05..0.05),
            breathe,
        ]);
        chain_labels.push("L".to_owned());
        categories.push(PositionKind::Ligand);
    }

    let mut confidences = confidences.to_vec();
    confidences.resize(coordinates.len(), 90.0);
    FramePayload {
        coordinates,
        confidences: Some(confidences),
        chain_labels: Some(chain_labels),
        categories: Some(categories),
        ..FramePayload::default()
    }
}

fn load_demo(viewer: &mut Viewer) -> Result<(), FlatmolError> {
    let mut rng = rand::rng();
    let confidences: Vec<f32> = (0..DEMO_HELIX_LENGTH)
        .map(|_| rng.random_range(40.0..95.0))
        .collect();
    viewer.new_object("demo")?;
    for step in 0..DEMO_FRAMES {
        let _ = viewer.append_frame("demo", demo_frame(&mut rng, step, &confidences), true)?;
    }
    log::info!("built demo trajectory with {DEMO_FRAMES} frames");
    Ok(())
}

fn record(viewer: &mut Viewer, out_dir: &Path) -> Result<(), FlatmolError> {
    viewer.start_recording(Box::new(SvgSequenceCapture::new(out_dir)))?;
    while viewer.playback().is_recording() {
        let _ = viewer.tick(Instant::now())?;
    }
    log::info!("wrote frames to {}", out_dir.display());
    Ok(())
}

fn run() -> Result<(), FlatmolError> {
    let mut args = std::env::args().skip(1);
    let session = args.next();
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUT_DIR.to_owned()));
    let options = args
        .next()
        .map(|path| Options::load(Path::new(&path)))
        .transpose()?;

    let mut viewer = Viewer::new(options.clone().unwrap_or_default());
    match session.as_deref() {
        Some(path) if path != "-" => {
            log::info!("loading session {path}");
            viewer.load_session(Path::new(path))?;
            if let Some(options) = options {
                viewer.set_options(options);
            }
        }
        _ => load_demo(&mut viewer)?,
    }
    record(&mut viewer, &out_dir)
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
