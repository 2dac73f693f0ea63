//! Tilt sweep frame generator
//!
//! Renders a sequence of ideal-helix projections across a tilt range and
//! writes the normalized power spectrum of each frame as a PNG. Frames
//! are independent pure computations, so the sweep runs in parallel and
//! any failed item can be retried on its own.

use std::path::PathBuf;

use clap::Parser;
use image::{GrayImage, Luma};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;
use rayon::prelude::*;

use layerline::{fourier_resample, power_spectrum, simulate_helix, HelicalParameters};

#[derive(Parser, Debug)]
#[command(
    name = "tilt_sweep",
    about = "Generates power spectra of simulated helices across a tilt range"
)]
struct Args {
    /// Twist in degrees per rise step
    #[arg(long, default_value_t = 29.4)]
    twist: f64,

    /// Rise in Angstrom
    #[arg(long, default_value_t = 21.92)]
    rise: f64,

    /// Cyclic symmetry order
    #[arg(long, default_value_t = 6)]
    csym: u32,

    /// Helical radius in Angstrom
    #[arg(long, default_value_t = 69.0)]
    radius: f64,

    /// Gaussian ball radius in Angstrom
    #[arg(long, default_value_t = 10.0)]
    ball_radius: f64,

    /// Image size in pixels (square)
    #[arg(long, default_value_t = 256)]
    size: usize,

    /// Pixel size in Angstrom
    #[arg(long, default_value_t = 2.0)]
    apix: f64,

    /// First tilt of the sweep in degrees
    #[arg(long, default_value_t = 0.0)]
    tilt_start: f64,

    /// Last tilt of the sweep in degrees
    #[arg(long, default_value_t = 12.0)]
    tilt_end: f64,

    /// Number of frames
    #[arg(long, default_value_t = 25)]
    frames: usize,

    /// Resolution cutoff of the spectra in Angstrom
    #[arg(long, default_value_t = 4.0)]
    cutoff_res: f64,

    /// Low-pass fraction of Nyquist (0 disables)
    #[arg(long, default_value_t = 0.0)]
    low_pass: f64,

    /// High-pass fraction of Nyquist (0 disables)
    #[arg(long, default_value_t = 0.004)]
    high_pass: f64,

    /// Seed for the starting azimuth draw
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output directory for the PNG frames
    #[arg(long, default_value = "frames")]
    out_dir: PathBuf,
}

/// Convert a [0, 1] normalized grid to an 8-bit grayscale image.
fn array2_to_gray_image(arr: &Array2<f64>) -> GrayImage {
    let (height, width) = arr.dim();
    let mut img = GrayImage::new(width as u32, height as u32);
    for y in 0..height {
        for x in 0..width {
            let v = (arr[[y, x]].clamp(0.0, 1.0) * 255.0).round() as u8;
            img.put_pixel(x as u32, y as u32, Luma([v]));
        }
    }
    img
}

fn render_frame(args: &Args, tilt: f64) -> Result<Array2<f64>, String> {
    let params = HelicalParameters::new(args.twist, args.rise, args.csym, args.radius, tilt)
        .map_err(|e| e.to_string())?;
    let projection = simulate_helix(
        &params,
        args.ball_radius,
        args.size,
        args.size,
        args.apix,
        None,
        args.seed,
    );
    let cutoff = args.cutoff_res.max(2.0 * args.apix);
    let spectrum = fourier_resample(
        &projection,
        args.apix,
        (cutoff, cutoff),
        (args.size, args.size),
    )
    .map_err(|e| e.to_string())?;
    let (power, _) = power_spectrum(&spectrum, true, args.low_pass, args.high_pass);
    Ok(power)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = std::fs::create_dir_all(&args.out_dir) {
        eprintln!("cannot create {}: {e}", args.out_dir.display());
        std::process::exit(1);
    }

    let frames = args.frames.max(1);
    let tilt_step = if frames > 1 {
        (args.tilt_end - args.tilt_start) / (frames - 1) as f64
    } else {
        0.0
    };

    let bar = ProgressBar::new(frames as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} frames ({eta})")
            .expect("valid progress template"),
    );

    let failures: Vec<(usize, String)> = (0..frames)
        .into_par_iter()
        .filter_map(|i| {
            let tilt = args.tilt_start + tilt_step * i as f64;
            let result = render_frame(&args, tilt).and_then(|power| {
                let path = args.out_dir.join(format!("frame_{i:04}.png"));
                array2_to_gray_image(&power)
                    .save(&path)
                    .map_err(|e| e.to_string())
            });
            bar.inc(1);
            match result {
                Ok(()) => None,
                Err(e) => {
                    log::warn!("frame {i} (tilt {tilt:.2}) failed: {e}");
                    Some((i, e))
                }
            }
        })
        .collect();
    bar.finish();

    if failures.is_empty() {
        println!("{frames} frames written to {}", args.out_dir.display());
    } else {
        eprintln!("{} of {frames} frames failed:", failures.len());
        for (i, e) in &failures {
            eprintln!("  frame {i}: {e}");
        }
        std::process::exit(1);
    }
}
