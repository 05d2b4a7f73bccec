//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Terrain viewer command-line arguments.
///
/// CLI values override settings loaded from the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "terraview", about = "Planet-scale software terrain renderer")]
pub struct CliArgs {
    /// Frame width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Frame height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Vertical field of view in degrees.
    #[arg(long)]
    pub fov: Option<f64>,

    /// Starting latitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Starting longitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Starting altitude above sea level in meters.
    #[arg(long)]
    pub altitude: Option<f64>,

    /// Heading in degrees clockwise from north.
    #[arg(long, allow_hyphen_values = true)]
    pub heading: Option<f64>,

    /// Number of frames to render.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory rendered frames are written to.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fov) = args.fov {
            self.render.fov_deg = fov;
        }
        if let Some(lat) = args.lat {
            self.observer.lat = lat;
        }
        if let Some(lon) = args.lon {
            self.observer.lon = lon;
        }
        if let Some(alt) = args.altitude {
            self.observer.altitude_m = alt;
        }
        if let Some(heading) = args.heading {
            self.observer.heading_deg = heading;
        }
        if let Some(frames) = args.frames {
            self.debug.frames = frames;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(ref dir) = args.output {
            self.debug.output_dir = dir.clone();
        }
    }
}
