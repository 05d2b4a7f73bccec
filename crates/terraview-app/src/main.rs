//! Batch renderer: flies a straight line over a procedural planet and writes
//! each frame as a PNG.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use terraview_app::{AppDirs, AppError, FrameReport, FrameTime, ScriptedFlight, TerrainView};
use terraview_app::{frame_file_name, write_png};
use terraview_config::{CliArgs, Config};
use terraview_debug::{TerrainDiagnostics, TracingSink};
use terraview_lod::CacheStats;
use terraview_planet::SimClock;
use terraview_render::{Framebuffer, ObserverPose, ViewControl};
use terraview_terrain::ProceduralPlanet;
use tracing::info;

#[derive(Serialize)]
struct FrameSummary {
    frame: u64,
    lat: f64,
    lon: f64,
    triangles: usize,
    drawn: usize,
    sun_elevation_deg: f64,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    output_dir: &'a Path,
    cache: CacheStats,
    frames: Vec<FrameSummary>,
    last: Option<&'a TerrainDiagnostics>,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("terraview: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let dirs = match &args.config {
        Some(dir) => AppDirs::resolve_with_root(dir),
        None => AppDirs::resolve()?,
    };
    dirs.create_all()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);
    terraview_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!(config_dir = %dirs.config_dir.display(), frames = config.debug.frames, "starting terraview");

    let planet = ProceduralPlanet::new(config.planet.clone());
    let sink = TracingSink::new(config.debug.diagnostics_every_n_frames);
    let mut view = TerrainView::from_config(&planet, &planet, &config, sink);

    let mut clock = SimClock::new(
        config.clock.start_utc_hours,
        config.clock.day_of_year,
        config.clock.time_scale,
    );
    let mut pose = ObserverPose {
        lat: config.observer.lat,
        lon: config.observer.lon,
        altitude_m: config.observer.altitude_m,
        heading_deg: config.observer.heading_deg,
        pitch_deg: config.observer.pitch_deg,
    };
    let mut flight = ScriptedFlight::new(pose, config.observer.speed_m_s);
    let dt = config.observer.frame_interval_s.max(0.0);

    let mut fb = Framebuffer::new(config.window.width.max(1), config.window.height.max(1));
    let viewport = fb.full_viewport();
    let mut reports: Vec<FrameReport> = Vec::with_capacity(config.debug.frames as usize);

    for _ in 0..config.debug.frames {
        let report = view.frame(
            &pose,
            &ViewControl::default(),
            FrameTime::from(&clock),
            &mut fb,
            viewport,
        );
        let path = config.debug.output_dir.join(frame_file_name(report.frame));
        write_png(&path, &fb)?;
        info!(
            frame = report.frame,
            path = %path.display(),
            drawn = report.render.drawn(),
            "wrote frame"
        );
        reports.push(report);

        clock.tick(dt);
        pose = flight.advance(dt);
    }

    let summary = RunSummary {
        output_dir: &config.debug.output_dir,
        cache: view.cache().stats(),
        frames: reports
            .iter()
            .map(|r| FrameSummary {
                frame: r.frame,
                lat: r.mesh_anchor.lat,
                lon: r.mesh_anchor.lon,
                triangles: r.triangles,
                drawn: r.render.drawn(),
                sun_elevation_deg: r.sun_elevation_deg,
            })
            .collect(),
        last: reports.last().map(|r| &r.diagnostics),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
