//! Per-frame orchestration.

use serde::Serialize;
use terraview_config::Config;
use terraview_coords::GeoCoord;
use terraview_debug::{DiagnosticsSink, TerrainDiagnostics};
use terraview_lod::{LodConfig, MeshBuilder, MeshCache, MeshCacheConfig};
use terraview_planet::{SimClock, SunConfig, SunModel};
use terraview_render::{
    Framebuffer, ObserverPose, RenderConfig, RenderInputs, RenderStats, Renderer, ViewControl,
    Viewport, camera_for_pose,
};
use terraview_terrain::{ColorSource, ElevationSource};
use tracing::debug_span;

/// Simulation time for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub utc_hours: f64,
    pub day_of_year: u32,
    /// Monotonic simulation seconds, used to gate sun regeneration.
    pub sim_seconds: f64,
}

impl From<&SimClock> for FrameTime {
    fn from(clock: &SimClock) -> Self {
        Self {
            utc_hours: clock.utc_hours,
            day_of_year: clock.day_of_year,
            sim_seconds: clock.elapsed_seconds(),
        }
    }
}

/// Summary of one rendered frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub mesh_anchor: GeoCoord,
    pub triangles: usize,
    pub render: RenderStats,
    pub sun_elevation_deg: f64,
    pub day_factor: f64,
    pub diagnostics: TerrainDiagnostics,
}

/// Owns everything needed to turn an observer pose into pixels.
pub struct TerrainView<E, C, S> {
    builder: MeshBuilder<E, C>,
    cache: MeshCache,
    sun: SunModel,
    renderer: Renderer,
    sink: S,
    frame: u64,
}

impl<E, C, S> TerrainView<E, C, S>
where
    E: ElevationSource,
    C: ColorSource,
    S: DiagnosticsSink,
{
    pub fn new(
        builder: MeshBuilder<E, C>,
        cache: MeshCacheConfig,
        sun: SunConfig,
        render: RenderConfig,
        sink: S,
    ) -> Self {
        Self {
            builder,
            cache: MeshCache::new(cache),
            sun: SunModel::new(sun),
            renderer: Renderer::new(render),
            sink,
            frame: 0,
        }
    }

    /// Build a view from the terrain, cache, sun and render sections of `config`.
    pub fn from_config(elevation: E, color: C, config: &Config, sink: S) -> Self {
        Self::new(
            MeshBuilder::new(elevation, color, config.terrain.clone()),
            config.cache.clone(),
            config.sun.clone(),
            config.render.clone(),
            sink,
        )
    }

    pub fn lod_config(&self) -> &LodConfig {
        self.builder.config()
    }

    pub fn cache(&self) -> &MeshCache {
        &self.cache
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frame
    }

    /// Render one frame for `pose` into `viewport` of `fb`.
    pub fn frame(
        &mut self,
        pose: &ObserverPose,
        view: &ViewControl,
        time: FrameTime,
        fb: &mut Framebuffer,
        viewport: Viewport,
    ) -> FrameReport {
        let span = debug_span!("frame", frame = self.frame);
        let _enter = span.enter();

        let observer = pose.geo();
        let tiers = self
            .cache
            .get_or_build(&self.builder, observer, pose.altitude_m);

        let mut camera = camera_for_pose(tiers.anchor, pose, view, self.builder.config());
        self.renderer.configure_camera(&mut camera);

        let sun = self
            .sun
            .update(observer, time.utc_hours, time.day_of_year, time.sim_seconds);
        let (light_dir, day_factor) = (sun.direction, sun.day_factor);
        let (sun_elevation_deg, sun_azimuth_deg) = (sun.elevation_deg, sun.azimuth_deg);
        let sun_triangles = self.sun.triangles(camera.position());

        let inputs = RenderInputs {
            tiers: &tiers,
            sun: &sun_triangles,
            camera: &camera,
            lod: self.builder.config(),
            light_dir,
            day_factor,
        };
        let render = self.renderer.render_frame(&inputs, fb, viewport);

        let mut diagnostics = TerrainDiagnostics::from_mesh(
            self.frame,
            &tiers,
            self.builder.config(),
            self.cache.stats(),
        );
        diagnostics.sun_elevation_deg = sun_elevation_deg;
        diagnostics.sun_azimuth_deg = sun_azimuth_deg;
        diagnostics.day_factor = day_factor;
        diagnostics.render = render;
        self.sink.record(&diagnostics);

        let report = FrameReport {
            frame: self.frame,
            mesh_anchor: tiers.anchor,
            triangles: tiers.total_triangles(),
            render,
            sun_elevation_deg,
            day_factor,
            diagnostics,
        };
        self.frame += 1;
        report
    }
}
