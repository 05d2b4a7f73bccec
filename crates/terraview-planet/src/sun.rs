//! The sun as renderable geometry.
//!
//! When the sun is above the horizon it is drawn as a flat twelve-sided
//! polygon placed at a fixed distance along the sun direction, always facing
//! the observer. Geometry is kept relative to the eye and only regenerated
//! after a refresh interval, since the apparent position barely moves between
//! frames.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use terraview_coords::GeoCoord;
use terraview_math::{Rgb, TerrainTriangle, TerrainVertex, TriangleList};
use tracing::trace;

use crate::solar::{day_factor, horizon_coordinates, subsolar_point, sun_color, sun_direction_enu};

/// Number of rim segments of the sun polygon.
pub const SUN_SEGMENTS: usize = 12;

/// Sun rendering parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunConfig {
    /// Distance from the eye to the polygon center, in world units.
    pub distance: f64,
    /// Apparent angular radius in degrees. Larger than the real sun so it
    /// reads at small viewport sizes.
    pub angular_radius_deg: f64,
    /// Simulated seconds between regenerations.
    pub refresh_interval_s: f64,
    /// Observer movement that forces a regeneration, in kilometers.
    pub max_observer_shift_km: f64,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            distance: 900.0,
            angular_radius_deg: 2.0,
            refresh_interval_s: 300.0,
            max_observer_shift_km: 50.0,
        }
    }
}

/// The most recently computed sun position and geometry.
#[derive(Clone, Debug)]
pub struct SunState {
    pub subsolar: GeoCoord,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    /// Unit vector toward the sun in the local ENU frame.
    pub direction: DVec3,
    /// Day/night shading term in `[0, 1]`.
    pub day_factor: f64,
    pub color: Rgb,
    /// Observer the state was computed for.
    pub observer: GeoCoord,
    /// Simulation time of the last regeneration, in seconds.
    pub generated_at: Option<f64>,
    /// Eye-relative polygon triangles. Empty below the horizon.
    pub triangles: Vec<TerrainTriangle>,
}

impl SunState {
    pub fn is_visible(&self) -> bool {
        self.elevation_deg > 0.0
    }
}

impl Default for SunState {
    fn default() -> Self {
        Self {
            subsolar: GeoCoord::new(0.0, 0.0),
            elevation_deg: 0.0,
            azimuth_deg: 0.0,
            direction: DVec3::Z,
            day_factor: 0.0,
            color: Rgb::WHITE,
            observer: GeoCoord::new(0.0, 0.0),
            generated_at: None,
            triangles: Vec::new(),
        }
    }
}

/// Computes and caches the sun state.
pub struct SunModel {
    config: SunConfig,
    state: SunState,
}

impl SunModel {
    pub fn new(config: SunConfig) -> Self {
        Self {
            config,
            state: SunState::default(),
        }
    }

    pub fn config(&self) -> &SunConfig {
        &self.config
    }

    pub fn state(&self) -> &SunState {
        &self.state
    }

    /// Refresh the sun for `observer` at the given UTC time if the cached
    /// state is older than the refresh interval or the observer moved far.
    ///
    /// `now_s` is a monotonic simulation time in seconds.
    pub fn update(
        &mut self,
        observer: GeoCoord,
        utc_hours: f64,
        day_of_year: u32,
        now_s: f64,
    ) -> &SunState {
        if self.needs_refresh(observer, now_s) {
            self.regenerate(observer, utc_hours, day_of_year, now_s);
        }
        &self.state
    }

    /// Drop the cached state so the next update regenerates.
    pub fn invalidate(&mut self) {
        self.state.generated_at = None;
    }

    fn needs_refresh(&self, observer: GeoCoord, now_s: f64) -> bool {
        match self.state.generated_at {
            None => true,
            Some(at) => {
                now_s < at
                    || now_s - at >= self.config.refresh_interval_s
                    || self.state.observer.surface_distance_km(&observer)
                        > self.config.max_observer_shift_km
            }
        }
    }

    fn regenerate(&mut self, observer: GeoCoord, utc_hours: f64, day_of_year: u32, now_s: f64) {
        let subsolar = subsolar_point(utc_hours, day_of_year);
        let (elevation_deg, azimuth_deg) = horizon_coordinates(observer, subsolar);
        let direction = sun_direction_enu(elevation_deg, azimuth_deg);
        let color = sun_color(elevation_deg);

        let triangles = if elevation_deg > 0.0 {
            sun_polygon(
                direction,
                self.config.distance,
                self.config.angular_radius_deg,
                color,
                subsolar,
            )
        } else {
            Vec::new()
        };

        trace!(
            elevation_deg,
            azimuth_deg,
            triangles = triangles.len(),
            "regenerated sun"
        );

        self.state = SunState {
            subsolar,
            elevation_deg,
            azimuth_deg,
            direction,
            day_factor: day_factor(elevation_deg),
            color,
            observer,
            generated_at: Some(now_s),
            triangles,
        };
    }

    /// Sun triangles translated to world space around `eye`.
    pub fn triangles(&self, eye: DVec3) -> TriangleList {
        let mut list = TriangleList::with_capacity(self.state.triangles.len());
        for tri in &self.state.triangles {
            list.push_if_valid(tri.translated(eye));
        }
        list
    }
}

/// Eye-relative triangle fan of a regular polygon facing back along `direction`.
pub fn sun_polygon(
    direction: DVec3,
    distance: f64,
    angular_radius_deg: f64,
    color: Rgb,
    subsolar: GeoCoord,
) -> Vec<TerrainTriangle> {
    let d = direction.normalize_or_zero();
    if d == DVec3::ZERO || distance <= 0.0 {
        return Vec::new();
    }

    let center = d * distance;
    let radius = distance * angular_radius_deg.to_radians().tan();
    let side = d.cross(DVec3::Z);
    let u = if side.length() < 1e-9 {
        DVec3::X
    } else {
        side.normalize()
    };
    // u × v = -d, so the fan winds toward the eye.
    let v = u.cross(d);

    let normal = -d;
    let vertex = |p: DVec3| TerrainVertex::new(p, normal, color, subsolar.lat, subsolar.lon);
    let rim: Vec<DVec3> = (0..SUN_SEGMENTS)
        .map(|k| {
            let theta = std::f64::consts::TAU * k as f64 / SUN_SEGMENTS as f64;
            center + (u * theta.cos() + v * theta.sin()) * radius
        })
        .collect();

    (0..SUN_SEGMENTS)
        .map(|k| {
            let next = (k + 1) % SUN_SEGMENTS;
            TerrainTriangle::new([vertex(center), vertex(rim[k]), vertex(rim[next])])
        })
        .collect()
}
