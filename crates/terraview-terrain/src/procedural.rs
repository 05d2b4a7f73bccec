//! Seeded procedural planet: multi-octave fBm over the unit sphere.
//!
//! Sampling in 3D sphere coordinates avoids a longitude seam and pole pinching.
//! Every octave doubles the frequency and halves the amplitude, so features
//! appear at continental scale down to a few kilometers.

use glam::DVec3;
use noise::{NoiseFn, Simplex};
use serde::{Deserialize, Serialize};
use terraview_coords::{clamp_latitude, wrap_longitude};
use terraview_math::Rgb;

use crate::palette::elevation_color;
use crate::source::{ColorSource, ElevationSource};

/// Configuration for the procedural planet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProceduralPlanetParams {
    /// World seed for deterministic generation.
    pub seed: u32,
    /// Number of noise octaves to composite.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency of the first octave, in cycles per unit-sphere radius.
    pub base_frequency: f64,
    /// Lowest elevation produced, in meters.
    pub min_height_m: f64,
    /// Highest elevation produced, in meters.
    pub max_height_m: f64,
    /// Sea level used for coloring, in meters.
    pub sea_level_m: f64,
}

impl Default for ProceduralPlanetParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 12,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 1.5,
            min_height_m: -5_000.0,
            max_height_m: 5_000.0,
            sea_level_m: 0.0,
        }
    }
}

/// A deterministic planet usable as both elevation and color source.
pub struct ProceduralPlanet {
    noise: Simplex,
    params: ProceduralPlanetParams,
    max_amplitude: f64,
}

impl ProceduralPlanet {
    pub fn new(params: ProceduralPlanetParams) -> Self {
        let noise = Simplex::new(params.seed);
        let mut max_amplitude = 0.0;
        let mut amp = 1.0;
        for _ in 0..params.octaves {
            max_amplitude += amp;
            amp *= params.persistence;
        }
        Self {
            noise,
            params,
            max_amplitude,
        }
    }

    pub fn params(&self) -> &ProceduralPlanetParams {
        &self.params
    }

    /// Raw fBm value in `[-max_amplitude, max_amplitude]` at a unit-sphere point.
    fn fbm(&self, point: DVec3) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = 1.0;

        for _ in 0..self.params.octaves {
            let p = point * frequency;
            total += self.noise.get([p.x, p.y, p.z]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        total
    }
}

fn unit_sphere_point(lat: f64, lon: f64) -> DVec3 {
    let lat = clamp_latitude(lat).to_radians();
    let lon = wrap_longitude(lon).to_radians();
    DVec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

impl ElevationSource for ProceduralPlanet {
    fn height_at(&self, lat: f64, lon: f64) -> f64 {
        let (min, max) = (self.params.min_height_m, self.params.max_height_m);
        if self.max_amplitude == 0.0 {
            return (min + max) * 0.5;
        }
        let raw = self.fbm(unit_sphere_point(lat, lon));
        let normalized = ((raw / self.max_amplitude + 1.0) * 0.5).clamp(0.0, 1.0);
        min + normalized * (max - min)
    }
}

impl ColorSource for ProceduralPlanet {
    fn color_at(&self, lat: f64, lon: f64) -> Rgb {
        let h = self.height_at(lat, lon);
        let base = elevation_color(h, self.params.sea_level_m);
        // Polar land whitens toward ice caps.
        let polar = ((lat.abs() - 65.0) / 15.0).clamp(0.0, 1.0);
        if h > self.params.sea_level_m && polar > 0.0 {
            base.lerp(Rgb::new(235, 240, 245), polar)
        } else {
            base
        }
    }
}
