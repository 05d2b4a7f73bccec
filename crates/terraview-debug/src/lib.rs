//! Terrain diagnostics for the running engine.
//!
//! A [`TerrainDiagnostics`] snapshot is assembled once per frame and handed
//! to a [`DiagnosticsSink`]. Sinks decide what to do with it: log it, keep it
//! for inspection, or drop it.

mod sink;

pub use sink::{DiagnosticsSink, MemorySink, NullSink, TracingSink};

#[cfg(test)]
mod tests;

use serde::Serialize;
use terraview_coords::GeoCoord;
use terraview_lod::{CacheStats, LodConfig, LodTier, TierSet};
use terraview_render::RenderStats;

/// Triangle counts and grid parameters for one tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierDiagnostics {
    pub tier: LodTier,
    pub land: usize,
    pub sea: usize,
    pub total: usize,
    pub resolution: u32,
    /// Angular radius after altitude scaling.
    pub angular_radius_deg: f64,
}

/// Everything worth knowing about one rendered frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TerrainDiagnostics {
    pub frame: u64,
    /// Human-readable observer position (e.g. "46.50°N, 8.00°E, 2500m").
    pub observer: String,
    pub tiers: Vec<TierDiagnostics>,
    pub total_triangles: usize,
    pub vertical_scale: f64,
    pub horizontal_scale: f64,
    pub sea_level_m: f64,
    pub radius_scale: f64,
    pub cache: CacheStats,
    pub sun_elevation_deg: f64,
    pub sun_azimuth_deg: f64,
    pub day_factor: f64,
    pub render: RenderStats,
}

impl TerrainDiagnostics {
    /// Snapshot the mesh-side state. Sun and render fields are left at their
    /// defaults for the caller to fill in.
    pub fn from_mesh(frame: u64, tiers: &TierSet, lod: &LodConfig, cache: CacheStats) -> Self {
        let tier_rows = tiers
            .tiers
            .iter()
            .map(|mesh| {
                let config = lod.tier(mesh.tier);
                TierDiagnostics {
                    tier: mesh.tier,
                    land: mesh.land.len(),
                    sea: mesh.sea.len(),
                    total: mesh.total(),
                    resolution: config.resolution,
                    angular_radius_deg: config.angular_radius_deg * tiers.radius_scale,
                }
            })
            .collect();

        Self {
            frame,
            observer: format_position(tiers.anchor, tiers.altitude_m),
            tiers: tier_rows,
            total_triangles: tiers.total_triangles(),
            vertical_scale: lod.vertical_scale,
            horizontal_scale: lod.horizontal_scale,
            sea_level_m: lod.sea_level_m,
            radius_scale: tiers.radius_scale,
            cache,
            ..Default::default()
        }
    }

    pub fn tier(&self, tier: LodTier) -> Option<&TierDiagnostics> {
        self.tiers.iter().find(|t| t.tier == tier)
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Format a position as "lat°N/S, lon°E/W, altm".
pub fn format_position(coord: GeoCoord, altitude_m: f64) -> String {
    let ns = if coord.lat >= 0.0 { 'N' } else { 'S' };
    let ew = if coord.lon >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.2}°{}, {:.2}°{}, {:.0}m",
        coord.lat.abs(),
        ns,
        coord.lon.abs(),
        ew,
        altitude_m
    )
}
