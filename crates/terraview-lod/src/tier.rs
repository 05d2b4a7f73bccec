//! The five LOD tiers and their configuration.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use terraview_coords::DEFAULT_LATITUDE_CROSSOVER;

/// A mesh resolution band. Finer tiers cover smaller areas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LodTier {
    Ultra,
    Inner,
    Mid,
    Outer,
    Horizon,
}

impl LodTier {
    /// All tiers, finest first.
    pub const ALL: [LodTier; 5] = [
        LodTier::Ultra,
        LodTier::Inner,
        LodTier::Mid,
        LodTier::Outer,
        LodTier::Horizon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LodTier::Ultra => "ultra",
            LodTier::Inner => "inner",
            LodTier::Mid => "mid",
            LodTier::Outer => "outer",
            LodTier::Horizon => "horizon",
        }
    }

    /// Draw-order rank. Higher values draw later and therefore on top.
    /// Rank 0 is reserved for the sun.
    pub fn layer_priority(self) -> u8 {
        match self {
            LodTier::Horizon => 1,
            LodTier::Outer => 2,
            LodTier::Mid => 3,
            LodTier::Inner => 4,
            LodTier::Ultra => 5,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Geometry and culling parameters for one tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    pub tier: LodTier,
    /// Half-width of the square grid, in degrees of arc.
    pub angular_radius_deg: f64,
    /// Cells per side. The grid has `(resolution + 1)²` vertices.
    pub resolution: u32,
    /// Render-time cutoff distance in kilometers. `None` disables culling.
    pub max_distance_km: Option<f64>,
    /// Sample elevation with area averaging over the cell footprint.
    pub filtered: bool,
    /// Corners above sea level needed to call a cell land.
    pub min_land_corners: u8,
}

impl TierConfig {
    pub fn new(tier: LodTier, angular_radius_deg: f64, resolution: u32) -> Self {
        Self {
            tier,
            angular_radius_deg,
            resolution: resolution.max(1),
            max_distance_km: None,
            filtered: false,
            min_land_corners: 2,
        }
    }

    pub fn with_max_distance(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    pub fn filtered(mut self, filtered: bool) -> Self {
        self.filtered = filtered;
        self
    }
}

/// Configuration shared by all tiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Per-tier settings, indexed by [`LodTier::index`].
    pub tiers: [TierConfig; 5],
    /// Elevation separating land from sea, in meters.
    pub sea_level_m: f64,
    /// Exaggeration applied to heights.
    pub vertical_scale: f64,
    /// Scale applied to east/north offsets.
    pub horizontal_scale: f64,
    /// Latitude above which grid offsets use spherical trigonometry.
    pub latitude_crossover_deg: f64,
    /// Fractional growth of every tier radius per kilometer of altitude.
    pub altitude_radius_growth_per_km: f64,
    /// Upper bound on the altitude radius factor.
    pub max_radius_scale: f64,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            tiers: [
                TierConfig::new(LodTier::Ultra, 0.04, 20),
                TierConfig::new(LodTier::Inner, 0.15, 28).with_max_distance(20.0),
                TierConfig::new(LodTier::Mid, 0.45, 28).with_max_distance(50.0),
                TierConfig::new(LodTier::Outer, 1.1, 24)
                    .with_max_distance(120.0)
                    .filtered(true),
                TierConfig::new(LodTier::Horizon, 1.9, 20)
                    .with_max_distance(200.0)
                    .filtered(true),
            ],
            sea_level_m: 0.0,
            vertical_scale: 1.0,
            horizontal_scale: 1.0,
            latitude_crossover_deg: DEFAULT_LATITUDE_CROSSOVER,
            altitude_radius_growth_per_km: 0.05,
            max_radius_scale: 2.0,
        }
    }
}

impl LodConfig {
    pub fn tier(&self, tier: LodTier) -> &TierConfig {
        &self.tiers[tier.index()]
    }

    pub fn tier_mut(&mut self, tier: LodTier) -> &mut TierConfig {
        &mut self.tiers[tier.index()]
    }

    /// Tier radius multiplier for an observer at `altitude_m`.
    pub fn radius_scale(&self, altitude_m: f64) -> f64 {
        let alt_km = (altitude_m / 1000.0).max(0.0);
        (1.0 + alt_km * self.altitude_radius_growth_per_km).clamp(1.0, self.max_radius_scale.max(1.0))
    }

    /// Hash of every parameter that affects mesh geometry. Cached meshes with
    /// a different fingerprint are stale.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = rustc_hash::FxHasher::default();
        for t in &self.tiers {
            t.tier.hash(&mut hasher);
            t.angular_radius_deg.to_bits().hash(&mut hasher);
            t.resolution.hash(&mut hasher);
            t.filtered.hash(&mut hasher);
            t.min_land_corners.hash(&mut hasher);
        }
        self.sea_level_m.to_bits().hash(&mut hasher);
        self.vertical_scale.to_bits().hash(&mut hasher);
        self.horizontal_scale.to_bits().hash(&mut hasher);
        self.latitude_crossover_deg.to_bits().hash(&mut hasher);
        self.altitude_radius_growth_per_km.to_bits().hash(&mut hasher);
        self.max_radius_scale.to_bits().hash(&mut hasher);
        hasher.finish()
    }
}
