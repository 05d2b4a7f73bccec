//! Position-quantized cache of built tier sets.
//!
//! Keys snap the observer to a coarse lat/lon grid and an altitude band. An
//! entry is served only while the observer is within the invalidation
//! distance (great-circle) of the position it was built at; otherwise it is
//! rebuilt in place. Capacity is bounded with oldest-insertion eviction.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use terraview_coords::{GeoCoord, QuantizedKey, quantize};
use terraview_terrain::{ColorSource, ElevationSource};
use tracing::{debug, warn};

use crate::builder::{MeshBuilder, TierSet};

/// Cache sizing and invalidation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshCacheConfig {
    /// Maximum number of stored tier sets.
    pub capacity: usize,
    /// Position grid step in kilometers.
    pub grid_km: f64,
    /// Altitude band height in meters.
    pub altitude_band_m: f64,
    /// Great-circle distance beyond which an entry is rebuilt, in kilometers.
    pub invalidation_km: f64,
}

impl Default for MeshCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 15,
            grid_km: 3.0,
            altitude_band_m: 100.0,
            invalidation_km: 1.25,
        }
    }
}

/// Counters exposed for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Entries discarded because they no longer matched the builder config.
    pub inconsistent: u64,
    pub len: usize,
}

/// Bounded cache of [`TierSet`]s keyed by quantized observer position.
pub struct MeshCache {
    config: MeshCacheConfig,
    entries: FxHashMap<QuantizedKey, TierSet>,
    order: VecDeque<QuantizedKey>,
    stats: CacheStats,
}

impl MeshCache {
    pub fn new(config: MeshCacheConfig) -> Self {
        Self {
            entries: FxHashMap::default(),
            order: VecDeque::with_capacity(config.capacity + 1),
            stats: CacheStats::default(),
            config,
        }
    }

    pub fn config(&self) -> &MeshCacheConfig {
        &self.config
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            len: self.entries.len(),
            ..self.stats
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn key_for(&self, coord: GeoCoord, altitude_m: f64) -> QuantizedKey {
        quantize(
            coord,
            altitude_m,
            self.config.grid_km,
            self.config.altitude_band_m,
        )
    }

    /// Return the tier set for the observer, building it on a miss.
    ///
    /// Hits return a copy so callers may annotate the lists freely.
    pub fn get_or_build<E, C>(
        &mut self,
        builder: &MeshBuilder<E, C>,
        coord: GeoCoord,
        altitude_m: f64,
    ) -> TierSet
    where
        E: ElevationSource,
        C: ColorSource,
    {
        let coord = coord.normalized();
        let key = self.key_for(coord, altitude_m);

        if let Some(entry) = self.entries.get(&key) {
            if entry.fingerprint != builder.fingerprint() {
                warn!(?key, "cached mesh does not match the current tier config, rebuilding");
                self.stats.inconsistent += 1;
                self.remove(&key);
            } else {
                let moved_km = entry.anchor.surface_distance_km(&coord);
                if moved_km < self.config.invalidation_km {
                    self.stats.hits += 1;
                    return entry.clone();
                }
                debug!(?key, moved_km, "observer left cached mesh, rebuilding");
                self.remove(&key);
            }
        }

        self.stats.misses += 1;
        let set = builder.build(coord, key.band_altitude_m());
        debug!(
            ?key,
            triangles = set.total_triangles(),
            radius_scale = set.radius_scale,
            "built terrain tiers"
        );
        self.insert(key, set.clone());
        set
    }

    fn insert(&mut self, key: QuantizedKey, set: TierSet) {
        self.entries.insert(key, set);
        self.order.push_back(key);
        while self.entries.len() > self.config.capacity.max(1) {
            match self.order.pop_front() {
                Some(oldest) => {
                    if self.entries.remove(&oldest).is_some() {
                        self.stats.evictions += 1;
                    }
                }
                None => break,
            }
        }
    }

    fn remove(&mut self, key: &QuantizedKey) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terraview_coords::KM_PER_DEGREE;
    use terraview_math::Rgb;
    use terraview_terrain::{FnColor, FnElevation, ProceduralPlanet, ProceduralPlanetParams};

    use crate::tier::{LodConfig, LodTier, TierConfig};

    fn small_config() -> LodConfig {
        let mut config = LodConfig::default();
        for (t, tier) in config.tiers.iter_mut().zip(LodTier::ALL) {
            *t = TierConfig::new(tier, 0.02 * (tier.index() + 1) as f64, 4);
        }
        config
    }

    #[test]
    fn test_repeat_build_is_identical() {
        let planet = ProceduralPlanet::new(ProceduralPlanetParams {
            seed: 11,
            ..Default::default()
        });
        let builder = MeshBuilder::new(&planet, &planet, LodConfig::default());
        let mut cache = MeshCache::new(MeshCacheConfig::default());

        let pos = GeoCoord::new(48.2, 16.37);
        let first = cache.get_or_build(&builder, pos, 1500.0);
        let second = cache.get_or_build(&builder, pos, 1500.0);

        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 1);
        for (a, b) in first.tiers.iter().zip(&second.tiers) {
            for (ta, tb) in a.land.iter().chain(a.sea.iter()).zip(b.land.iter().chain(b.sea.iter())) {
                for (va, vb) in ta.vertices.iter().zip(&tb.vertices) {
                    assert!((va.position - vb.position).length() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_small_move_hits() {
        let builder = MeshBuilder::new(
            FnElevation(|_: f64, _: f64| 10.0),
            FnColor(|_: f64, _: f64| Rgb::new(0, 128, 0)),
            small_config(),
        );
        let mut cache = MeshCache::new(MeshCacheConfig::default());
        let a = GeoCoord::new(0.0001, 0.0001);
        let b = GeoCoord::new(0.0001 + 0.3 / KM_PER_DEGREE, 0.0001);

        let first = cache.get_or_build(&builder, a, 0.0);
        let second = cache.get_or_build(&builder, b, 0.0);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(first.anchor, second.anchor, "hit should reuse the built anchor");
    }

    #[test]
    fn test_move_beyond_invalidation_rebuilds() {
        let builder = MeshBuilder::new(
            FnElevation(|_: f64, _: f64| 10.0),
            FnColor(|_: f64, _: f64| Rgb::new(0, 128, 0)),
            small_config(),
        );
        let mut cache = MeshCache::new(MeshCacheConfig::default());
        let a = GeoCoord::new(0.0, 0.0);
        let b = GeoCoord::new(20.0 / KM_PER_DEGREE, 0.0);

        cache.get_or_build(&builder, a, 0.0);
        let moved = cache.get_or_build(&builder, b, 0.0);
        assert_eq!(cache.stats().misses, 2);
        assert!((moved.anchor.lat - b.lat).abs() < 1e-12);
    }

    #[test]
    fn test_altitude_band_change_misses() {
        let builder = MeshBuilder::new(
            FnElevation(|_: f64, _: f64| 10.0),
            FnColor(|_: f64, _: f64| Rgb::new(0, 128, 0)),
            small_config(),
        );
        let mut cache = MeshCache::new(MeshCacheConfig::default());
        let p = GeoCoord::new(5.0, 5.0);
        cache.get_or_build(&builder, p, 1000.0);
        cache.get_or_build(&builder, p, 1030.0);
        assert_eq!(cache.stats().hits, 1, "same 100 m band");
        cache.get_or_build(&builder, p, 1400.0);
        assert_eq!(cache.stats().misses, 2, "new band");
    }

    #[test]
    fn test_oldest_entry_evicted() {
        let builder = MeshBuilder::new(
            FnElevation(|_: f64, _: f64| 10.0),
            FnColor(|_: f64, _: f64| Rgb::new(0, 128, 0)),
            small_config(),
        );
        let mut cache = MeshCache::new(MeshCacheConfig {
            capacity: 3,
            ..Default::default()
        });
        let positions: Vec<GeoCoord> = (0..5).map(|i| GeoCoord::new(0.0, i as f64)).collect();
        for p in &positions {
            cache.get_or_build(&builder, *p, 0.0);
        }
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions, 2);

        // The first position was evicted, the last is still cached.
        cache.get_or_build(&builder, positions[4], 0.0);
        assert_eq!(cache.stats().hits, 1);
        cache.get_or_build(&builder, positions[0], 0.0);
        assert_eq!(cache.stats().misses, 6);
    }

    #[test]
    fn test_config_change_forces_rebuild() {
        let elevation = FnElevation(|_: f64, _: f64| 10.0);
        let color = FnColor(|_: f64, _: f64| Rgb::new(0, 128, 0));
        let builder = MeshBuilder::new(&elevation, &color, small_config());
        let mut cache = MeshCache::new(MeshCacheConfig::default());
        let p = GeoCoord::new(1.0, 1.0);
        cache.get_or_build(&builder, p, 0.0);

        let mut changed = small_config();
        changed.tier_mut(LodTier::Ultra).resolution = 6;
        let rebuilt_with = MeshBuilder::new(&elevation, &color, changed);
        let set = cache.get_or_build(&rebuilt_with, p, 0.0);

        assert_eq!(cache.stats().inconsistent, 1);
        assert_eq!(set.tier(LodTier::Ultra).total(), 6 * 6 * 2);
        assert_eq!(cache.len(), 1);
    }
}
