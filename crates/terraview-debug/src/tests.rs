//! Unit tests for terrain diagnostics.

use crate::{DiagnosticsSink, MemorySink, NullSink, TerrainDiagnostics, TracingSink, format_position};
use terraview_coords::GeoCoord;
use terraview_lod::{CacheStats, LodConfig, LodTier, TierMesh, TierSet};

fn tier_set(radius_scale: f64) -> TierSet {
    TierSet {
        anchor: GeoCoord::new(-33.9, 151.2),
        altitude_m: 1200.0,
        radius_scale,
        fingerprint: 7,
        tiers: LodTier::ALL.iter().map(|&t| TierMesh::empty(t)).collect(),
    }
}

#[test]
fn test_diagnostics_default() {
    let d = TerrainDiagnostics::default();
    assert_eq!(d.frame, 0);
    assert!(d.tiers.is_empty());
    assert_eq!(d.render.drawn(), 0);
}

#[test]
fn test_from_mesh_reports_every_tier() {
    let lod = LodConfig::default();
    let cache = CacheStats {
        hits: 3,
        misses: 1,
        ..Default::default()
    };
    let d = TerrainDiagnostics::from_mesh(12, &tier_set(1.5), &lod, cache);
    assert_eq!(d.frame, 12);
    assert_eq!(d.tiers.len(), 5);
    assert_eq!(d.cache.hits, 3);
    assert_eq!(d.radius_scale, 1.5);

    let mid = d.tier(LodTier::Mid).unwrap();
    assert_eq!(mid.resolution, lod.tier(LodTier::Mid).resolution);
    assert!((mid.angular_radius_deg - lod.tier(LodTier::Mid).angular_radius_deg * 1.5).abs() < 1e-12);
}

#[test]
fn test_json_contains_tier_names() {
    let d = TerrainDiagnostics::from_mesh(1, &tier_set(1.0), &LodConfig::default(), CacheStats::default());
    let json = d.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["tiers"][0]["tier"], "Ultra");
    assert_eq!(value["tiers"][4]["tier"], "Horizon");
    assert_eq!(value["observer"], "33.90°S, 151.20°E, 1200m");
}

#[test]
fn test_format_position_hemispheres() {
    assert_eq!(format_position(GeoCoord::new(45.3, -122.1), 150.0), "45.30°N, 122.10°W, 150m");
    assert_eq!(format_position(GeoCoord::new(-1.0, 0.0), 0.0), "1.00°S, 0.00°E, 0m");
}

#[test]
fn test_memory_sink_keeps_last() {
    let mut sink = MemorySink::default();
    for frame in 0..3 {
        sink.record(&TerrainDiagnostics {
            frame,
            ..Default::default()
        });
    }
    assert_eq!(sink.count, 3);
    assert_eq!(sink.last.as_ref().map(|d| d.frame), Some(2));
}

#[test]
fn test_tracing_sink_throttles() {
    let mut sink = TracingSink::new(10);
    for frame in 0..25 {
        sink.record(&TerrainDiagnostics {
            frame,
            ..Default::default()
        });
    }
    // Frames 0, 10 and 20.
    assert_eq!(sink.recorded(), 3);
}

#[test]
fn test_sinks_are_object_safe() {
    let mut sinks: Vec<Box<dyn DiagnosticsSink>> = vec![Box::new(NullSink), Box::new(MemorySink::default())];
    for sink in &mut sinks {
        sink.record(&TerrainDiagnostics::default());
    }
}
