use tracing::debug;

use crate::TerrainDiagnostics;

/// Receives one diagnostics snapshot per frame.
pub trait DiagnosticsSink {
    fn record(&mut self, diagnostics: &TerrainDiagnostics);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&mut self, _diagnostics: &TerrainDiagnostics) {}
}

/// Logs a summary through `tracing` every `every_n_frames` frames.
#[derive(Debug, Clone)]
pub struct TracingSink {
    pub every_n_frames: u64,
    recorded: u64,
}

impl TracingSink {
    pub fn new(every_n_frames: u64) -> Self {
        Self {
            every_n_frames: every_n_frames.max(1),
            recorded: 0,
        }
    }

    /// Number of snapshots logged so far.
    pub fn recorded(&self) -> u64 {
        self.recorded
    }
}

impl DiagnosticsSink for TracingSink {
    fn record(&mut self, d: &TerrainDiagnostics) {
        if d.frame % self.every_n_frames.max(1) != 0 {
            return;
        }
        self.recorded += 1;
        debug!(
            frame = d.frame,
            observer = %d.observer,
            triangles = d.total_triangles,
            radius_scale = d.radius_scale,
            cache_hits = d.cache.hits,
            cache_misses = d.cache.misses,
            sun_elevation = d.sun_elevation_deg,
            drawn = d.render.drawn(),
            culled = d.render.culled,
            "terrain frame"
        );
        for t in &d.tiers {
            debug!(
                tier = t.tier.name(),
                land = t.land,
                sea = t.sea,
                resolution = t.resolution,
                radius_deg = t.angular_radius_deg,
                "tier"
            );
        }
    }
}

/// Keeps the most recent snapshot.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub last: Option<TerrainDiagnostics>,
    pub count: u64,
}

impl DiagnosticsSink for MemorySink {
    fn record(&mut self, diagnostics: &TerrainDiagnostics) {
        self.last = Some(diagnostics.clone());
        self.count += 1;
    }
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for &mut S {
    fn record(&mut self, diagnostics: &TerrainDiagnostics) {
        (**self).record(diagnostics);
    }
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for Box<S> {
    fn record(&mut self, diagnostics: &TerrainDiagnostics) {
        (**self).record(diagnostics);
    }
}
