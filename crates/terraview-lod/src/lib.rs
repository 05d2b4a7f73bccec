//! Level-of-detail terrain meshes: five concentric tiers around the observer,
//! built on an equal-area grid and reused through a position-quantized cache.

mod builder;
mod cache;
mod classify;
mod tier;

pub use builder::{GridPoint, GridSamples, MeshBuilder, TierMesh, TierSet};
pub use cache::{CacheStats, MeshCache, MeshCacheConfig};
pub use classify::{CellClassifier, SurfaceKind};
pub use tier::{LodConfig, LodTier, TierConfig};
