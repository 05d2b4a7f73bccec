//! Geometry primitives for the terrain pipeline: colors, terrain vertices and triangles.
//!
//! Vectors are `glam::DVec3` throughout; this crate only adds the composite
//! types that carry per-vertex terrain data.

mod color;
mod triangle;

pub use color::Rgb;
pub use glam::DVec3;
pub use triangle::{DEGENERATE_AREA_EPSILON, TerrainTriangle, TerrainVertex, TriangleList};
