//! Elevation and color sources consumed by the mesh builder.
//!
//! The engine only needs two pure lookups, `height_at` and `color_at`. This crate
//! defines those seams as traits and ships global equirectangular raster adapters
//! plus a seeded procedural planet used when no rasters are supplied.

mod palette;
mod procedural;
mod raster;
mod source;

pub use palette::{OCEAN_FALLBACK, elevation_color};
pub use procedural::{ProceduralPlanet, ProceduralPlanetParams};
pub use raster::{ColorRaster, ElevationRaster, RasterError};
pub use source::{ColorSource, ElevationSource, FnColor, FnElevation};
