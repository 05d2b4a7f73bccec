//! Geographic coordinates on a spherical planet: clamping, wrapping, great-circle
//! distance, local east/north offsets, and position quantization for caching.

mod geo;
mod local;
mod quantize;

pub use geo::{
    EARTH_RADIUS_KM, GeoCoord, KM_PER_DEGREE, MAX_LATITUDE, clamp_latitude, wrap_longitude,
};
pub use local::{DEFAULT_LATITUDE_CROSSOVER, geo_to_offset, offset_to_geo, spherical_destination};
pub use quantize::{QuantizedKey, quantize};
