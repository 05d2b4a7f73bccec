//! Position quantization onto a coarse grid and altitude band.

use serde::{Deserialize, Serialize};

use crate::geo::{GeoCoord, KM_PER_DEGREE, clamp_latitude, wrap_longitude};

/// A position snapped to a coarse lat/lon grid plus an altitude band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantizedKey {
    pub lat: i64,
    pub lon: i64,
    pub alt: i64,
    /// Grid step in micro-degrees, kept so the anchor can be recovered.
    step_micro_deg: i64,
    band_m: i64,
}

impl QuantizedKey {
    /// The center of the grid cell this key names.
    pub fn anchor(&self) -> GeoCoord {
        let step = self.step_micro_deg as f64 * 1e-6;
        GeoCoord::new(
            clamp_latitude(self.lat as f64 * step),
            wrap_longitude(self.lon as f64 * step),
        )
    }

    /// The center altitude of the band, in meters.
    pub fn band_altitude_m(&self) -> f64 {
        (self.alt * self.band_m) as f64
    }
}

/// Snap `coord` to a grid of roughly `grid_km` and `altitude_m` to a band of
/// `band_m` meters.
pub fn quantize(coord: GeoCoord, altitude_m: f64, grid_km: f64, band_m: f64) -> QuantizedKey {
    let coord = coord.normalized();
    let step_deg = (grid_km / KM_PER_DEGREE).max(1e-6);
    let step_micro_deg = (step_deg * 1e6).round().max(1.0) as i64;
    let step = step_micro_deg as f64 * 1e-6;
    let band_m = band_m.max(1.0).round() as i64;

    let mut lon = (coord.lon / step).round() as i64;
    // -180 and 180 name the same meridian.
    let half_turn = (180.0 / step).round() as i64;
    if lon == half_turn {
        lon = -half_turn;
    }

    QuantizedKey {
        lat: (coord.lat / step).round() as i64,
        lon,
        alt: (altitude_m / band_m as f64).round() as i64,
        step_micro_deg,
        band_m,
    }
}
