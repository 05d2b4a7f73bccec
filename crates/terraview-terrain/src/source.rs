//! The two lookups the terrain core consumes.

use terraview_math::Rgb;

/// Elevation in meters for any latitude/longitude in degrees.
///
/// Implementations must accept any latitude in `[-90, 90]` and any longitude
/// (wrapping it themselves), be deterministic, and be cheap: the mesh builder
/// calls this on the order of `resolution²` times per tier per rebuild.
pub trait ElevationSource {
    fn height_at(&self, lat: f64, lon: f64) -> f64;

    /// Elevation averaged over a footprint of roughly `footprint_deg` degrees.
    ///
    /// Used by coarse tiers to avoid aliasing when a mesh cell spans many
    /// source samples. The default ignores the footprint.
    fn height_at_filtered(&self, lat: f64, lon: f64, footprint_deg: f64) -> f64 {
        let _ = footprint_deg;
        self.height_at(lat, lon)
    }
}

/// Surface color for any latitude/longitude in degrees.
pub trait ColorSource {
    fn color_at(&self, lat: f64, lon: f64) -> Rgb;
}

impl<T: ElevationSource + ?Sized> ElevationSource for &T {
    fn height_at(&self, lat: f64, lon: f64) -> f64 {
        (**self).height_at(lat, lon)
    }

    fn height_at_filtered(&self, lat: f64, lon: f64, footprint_deg: f64) -> f64 {
        (**self).height_at_filtered(lat, lon, footprint_deg)
    }
}

impl<T: ColorSource + ?Sized> ColorSource for &T {
    fn color_at(&self, lat: f64, lon: f64) -> Rgb {
        (**self).color_at(lat, lon)
    }
}

impl<T: ElevationSource + ?Sized> ElevationSource for Box<T> {
    fn height_at(&self, lat: f64, lon: f64) -> f64 {
        (**self).height_at(lat, lon)
    }

    fn height_at_filtered(&self, lat: f64, lon: f64, footprint_deg: f64) -> f64 {
        (**self).height_at_filtered(lat, lon, footprint_deg)
    }
}

impl<T: ColorSource + ?Sized> ColorSource for Box<T> {
    fn color_at(&self, lat: f64, lon: f64) -> Rgb {
        (**self).color_at(lat, lon)
    }
}

/// Adapts a closure `(lat, lon) -> meters` into an [`ElevationSource`].
pub struct FnElevation<F>(pub F);

impl<F: Fn(f64, f64) -> f64> ElevationSource for FnElevation<F> {
    fn height_at(&self, lat: f64, lon: f64) -> f64 {
        (self.0)(lat, lon)
    }
}

/// Adapts a closure `(lat, lon) -> Rgb` into a [`ColorSource`].
pub struct FnColor<F>(pub F);

impl<F: Fn(f64, f64) -> Rgb> ColorSource for FnColor<F> {
    fn color_at(&self, lat: f64, lon: f64) -> Rgb {
        (self.0)(lat, lon)
    }
}
