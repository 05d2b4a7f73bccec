//! Global equirectangular rasters.
//!
//! Row 0 is the north edge (latitude +90), column 0 the antimeridian
//! (longitude -180). Pixel centers sit at half-pixel offsets.

use terraview_coords::wrap_longitude;
use terraview_math::Rgb;

use crate::palette::OCEAN_FALLBACK;
use crate::source::{ColorSource, ElevationSource};

/// Errors raised when constructing a raster from raw data.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RasterError {
    /// Width or height is zero.
    #[error("raster dimensions must be non-zero, got {width}x{height}")]
    Empty { width: usize, height: usize },

    /// The sample buffer does not match `width * height * channels`.
    #[error("raster data has {actual} samples, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

fn check_dims(width: usize, height: usize, expected: usize, actual: usize) -> Result<(), RasterError> {
    if width == 0 || height == 0 {
        return Err(RasterError::Empty { width, height });
    }
    if expected != actual {
        return Err(RasterError::SizeMismatch { expected, actual });
    }
    Ok(())
}

/// Fractional pixel coordinates for a lat/lon, relative to pixel centers.
fn pixel_coords(lat: f64, lon: f64, width: usize, height: usize) -> (f64, f64) {
    let lat = lat.clamp(-90.0, 90.0);
    let lon = wrap_longitude(lon);
    let x = (lon + 180.0) / 360.0 * width as f64 - 0.5;
    let y = (90.0 - lat) / 180.0 * height as f64 - 0.5;
    (x, y)
}

/// A global elevation grid in meters with bilinear interpolation.
#[derive(Clone, Debug)]
pub struct ElevationRaster {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl ElevationRaster {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self, RasterError> {
        check_dims(width, height, width * height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Degrees covered by one pixel along latitude.
    pub fn cell_size_deg(&self) -> f64 {
        180.0 / self.height as f64
    }

    /// Raw sample with longitude wrapping and latitude clamping on the index.
    fn sample(&self, x: i64, y: i64) -> f64 {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.data[y * self.width + x] as f64
    }
}

impl ElevationSource for ElevationRaster {
    fn height_at(&self, lat: f64, lon: f64) -> f64 {
        let (x, y) = pixel_coords(lat, lon, self.width, self.height);
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let h00 = self.sample(x0, y0);
        let h10 = self.sample(x0 + 1, y0);
        let h01 = self.sample(x0, y0 + 1);
        let h11 = self.sample(x0 + 1, y0 + 1);

        let top = h00 + (h10 - h00) * fx;
        let bottom = h01 + (h11 - h01) * fx;
        top + (bottom - top) * fy
    }

    /// Averages a five-point cross when the footprint spans more than one
    /// raster cell; otherwise a plain bilinear lookup.
    fn height_at_filtered(&self, lat: f64, lon: f64, footprint_deg: f64) -> f64 {
        if footprint_deg <= self.cell_size_deg() {
            return self.height_at(lat, lon);
        }
        let r = footprint_deg * 0.5;
        let samples = [
            self.height_at(lat, lon),
            self.height_at(lat + r, lon),
            self.height_at(lat - r, lon),
            self.height_at(lat, lon + r),
            self.height_at(lat, lon - r),
        ];
        samples.iter().sum::<f64>() / samples.len() as f64
    }
}

/// A global RGB8 color grid with nearest-pixel lookup.
#[derive(Clone, Debug)]
pub struct ColorRaster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl ColorRaster {
    /// Build from tightly packed RGB8 bytes.
    pub fn from_rgb8(width: usize, height: usize, data: Vec<u8>) -> Result<Self, RasterError> {
        check_dims(width, height, width * height * 3, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Bounds-checked pixel read. Out-of-range indices return the ocean
    /// fallback color.
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        if x >= self.width || y >= self.height {
            return OCEAN_FALLBACK;
        }
        let idx = (y * self.width + x) * 3;
        match self.data.get(idx..idx + 3) {
            Some(px) => Rgb::new(px[0], px[1], px[2]),
            None => OCEAN_FALLBACK,
        }
    }
}

impl ColorSource for ColorRaster {
    fn color_at(&self, lat: f64, lon: f64) -> Rgb {
        if !lat.is_finite() || !lon.is_finite() {
            return OCEAN_FALLBACK;
        }
        let (x, y) = pixel_coords(lat, lon, self.width, self.height);
        let x = (x.round() as i64).rem_euclid(self.width as i64) as usize;
        let y = (y.round() as i64).clamp(0, self.height as i64 - 1) as usize;
        self.pixel(x, y)
    }
}
