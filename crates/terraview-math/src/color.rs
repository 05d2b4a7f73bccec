//! 8-bit RGB color used by rasters, vertices and the framebuffer.

use serde::{Deserialize, Serialize};

/// An sRGB color with 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation toward `other`. `t` is clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    /// Multiply every channel by `factor`, saturating at 255.
    pub fn scale(self, factor: f64) -> Rgb {
        let f = factor.max(0.0);
        let mul = |c: u8| (c as f64 * f).round().min(255.0) as u8;
        Rgb::new(mul(self.r), mul(self.g), mul(self.b))
    }

    /// Unweighted mean of three colors.
    pub fn mean3(a: Rgb, b: Rgb, c: Rgb) -> Rgb {
        let avg = |x: u8, y: u8, z: u8| ((x as u16 + y as u16 + z as u16) as f64 / 3.0).round() as u8;
        Rgb::new(avg(a.r, b.r, c.r), avg(a.g, b.g, c.g), avg(a.b, b.b, c.b))
    }

    /// Convert from floating-point channels in `[0, 1]`.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Rgb {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb::new(q(r), q(g), q(b))
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Rgb::new(c[0], c[1], c[2])
    }
}
