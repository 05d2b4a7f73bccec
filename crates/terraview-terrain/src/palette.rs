//! Elevation-to-color ramp used by the procedural planet.

use terraview_math::Rgb;

/// Returned by bounds-checked color lookups that fall outside their data.
pub const OCEAN_FALLBACK: Rgb = Rgb::new(28, 64, 140);

/// Map an elevation in meters to a surface color.
///
/// Bands: deep ocean, shallow ocean, beach, lowland green, highland brown, snow.
pub fn elevation_color(elevation_m: f64, sea_level_m: f64) -> Rgb {
    let h = elevation_m - sea_level_m;

    if h < -1500.0 {
        Rgb::new(12, 36, 110)
    } else if h <= 0.0 {
        let t = (h + 1500.0) / 1500.0;
        Rgb::new(12, 36, 110).lerp(Rgb::new(40, 100, 190), t)
    } else if h < 20.0 {
        Rgb::new(220, 200, 130)
    } else if h < 1200.0 {
        let t = (h - 20.0) / 1180.0;
        Rgb::new(60, 150, 50).lerp(Rgb::new(120, 130, 60), t)
    } else if h < 3000.0 {
        let t = (h - 1200.0) / 1800.0;
        Rgb::new(120, 110, 70).lerp(Rgb::new(150, 120, 90), t)
    } else {
        let t = ((h - 3000.0) / 1500.0).min(1.0);
        Rgb::new(170, 170, 170).lerp(Rgb::WHITE, t)
    }
}
