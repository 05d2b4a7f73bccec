//! Subsolar point and observer-relative sun position.
//!
//! Uses a low-precision model: the subsolar longitude moves 15° per hour
//! westward from Greenwich at 12:00 UTC, and the subsolar latitude follows a
//! cosine of the day of year centered on the June solstice.

use glam::DVec3;
use terraview_coords::{GeoCoord, clamp_latitude, wrap_longitude};
use terraview_math::Rgb;

/// Earth's axial tilt in degrees.
pub const AXIAL_TILT_DEG: f64 = 23.44;

/// Day of year of the June solstice.
pub const SUMMER_SOLSTICE_DAY: f64 = 172.0;

/// The point where the sun is directly overhead.
pub fn subsolar_point(utc_hours: f64, day_of_year: u32) -> GeoCoord {
    let lon = wrap_longitude(-15.0 * (utc_hours - 12.0));
    let season = std::f64::consts::TAU * (day_of_year as f64 - SUMMER_SOLSTICE_DAY) / 365.0;
    let lat = AXIAL_TILT_DEG * season.cos();
    GeoCoord::new(lat, lon)
}

/// Sun elevation above the horizon and azimuth (clockwise from north), in
/// degrees, as seen from `observer`.
pub fn horizon_coordinates(observer: GeoCoord, subsolar: GeoCoord) -> (f64, f64) {
    let phi = clamp_latitude(observer.lat).to_radians();
    let delta = subsolar.lat.to_radians();
    let dlambda = (subsolar.lon - observer.lon).to_radians();

    let sin_el = phi.sin() * delta.sin() + phi.cos() * delta.cos() * dlambda.cos();
    let elevation = sin_el.clamp(-1.0, 1.0).asin().to_degrees();

    let y = dlambda.sin() * delta.cos();
    let x = phi.cos() * delta.sin() - phi.sin() * delta.cos() * dlambda.cos();
    let azimuth = if x.abs() < 1e-15 && y.abs() < 1e-15 {
        0.0
    } else {
        y.atan2(x).to_degrees().rem_euclid(360.0)
    };

    (elevation, azimuth)
}

/// Unit vector toward the sun in the local east-north-up frame.
pub fn sun_direction_enu(elevation_deg: f64, azimuth_deg: f64) -> DVec3 {
    let el = elevation_deg.to_radians();
    let az = azimuth_deg.to_radians();
    DVec3::new(el.cos() * az.sin(), el.cos() * az.cos(), el.sin())
}

/// Day/night shading term in `[0, 1]`.
///
/// 1.0 above 15° elevation, 0.0 below -10°, smooth through twilight.
pub fn day_factor(elevation_deg: f64) -> f64 {
    let sin_el = elevation_deg.to_radians().sin();
    let low = (-10.0_f64).to_radians().sin();
    let high = 15.0_f64.to_radians().sin();
    smoothstep(low, high, sin_el)
}

/// Sun disc color: white high in the sky, deep orange at the horizon.
pub fn sun_color(elevation_deg: f64) -> Rgb {
    let sin_el = elevation_deg.to_radians().sin();
    let t = smoothstep(0.0, 0.5, sin_el);
    Rgb::new(255, 96, 24).lerp(Rgb::new(255, 252, 240), t)
}

pub(crate) fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsolar_longitude_follows_utc() {
        assert!(subsolar_point(12.0, 80).lon.abs() < 1e-12);
        assert!((subsolar_point(18.0, 80).lon - -90.0).abs() < 1e-9);
        assert!((subsolar_point(6.0, 80).lon - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_subsolar_latitude_follows_season() {
        let june = subsolar_point(12.0, 172);
        assert!((june.lat - AXIAL_TILT_DEG).abs() < 1e-9);
        let december = subsolar_point(12.0, 355);
        assert!(december.lat < -23.0, "got {}", december.lat);
        let march = subsolar_point(12.0, 81);
        assert!(march.lat.abs() < 1.0, "near equinox, got {}", march.lat);
    }

    #[test]
    fn test_zenith_elevation() {
        let observer = GeoCoord::new(12.0, 34.0);
        let (el, _) = horizon_coordinates(observer, observer);
        assert!((el - 90.0).abs() < 1e-6, "got {el}");
    }

    #[test]
    fn test_antipode_elevation() {
        let observer = GeoCoord::new(12.0, 34.0);
        let (el, _) = horizon_coordinates(observer, observer.antipode());
        assert!((el + 90.0).abs() < 1e-6, "got {el}");
    }

    #[test]
    fn test_azimuth_cardinal_directions() {
        let observer = GeoCoord::new(0.0, 0.0);
        let (_, east) = horizon_coordinates(observer, GeoCoord::new(0.0, 30.0));
        assert!((east - 90.0).abs() < 1e-9, "east {east}");
        let (_, west) = horizon_coordinates(observer, GeoCoord::new(0.0, -30.0));
        assert!((west - 270.0).abs() < 1e-9, "west {west}");
        let (_, north) = horizon_coordinates(observer, GeoCoord::new(20.0, 0.0));
        assert!(north.abs() < 1e-9, "north {north}");
    }

    #[test]
    fn test_direction_is_unit_and_matches_elevation() {
        let d = sun_direction_enu(30.0, 135.0);
        assert!((d.length() - 1.0).abs() < 1e-12);
        assert!((d.z - 0.5).abs() < 1e-12);
        assert!(d.x > 0.0 && d.y < 0.0, "south-east: {d:?}");
    }

    #[test]
    fn test_day_factor_range() {
        assert!(day_factor(60.0) > 0.999);
        assert!(day_factor(-30.0) < 1e-9);
        let dusk = day_factor(0.0);
        assert!(dusk > 0.1 && dusk < 0.9, "twilight should be partial, got {dusk}");
    }

    #[test]
    fn test_sun_color_ramp() {
        let high = sun_color(70.0);
        let low = sun_color(1.0);
        assert!(high.b > 200, "high sun is white, got {high:?}");
        assert!(low.b < high.b && low.g < high.g, "low sun is orange, got {low:?}");
        assert_eq!(low.r, 255);
    }
}
