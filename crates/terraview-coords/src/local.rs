//! Conversion between local (east, north) kilometer offsets and lat/lon.
//!
//! Two paths are used. Below the crossover latitude a locally flat
//! approximation is accurate and cheap. Above it, longitude convergence makes
//! the flat path blow up, so offsets are treated as an azimuthal-equidistant
//! displacement and resolved with spherical trigonometry.

use crate::geo::{EARTH_RADIUS_KM, GeoCoord, KM_PER_DEGREE, clamp_latitude, wrap_longitude};

/// Latitude (degrees) above which the spherical path is used.
pub const DEFAULT_LATITUDE_CROSSOVER: f64 = 85.0;

const MIN_COS_LAT: f64 = 1e-6;

/// Convert a local offset from `origin` into a geographic coordinate.
///
/// The result is always clamped and wrapped.
pub fn offset_to_geo(origin: GeoCoord, east_km: f64, north_km: f64, crossover: f64) -> GeoCoord {
    let flat_lat = origin.lat + north_km / KM_PER_DEGREE;
    if origin.lat.abs() < crossover && flat_lat.abs() < crossover {
        let cos_lat = flat_lat.to_radians().cos().max(MIN_COS_LAT);
        let lon = origin.lon + east_km / (KM_PER_DEGREE * cos_lat);
        return GeoCoord::new(clamp_latitude(flat_lat), wrap_longitude(lon));
    }

    let distance = (east_km * east_km + north_km * north_km).sqrt();
    if distance == 0.0 {
        return origin.normalized();
    }
    let bearing = east_km.atan2(north_km);
    spherical_destination(origin, bearing, distance)
}

/// Destination point reached from `origin` by travelling `distance_km` along
/// the great circle with initial `bearing` (radians clockwise from north).
pub fn spherical_destination(origin: GeoCoord, bearing: f64, distance_km: f64) -> GeoCoord {
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lon.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * bearing.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (bearing.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    GeoCoord::new(
        clamp_latitude(phi2.to_degrees()),
        wrap_longitude(lambda2.to_degrees()),
    )
}

/// Inverse of [`offset_to_geo`]: the (east, north) kilometer offset of
/// `target` relative to `origin`.
pub fn geo_to_offset(origin: GeoCoord, target: GeoCoord, crossover: f64) -> (f64, f64) {
    if origin.lat.abs() < crossover && target.lat.abs() < crossover {
        let north = (target.lat - origin.lat) * KM_PER_DEGREE;
        let dlon = wrap_longitude(target.lon - origin.lon);
        let cos_lat = target.lat.to_radians().cos().max(MIN_COS_LAT);
        let east = dlon * KM_PER_DEGREE * cos_lat;
        return (east, north);
    }

    let distance = origin.surface_distance_km(&target);
    if distance == 0.0 {
        return (0.0, 0.0);
    }
    let phi1 = origin.lat.to_radians();
    let phi2 = target.lat.to_radians();
    let dlambda = (target.lon - origin.lon).to_radians();
    let bearing = (dlambda.sin() * phi2.cos())
        .atan2(phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos());
    (distance * bearing.sin(), distance * bearing.cos())
}
