//! Observer pose and the camera derived from it.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use terraview_coords::{EARTH_RADIUS_KM, GeoCoord, geo_to_offset};
use terraview_lod::LodConfig;

use crate::camera::Camera;

/// Steepest pitch the camera accepts, so the view never aligns with up.
const MAX_PITCH_DEG: f64 = 89.5;

/// Where the observer is and which way it faces.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObserverPose {
    pub lat: f64,
    pub lon: f64,
    /// Height above sea level in meters.
    pub altitude_m: f64,
    /// Clockwise from north, degrees.
    pub heading_deg: f64,
    /// Positive looks up, degrees.
    pub pitch_deg: f64,
}

impl ObserverPose {
    pub fn geo(&self) -> GeoCoord {
        GeoCoord::new(self.lat, self.lon).normalized()
    }
}

/// User view adjustments layered on top of the pose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewControl {
    pub relative_heading_deg: f64,
    pub tilt_deg: f64,
}

/// Eye position in the local frame of a mesh anchored at `anchor`.
///
/// Uses the same scaling and curvature drop as mesh vertices so the eye stays
/// at the right height above terrain when the observer drifts off the anchor.
pub fn eye_position(anchor: GeoCoord, pose: &ObserverPose, lod: &LodConfig) -> DVec3 {
    let (east_km, north_km) = geo_to_offset(anchor, pose.geo(), lod.latitude_crossover_deg);
    let drop_km = (east_km * east_km + north_km * north_km) / (2.0 * EARTH_RADIUS_KM);
    DVec3::new(
        east_km * lod.horizontal_scale,
        north_km * lod.horizontal_scale,
        pose.altitude_m / 1000.0 * lod.vertical_scale - drop_km,
    )
}

/// Camera for `pose` adjusted by `view`, in the frame of a mesh anchored at
/// `anchor`.
pub fn camera_for_pose(
    anchor: GeoCoord,
    pose: &ObserverPose,
    view: &ViewControl,
    lod: &LodConfig,
) -> Camera {
    let eye = eye_position(anchor, pose, lod);
    let heading = (pose.heading_deg + view.relative_heading_deg).to_radians();
    let pitch = (pose.pitch_deg + view.tilt_deg)
        .clamp(-MAX_PITCH_DEG, MAX_PITCH_DEG)
        .to_radians();
    let direction = DVec3::new(
        pitch.cos() * heading.sin(),
        pitch.cos() * heading.cos(),
        pitch.sin(),
    );
    Camera::look_at(eye, eye + direction, DVec3::Z)
}
