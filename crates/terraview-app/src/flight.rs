//! A straight-line scripted flight used by batch runs.

use terraview_coords::spherical_destination;
use terraview_render::ObserverPose;

/// Moves a pose along its heading at constant ground speed.
#[derive(Debug, Clone)]
pub struct ScriptedFlight {
    pub pose: ObserverPose,
    pub speed_m_s: f64,
}

impl ScriptedFlight {
    pub fn new(pose: ObserverPose, speed_m_s: f64) -> Self {
        Self { pose, speed_m_s }
    }

    /// Advance by `dt_s` seconds and return the new pose.
    pub fn advance(&mut self, dt_s: f64) -> ObserverPose {
        let distance_km = self.speed_m_s * dt_s / 1000.0;
        if distance_km > 0.0 {
            let next = spherical_destination(
                self.pose.geo(),
                self.pose.heading_deg.to_radians(),
                distance_km,
            );
            self.pose.lat = next.lat;
            self.pose.lon = next.lon;
        }
        self.pose
    }
}
