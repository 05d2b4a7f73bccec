//! Look-at camera with software perspective projection.

use glam::DVec3;

/// A projected point in viewport pixels, origin top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    /// Distance along the camera forward axis.
    pub depth: f64,
}

/// A camera defined by a position and look-at target.
///
/// The orthonormal basis is derived whenever position or target change and is
/// the only state the camera carries between frames.
#[derive(Debug, Clone)]
pub struct Camera {
    position: DVec3,
    target: DVec3,
    up_hint: DVec3,
    forward: DVec3,
    right: DVec3,
    up: DVec3,
    /// Near clip distance (always positive).
    pub near: f64,
    /// Far clip distance (always positive, > near).
    pub far: f64,
    /// Multiplier on the normalized frustum bounds a projected point may reach
    /// before it is rejected. Values above 1 keep off-screen vertices of
    /// on-screen triangles.
    pub frustum_margin: f64,
}

impl Camera {
    /// Build a camera at `position` looking at `target`.
    ///
    /// If `target` coincides with `position` the camera looks north (+Y). If
    /// the view direction is parallel to `up`, an alternative up vector is used.
    pub fn look_at(position: DVec3, target: DVec3, up: DVec3) -> Self {
        let mut camera = Self {
            position,
            target,
            up_hint: up,
            forward: DVec3::Y,
            right: DVec3::X,
            up: DVec3::Z,
            near: 0.01,
            far: 5000.0,
            frustum_margin: 2.0,
        };
        camera.update_basis();
        camera
    }

    /// Move the camera and recompute its basis.
    pub fn set_position_target(&mut self, position: DVec3, target: DVec3) {
        self.position = position;
        self.target = target;
        self.update_basis();
    }

    fn update_basis(&mut self) {
        let forward = (self.target - self.position).normalize_or_zero();
        let forward = if forward == DVec3::ZERO { DVec3::Y } else { forward };

        let mut up_hint = self.up_hint.normalize_or_zero();
        if up_hint == DVec3::ZERO || forward.cross(up_hint).length() < 1e-9 {
            up_hint = if forward.cross(DVec3::Z).length() < 1e-9 {
                DVec3::Y
            } else {
                DVec3::Z
            };
        }

        let right = forward.cross(up_hint).normalize();
        self.up = right.cross(forward);
        self.right = right;
        self.forward = forward;
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn target(&self) -> DVec3 {
        self.target
    }

    pub fn forward(&self) -> DVec3 {
        self.forward
    }

    pub fn right(&self) -> DVec3 {
        self.right
    }

    pub fn up(&self) -> DVec3 {
        self.up
    }

    /// World point in camera space: x right, y up, z forward.
    pub fn to_camera_space(&self, point: DVec3) -> DVec3 {
        let rel = point - self.position;
        DVec3::new(rel.dot(self.right), rel.dot(self.up), rel.dot(self.forward))
    }

    /// Project a world point into a `width` x `height` viewport with a vertical
    /// field of view of `fov_deg`.
    ///
    /// Returns `None` when the point is behind the near plane, beyond the far
    /// plane, or outside the frustum widened by [`Camera::frustum_margin`].
    pub fn project_to_screen(
        &self,
        point: DVec3,
        width: f64,
        height: f64,
        fov_deg: f64,
    ) -> Option<ScreenPoint> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        let c = self.to_camera_space(point);
        if c.z <= self.near || c.z > self.far {
            return None;
        }

        let focal = 1.0 / (fov_deg.clamp(1.0, 179.0).to_radians() * 0.5).tan();
        let aspect = width / height;
        let ndc_x = c.x * focal / (c.z * aspect);
        let ndc_y = c.y * focal / c.z;
        if ndc_x.abs() > self.frustum_margin || ndc_y.abs() > self.frustum_margin {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc_x + 1.0) * 0.5 * width,
            y: (1.0 - ndc_y) * 0.5 * height,
            depth: c.z,
        })
    }

    /// Conservative near-plane clip: the triangle is kept unchanged if every
    /// vertex is in front of the near plane, and rejected otherwise.
    pub fn clip_triangle_near_plane(&self, vertices: [DVec3; 3]) -> Option<[DVec3; 3]> {
        let all_in_front = vertices
            .iter()
            .all(|&v| self.to_camera_space(v).z > self.near);
        all_in_front.then_some(vertices)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at(DVec3::ZERO, DVec3::Y, DVec3::Z)
    }
}
