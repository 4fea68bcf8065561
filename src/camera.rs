use glam::{Mat4, Vec3};

/// A yaw/pitch camera for 3D scenes.
///
/// `front` is always the unit vector derived from `yaw` and `pitch` (degrees);
/// `up` stays fixed at +Y and is never re-orthogonalized against `front`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    /// Horizontal angle in degrees. -90 looks toward -Z.
    pub yaw: f32,
    /// Vertical angle in degrees. Positive looks up.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            fov: 45.0,
        }
    }
}

impl CameraState {
    /// Create a camera at `position` looking toward `target`.
    ///
    /// Yaw and pitch are recovered from the look direction so later mouse
    /// steering continues smoothly from this orientation.
    pub fn looking_at(position: Vec3, target: Vec3, fov: f32) -> Self {
        let dir = (target - position).normalize_or(Vec3::NEG_Z);
        let yaw = dir.z.atan2(dir.x).to_degrees();
        let pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees();

        Self {
            position,
            front: front_from_angles(yaw, pitch),
            up: Vec3::Y,
            yaw,
            pitch,
            fov,
        }
    }

    /// Steer the view by a mouse delta.
    ///
    /// `dx`/`dy` are raw cursor offsets with `dy` positive upward. Pitch is
    /// clamped to `pitch_range`; yaw is clamped only when `yaw_range` is set.
    pub fn look(
        &mut self,
        dx: f32,
        dy: f32,
        sensitivity: f32,
        pitch_range: (f32, f32),
        yaw_range: Option<(f32, f32)>,
    ) {
        self.yaw += dx * sensitivity;
        self.pitch += dy * sensitivity;

        self.pitch = clamp_to(self.pitch, pitch_range);
        if let Some(range) = yaw_range {
            self.yaw = clamp_to(self.yaw, range);
        }

        self.front = front_from_angles(self.yaw, self.pitch);
    }

    /// Zoom by a scroll offset. Scrolling up narrows the field of view.
    pub fn zoom(&mut self, scroll_dy: f32, fov_range: (f32, f32)) {
        self.fov = clamp_to(self.fov - scroll_dy, fov_range);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, near, far)
    }
}

/// Spherical-to-Cartesian conversion of yaw/pitch (degrees) into a unit direction.
pub fn front_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}

// Unlike f32::clamp this never panics on an inverted range.
fn clamp_to(value: f32, (min, max): (f32, f32)) -> f32 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_looks_down_negative_z() {
        let camera = CameraState::default();
        assert!(camera.front.abs_diff_eq(front_from_angles(-90.0, 0.0), 1e-6));
    }

    #[test]
    fn looking_at_keeps_front_consistent_with_angles() {
        let camera = CameraState::looking_at(Vec3::new(3.5, 2.5, 5.0), Vec3::ZERO, 45.0);
        let expected = (Vec3::ZERO - camera.position).normalize();

        assert!(camera.front.abs_diff_eq(expected, 1e-5));
        assert!(camera
            .front
            .abs_diff_eq(front_from_angles(camera.yaw, camera.pitch), 1e-6));
    }

    #[test]
    fn pitch_and_yaw_stay_in_window() {
        let mut camera = CameraState::default();
        let deltas = [
            (500.0, 900.0),
            (-3000.0, -40.0),
            (12.5, 7.0),
            (0.0, -10_000.0),
            (10_000.0, 10_000.0),
        ];

        for (dx, dy) in deltas {
            camera.look(dx, dy, 0.1, (-45.0, -15.0), Some((-135.0, -45.0)));
            assert!((-45.0..=-15.0).contains(&camera.pitch));
            assert!((-135.0..=-45.0).contains(&camera.yaw));
            assert!((camera.front.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn yaw_unbounded_without_window() {
        let mut camera = CameraState::default();
        camera.look(3600.0, 0.0, 0.1, (-89.0, 89.0), None);
        assert!((camera.yaw - 270.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_clamps_fov() {
        let mut camera = CameraState::default();
        for _ in 0..100 {
            camera.zoom(3.0, (1.0, 90.0));
            assert!((1.0..=90.0).contains(&camera.fov));
        }
        assert_eq!(camera.fov, 1.0);

        camera.zoom(-500.0, (1.0, 90.0));
        assert_eq!(camera.fov, 90.0);
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z() {
        let camera = CameraState::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 45.0);
        let origin_in_view = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!(origin_in_view.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
    }
}
