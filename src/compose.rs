//! Per-frame matrix composition.
//!
//! [`FramePlan::compose`] turns a [`SceneState`] into everything the GPU pass
//! needs for one frame. It does no GPU work itself.

use glam::{Mat4, Vec3};

use crate::config::ViewerConfig;
use crate::scene::SceneState;

/// Fixed tilt applied to every cube so the default view reads as 2.5D.
const TILT_Y_DEGREES: f32 = 45.0;
const TILT_X_DEGREES: f32 = 30.0;

/// Matrices and draw flags for a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    pub view: Mat4,
    pub projection: Mat4,
    /// One model matrix per instance, in instance order.
    pub models: Vec<Mat4>,
    pub camera_position: Vec3,
    pub wireframe: bool,
    pub show_axes: bool,
}

impl FramePlan {
    pub fn compose(scene: &SceneState, config: &ViewerConfig) -> Self {
        let view = scene.camera.view_matrix();
        let projection = scene
            .camera
            .projection_matrix(config.aspect(), config.near, config.far);

        let [rx, ry, rz] = scene.rotation_degrees().map(f32::to_radians);
        let shared = Mat4::from_rotation_x(rx)
            * Mat4::from_rotation_y(ry)
            * Mat4::from_rotation_z(rz)
            * Mat4::from_translation(scene.transform.translation)
            * Mat4::from_scale(Vec3::splat(scene.transform.scale))
            * Mat4::from_rotation_y(TILT_Y_DEGREES.to_radians())
            * Mat4::from_rotation_x(TILT_X_DEGREES.to_radians());

        let models = scene
            .instances
            .positions()
            .iter()
            .map(|&position| Mat4::from_translation(position) * shared)
            .collect();

        Self {
            view,
            projection,
            models,
            camera_position: scene.camera.position,
            wireframe: scene.wireframe,
            show_axes: scene.show_axes,
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }
}
