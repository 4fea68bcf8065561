//! Scene state: camera, shared transform, cube instances and mode flags.
//!
//! [`SceneState`] is the single owned record that the input handler mutates
//! and the frame composer reads. Every mutation is total: out-of-range inputs
//! are clamped, and spawning past capacity is a no-op.

use glam::Vec3;

use crate::animator::{Axis, SnapAnimator};
use crate::camera::CameraState;
use crate::config::ViewerConfig;

/// Ordered, append-only list of cube positions with a fixed capacity.
///
/// Always holds at least one instance (at the origin from startup).
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceSet {
    positions: Vec<Vec3>,
    capacity: usize,
}

impl InstanceSet {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut positions = Vec::with_capacity(capacity);
        positions.push(Vec3::ZERO);
        Self {
            positions,
            capacity,
        }
    }

    /// Append an instance. Returns `false` (and does nothing) when full.
    pub fn spawn(&mut self, position: Vec3) -> bool {
        if self.is_full() {
            return false;
        }
        self.positions.push(position);
        true
    }

    pub fn is_full(&self) -> bool {
        self.positions.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }
}

/// Uniform scale and local translation shared by every instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    pub scale: f32,
    pub translation: Vec3,
    scale_range: (f32, f32),
}

impl TransformState {
    pub fn new(scale_range: (f32, f32)) -> Self {
        Self {
            scale: 1.0_f32.max(scale_range.0).min(scale_range.1),
            translation: Vec3::ZERO,
            scale_range,
        }
    }

    /// Change the scale by `delta`, clamped to the configured range.
    pub fn adjust_scale(&mut self, delta: f32) {
        let (min, max) = self.scale_range;
        self.scale = (self.scale + delta).max(min).min(max);
    }

    pub fn translate(&mut self, axis: Axis, delta: f32) {
        self.translation[axis.index()] += delta;
    }

    pub fn scale_range(&self) -> (f32, f32) {
        self.scale_range
    }
}

/// Complete mutable state of the viewer.
#[derive(Clone, Debug)]
pub struct SceneState {
    pub camera: CameraState,
    pub transform: TransformState,
    pub animator: SnapAnimator,
    pub instances: InstanceSet,
    pub wireframe: bool,
    pub show_axes: bool,
    pub camera_mode: bool,
    spawn_distance: f32,
    startup_camera: CameraState,
}

impl SceneState {
    pub fn new(config: &ViewerConfig) -> Self {
        let camera = CameraState::looking_at(
            config.camera_position,
            config.camera_target,
            config.default_fov,
        );

        Self {
            camera,
            transform: TransformState::new(config.scale_range),
            animator: SnapAnimator::new(config.snap_angle, config.snap_step),
            instances: InstanceSet::new(config.max_instances),
            wireframe: false,
            show_axes: config.show_axes,
            camera_mode: false,
            spawn_distance: config.spawn_distance,
            startup_camera: camera,
        }
    }

    /// Restore camera, transform and rotation to their startup values.
    ///
    /// Instances and mode flags are left as they are.
    pub fn reset(&mut self) {
        self.camera = self.startup_camera;
        self.transform = TransformState::new(self.transform.scale_range());
        self.animator.reset();
    }

    /// Spawn a cube `spawn_distance` units along the camera's view direction.
    ///
    /// Returns the new position, or `None` when the instance list is full.
    pub fn spawn_instance(&mut self) -> Option<Vec3> {
        let position = self.camera.position + self.camera.front * self.spawn_distance;
        self.instances.spawn(position).then_some(position)
    }

    /// Current X, Y, Z rotation in degrees.
    pub fn rotation_degrees(&self) -> [f32; 3] {
        self.animator.angles()
    }

    /// The camera this scene starts with and returns to on reset.
    pub fn startup_camera(&self) -> &CameraState {
        &self.startup_camera
    }
}
