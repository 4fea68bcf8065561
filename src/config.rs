//! Viewer configuration.
//!
//! [`ViewerConfig`] collects every tunable the viewer uses: window size, the
//! interaction steps and clamp windows, and the startup camera. All fields have
//! defaults matching the stock demo, and builder methods let callers (and
//! tests) override individual values.
//!
//! ```
//! use cubeviz::ViewerConfig;
//!
//! let config = ViewerConfig::new()
//!     .title("Cubes")
//!     .size(800, 800)
//!     .max_instances(4);
//! assert_eq!(config.max_instances, 4);
//! ```

use glam::Vec3;

/// Configuration for the viewer window and scene interaction.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Upper bound on the number of cube instances, including the first one.
    pub max_instances: usize,
    /// Distance in front of the camera at which new instances are placed.
    pub spawn_distance: f32,
    /// Translation applied per key press or repeat.
    pub translate_step: f32,
    /// Scale change applied per key press or repeat.
    pub scale_step: f32,
    /// Inclusive `(min, max)` range for the uniform scale factor.
    pub scale_range: (f32, f32),
    /// Inclusive `(min, max)` field of view range, in degrees.
    pub fov_range: (f32, f32),
    /// Field of view at startup and after reset, in degrees.
    pub default_fov: f32,
    /// Degrees of yaw/pitch per pixel of mouse movement.
    pub mouse_sensitivity: f32,
    /// Inclusive `(min, max)` pitch window, in degrees.
    pub pitch_range: (f32, f32),
    /// Inclusive `(min, max)` yaw window, in degrees. `None` leaves yaw free.
    pub yaw_range: Option<(f32, f32)>,
    /// Angle of one snap rotation, in degrees.
    pub snap_angle: f32,
    /// Degrees advanced per frame while a snap rotation is in flight.
    pub snap_step: f32,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub near: f32,
    pub far: f32,
    /// Length of each axis line drawn by the axis display.
    pub axis_length: f32,
    pub clear_color: [f64; 3],
    /// Whether the axis display starts enabled.
    pub show_axes: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "cubeviz".to_string(),
            width: 1000,
            height: 1000,
            max_instances: 10,
            spawn_distance: 3.0,
            translate_step: 0.1,
            scale_step: 0.1,
            scale_range: (0.1, 3.0),
            fov_range: (1.0, 90.0),
            default_fov: 45.0,
            mouse_sensitivity: 0.1,
            pitch_range: (-45.0, -15.0),
            yaw_range: Some((-135.0, -45.0)),
            snap_angle: 90.0,
            snap_step: 5.0,
            camera_position: Vec3::new(3.5, 2.5, 5.0),
            camera_target: Vec3::ZERO,
            near: 0.1,
            far: 100.0,
            axis_length: 5.0,
            clear_color: [0.95, 0.95, 0.95],
            show_axes: true,
        }
    }
}

impl ViewerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn max_instances(mut self, max: usize) -> Self {
        self.max_instances = max.max(1);
        self
    }

    /// Place the startup camera at `position`, looking toward `target`.
    pub fn camera(mut self, position: impl Into<Vec3>, target: impl Into<Vec3>) -> Self {
        self.camera_position = position.into();
        self.camera_target = target.into();
        self
    }

    /// Set the pitch clamp window in degrees.
    pub fn pitch_range(mut self, min: f32, max: f32) -> Self {
        self.pitch_range = (min, max);
        self
    }

    /// Set the yaw clamp window in degrees, or `None` for unrestricted yaw.
    pub fn yaw_range(mut self, range: Option<(f32, f32)>) -> Self {
        self.yaw_range = range;
        self
    }

    /// Set the snap rotation angle and the per-frame step, both in degrees.
    pub fn snap(mut self, angle: f32, step: f32) -> Self {
        self.snap_angle = angle;
        self.snap_step = step;
        self
    }

    pub fn show_axes(mut self, show: bool) -> Self {
        self.show_axes = show;
        self
    }

    /// Aspect ratio used by the projection (fixed to the configured window size).
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
