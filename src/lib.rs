//! # cubeviz
//!
//! **An instanced cube viewer with snap rotation and a steerable camera.**
//!
//! The viewer draws up to ten copies of a colored cube. Face keys snap-rotate
//! every cube by 90° with a short animation, `[`/`]` scale, the arrow keys
//! translate, Space spawns a new cube in front of the camera, and camera mode
//! lets the mouse steer the view within a fixed 2.5D window.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cubeviz::ViewerConfig;
//!
//! fn main() {
//!     cubeviz::run(ViewerConfig::new().title("Cubes")).unwrap();
//! }
//! ```
//!
//! ## Headless use
//!
//! Everything except [`run`], [`GpuContext`] and [`CubePass`] is plain data and
//! logic. Feed [`InputEvent`]s to an [`InputHandler`] and inspect the
//! [`SceneState`] or the composed [`FramePlan`]:
//!
//! ```
//! use cubeviz::{FramePlan, InputEvent, InputHandler, KeyCode, SceneState, ViewerConfig};
//!
//! let config = ViewerConfig::default();
//! let mut scene = SceneState::new(&config);
//! let mut input = InputHandler::new(&config);
//!
//! input.handle(&mut scene, InputEvent::KeyDown(KeyCode::Space));
//! assert_eq!(scene.instances.len(), 2);
//!
//! let plan = FramePlan::compose(&scene, &config);
//! assert_eq!(plan.models.len(), 2);
//! ```

mod animator;
mod app;
mod camera;
mod compose;
mod config;
mod cube_pass;
mod error;
mod gpu;
mod input;
mod mesh;
mod scene;

pub use animator::{Axis, SnapAnimator};
pub use app::run;
pub use camera::{CameraState, front_from_angles};
pub use compose::FramePlan;
pub use config::ViewerConfig;
pub use cube_pass::{CubePass, compile_shader};
pub use error::InitError;
pub use gpu::GpuContext;
pub use input::{Command, Effect, InputEvent, InputHandler};
pub use mesh::{ColorVertex, axis_vertices, cube_edge_indices, cube_vertices};
pub use scene::{InstanceSet, SceneState, TransformState};

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec3};

// Re-export the key codes used by InputEvent
pub use winit::keyboard::KeyCode;
