//! Keyboard and mouse handling.
//!
//! Window events are first narrowed to [`InputEvent`], a small sum type that
//! carries only what the viewer reacts to. [`InputHandler`] then applies those
//! events to a [`SceneState`]. Nothing here needs a window or a GPU, so tests
//! drive the handler with synthetic events and inspect the resulting state.

use glam::Vec2;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::animator::Axis;
use crate::config::ViewerConfig;
use crate::scene::SceneState;

/// A window-independent input event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Auto-repeat while a key is held.
    KeyRepeat(KeyCode),
    /// Cursor position in window coordinates (y grows downward).
    MouseMove { x: f32, y: f32 },
    /// Scroll offset in lines; positive `dy` scrolls up.
    Scroll { dx: f32, dy: f32 },
}

impl InputEvent {
    /// Narrow a winit window event. Returns `None` for events the viewer ignores.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return None;
                };
                Some(match (event.state, event.repeat) {
                    (ElementState::Pressed, false) => InputEvent::KeyDown(key),
                    (ElementState::Pressed, true) => InputEvent::KeyRepeat(key),
                    (ElementState::Released, _) => InputEvent::KeyUp(key),
                })
            }
            WindowEvent::CursorMoved { position, .. } => Some(InputEvent::MouseMove {
                x: position.x as f32,
                y: position.y as f32,
            }),
            WindowEvent::MouseWheel { delta, .. } => {
                let d = match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y),
                    MouseScrollDelta::PixelDelta(pos) => {
                        Vec2::new(pos.x as f32, pos.y as f32) / 120.0
                    }
                };
                Some(InputEvent::Scroll { dx: d.x, dy: d.y })
            }
            _ => None,
        }
    }
}

/// What a key means to the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Snap-rotate about an axis; the sign gives the direction.
    Rotate(Axis, f32),
    /// Scale by a signed number of steps.
    Scale(f32),
    /// Translate along an axis by a signed number of steps.
    Translate(Axis, f32),
    Spawn,
    ToggleWireframe,
    ToggleAxes,
    ToggleCameraMode,
    Reset,
    Exit,
}

impl Command {
    pub fn for_key(key: KeyCode) -> Option<Self> {
        let command = match key {
            KeyCode::KeyW => Command::Rotate(Axis::X, -1.0),
            KeyCode::KeyS => Command::Rotate(Axis::X, 1.0),
            KeyCode::KeyA => Command::Rotate(Axis::Y, -1.0),
            KeyCode::KeyD => Command::Rotate(Axis::Y, 1.0),
            KeyCode::KeyI => Command::Rotate(Axis::Z, 1.0),
            KeyCode::KeyJ => Command::Rotate(Axis::Z, -1.0),
            KeyCode::BracketLeft => Command::Scale(-1.0),
            KeyCode::BracketRight => Command::Scale(1.0),
            KeyCode::ArrowLeft => Command::Translate(Axis::X, -1.0),
            KeyCode::ArrowRight => Command::Translate(Axis::X, 1.0),
            KeyCode::ArrowDown => Command::Translate(Axis::Y, -1.0),
            KeyCode::ArrowUp => Command::Translate(Axis::Y, 1.0),
            KeyCode::PageDown => Command::Translate(Axis::Z, -1.0),
            KeyCode::PageUp => Command::Translate(Axis::Z, 1.0),
            KeyCode::Space => Command::Spawn,
            KeyCode::KeyF => Command::ToggleWireframe,
            KeyCode::KeyX => Command::ToggleAxes,
            KeyCode::KeyC => Command::ToggleCameraMode,
            KeyCode::KeyR => Command::Reset,
            KeyCode::Escape => Command::Exit,
            _ => return None,
        };
        Some(command)
    }

    /// Held commands fire on every auto-repeat; the rest only on the initial press.
    pub fn repeats(self) -> bool {
        matches!(self, Command::Scale(_) | Command::Translate(..))
    }
}

/// A request from the input handler to the windowing layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Grab and hide the cursor (`true`) or release it (`false`).
    CaptureCursor(bool),
    Exit,
}

/// Applies [`InputEvent`]s to a [`SceneState`].
#[derive(Clone, Debug)]
pub struct InputHandler {
    translate_step: f32,
    scale_step: f32,
    sensitivity: f32,
    pitch_range: (f32, f32),
    yaw_range: Option<(f32, f32)>,
    fov_range: (f32, f32),
    /// Last cursor sample in camera mode; `None` until the first one arrives.
    last_cursor: Option<Vec2>,
}

impl InputHandler {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            translate_step: config.translate_step,
            scale_step: config.scale_step,
            sensitivity: config.mouse_sensitivity,
            pitch_range: config.pitch_range,
            yaw_range: config.yaw_range,
            fov_range: config.fov_range,
            last_cursor: None,
        }
    }

    pub fn handle(&mut self, scene: &mut SceneState, event: InputEvent) -> Option<Effect> {
        match event {
            InputEvent::KeyDown(key) => self.apply(scene, Command::for_key(key)?),
            InputEvent::KeyRepeat(key) => {
                let command = Command::for_key(key).filter(|c| c.repeats())?;
                self.apply(scene, command)
            }
            InputEvent::KeyUp(_) => None,
            InputEvent::MouseMove { x, y } => {
                self.mouse_move(scene, Vec2::new(x, y));
                None
            }
            InputEvent::Scroll { dy, .. } => {
                scene.camera.zoom(dy, self.fov_range);
                None
            }
        }
    }

    /// Apply a command directly, bypassing key lookup.
    pub fn apply(&mut self, scene: &mut SceneState, command: Command) -> Option<Effect> {
        match command {
            Command::Rotate(axis, direction) => {
                if !scene.animator.begin(axis, direction) {
                    log::trace!("rotation on {axis:?} ignored, animation in flight");
                }
            }
            Command::Scale(sign) => scene.transform.adjust_scale(sign * self.scale_step),
            Command::Translate(axis, sign) => {
                scene.transform.translate(axis, sign * self.translate_step)
            }
            Command::Spawn => match scene.spawn_instance() {
                Some(p) => log::info!(
                    "new cube at ({:.2}, {:.2}, {:.2}), total: {}",
                    p.x,
                    p.y,
                    p.z,
                    scene.instances.len()
                ),
                None => log::debug!(
                    "instance limit of {} reached",
                    scene.instances.capacity()
                ),
            },
            Command::ToggleWireframe => {
                scene.wireframe = !scene.wireframe;
                log::debug!("wireframe: {}", scene.wireframe);
            }
            Command::ToggleAxes => {
                scene.show_axes = !scene.show_axes;
                log::debug!("axes: {}", scene.show_axes);
            }
            Command::ToggleCameraMode => {
                scene.camera_mode = !scene.camera_mode;
                self.last_cursor = None;
                log::debug!("camera mode: {}", scene.camera_mode);
                return Some(Effect::CaptureCursor(scene.camera_mode));
            }
            Command::Reset => {
                scene.reset();
                log::debug!("view reset");
            }
            Command::Exit => return Some(Effect::Exit),
        }
        None
    }

    fn mouse_move(&mut self, scene: &mut SceneState, position: Vec2) {
        if !scene.camera_mode {
            return;
        }

        let Some(last) = self.last_cursor.replace(position) else {
            return;
        };

        // Window y grows downward; pitch grows upward.
        let dx = position.x - last.x;
        let dy = last.y - position.y;
        scene
            .camera
            .look(dx, dy, self.sensitivity, self.pitch_range, self.yaw_range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn setup() -> (InputHandler, SceneState) {
        let config = ViewerConfig::default();
        (InputHandler::new(&config), SceneState::new(&config))
    }

    fn press(handler: &mut InputHandler, scene: &mut SceneState, key: KeyCode) -> Option<Effect> {
        handler.handle(scene, InputEvent::KeyDown(key))
    }

    #[test]
    fn scale_down_stops_at_minimum() {
        let (mut handler, mut scene) = setup();
        assert_eq!(scene.transform.scale, 1.0);

        for _ in 0..9 {
            press(&mut handler, &mut scene, KeyCode::BracketLeft);
        }
        assert!((scene.transform.scale - 0.1).abs() < 1e-5);

        for _ in 0..5 {
            press(&mut handler, &mut scene, KeyCode::BracketLeft);
        }
        assert!((scene.transform.scale - 0.1).abs() < 1e-5);
        assert!(scene.transform.scale >= 0.1);
    }

    #[test]
    fn held_keys_repeat_but_toggles_do_not() {
        let (mut handler, mut scene) = setup();

        for _ in 0..3 {
            handler.handle(&mut scene, InputEvent::KeyRepeat(KeyCode::ArrowRight));
        }
        assert!((scene.transform.translation.x - 0.3).abs() < 1e-5);

        handler.handle(&mut scene, InputEvent::KeyRepeat(KeyCode::KeyF));
        handler.handle(&mut scene, InputEvent::KeyRepeat(KeyCode::Space));
        assert!(!scene.wireframe);
        assert_eq!(scene.instances.len(), 1);
    }

    #[test]
    fn scale_up_repeat_clamps_to_maximum() {
        let (mut handler, mut scene) = setup();
        for _ in 0..100 {
            handler.handle(&mut scene, InputEvent::KeyRepeat(KeyCode::BracketRight));
            assert!(scene.transform.scale <= 3.0);
        }
        assert!((scene.transform.scale - 3.0).abs() < 1e-5);
    }

    #[test]
    fn spawn_from_startup_camera() {
        let (mut handler, mut scene) = setup();
        let camera_pos = Vec3::new(3.5, 2.5, 5.0);
        assert!(scene.camera.position.abs_diff_eq(camera_pos, 1e-6));

        press(&mut handler, &mut scene, KeyCode::Space);

        let expected = camera_pos + (Vec3::ZERO - camera_pos).normalize() * 3.0;
        assert_eq!(scene.instances.len(), 2);
        assert!(scene.instances.positions()[1].abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn eleventh_spawn_is_noop() {
        let (mut handler, mut scene) = setup();
        for _ in 0..25 {
            press(&mut handler, &mut scene, KeyCode::Space);
            assert!(scene.instances.len() <= 10);
        }
        assert_eq!(scene.instances.len(), 10);
    }

    #[test]
    fn scroll_keeps_fov_in_range() {
        let (mut handler, mut scene) = setup();
        let scrolls = [30.0, 30.0, -7.5, 100.0, -1000.0, 0.5, 44.0];
        for dy in scrolls {
            handler.handle(&mut scene, InputEvent::Scroll { dx: 0.0, dy });
            assert!((1.0..=90.0).contains(&scene.camera.fov));
        }
        assert_eq!(scene.camera.fov, 45.5);
    }

    #[test]
    fn mouse_ignored_outside_camera_mode() {
        let (mut handler, mut scene) = setup();
        let before = scene.camera;
        handler.handle(&mut scene, InputEvent::MouseMove { x: 10.0, y: 10.0 });
        handler.handle(&mut scene, InputEvent::MouseMove { x: 900.0, y: 40.0 });
        assert_eq!(scene.camera, before);
    }

    #[test]
    fn camera_mode_discards_first_sample() {
        let (mut handler, mut scene) = setup();
        let effect = press(&mut handler, &mut scene, KeyCode::KeyC);
        assert_eq!(effect, Some(Effect::CaptureCursor(true)));

        let before = scene.camera;
        handler.handle(&mut scene, InputEvent::MouseMove { x: 800.0, y: 20.0 });
        assert_eq!(scene.camera, before);

        // 20px right, 10px up.
        handler.handle(&mut scene, InputEvent::MouseMove { x: 820.0, y: 10.0 });
        assert!((scene.camera.yaw - (before.yaw + 2.0)).abs() < 1e-4);
        assert!((scene.camera.pitch - (before.pitch + 1.0)).abs() < 1e-4);

        let effect = press(&mut handler, &mut scene, KeyCode::KeyC);
        assert_eq!(effect, Some(Effect::CaptureCursor(false)));
    }

    #[test]
    fn mouse_moves_keep_angles_in_window() {
        let (mut handler, mut scene) = setup();
        press(&mut handler, &mut scene, KeyCode::KeyC);

        let path = [
            (0.0, 0.0),
            (5000.0, -3000.0),
            (-9000.0, 4000.0),
            (120.0, 60.0),
            (-50.0, 20000.0),
        ];
        for (x, y) in path {
            handler.handle(&mut scene, InputEvent::MouseMove { x, y });
            assert!((-45.0..=-15.0).contains(&scene.camera.pitch));
            assert!((-135.0..=-45.0).contains(&scene.camera.yaw));
        }
    }

    #[test]
    fn rotation_ignored_while_animating() {
        let (mut handler, mut scene) = setup();
        press(&mut handler, &mut scene, KeyCode::KeyW);
        assert!(scene.animator.is_animating());
        assert_eq!(scene.animator.targets(), [-90.0, 0.0, 0.0]);

        scene.animator.step();
        let before = scene.animator.clone();
        press(&mut handler, &mut scene, KeyCode::KeyD);
        press(&mut handler, &mut scene, KeyCode::KeyS);
        assert_eq!(scene.animator, before);

        while scene.animator.is_animating() {
            scene.animator.step();
        }
        assert_eq!(scene.rotation_degrees(), [-90.0, 0.0, 0.0]);

        press(&mut handler, &mut scene, KeyCode::KeyI);
        assert_eq!(scene.animator.targets(), [-90.0, 0.0, 90.0]);
    }

    #[test]
    fn reset_restores_defaults_but_keeps_instances() {
        let (mut handler, mut scene) = setup();
        let startup_camera = scene.camera;

        press(&mut handler, &mut scene, KeyCode::Space);
        press(&mut handler, &mut scene, KeyCode::Space);
        press(&mut handler, &mut scene, KeyCode::BracketRight);
        press(&mut handler, &mut scene, KeyCode::PageUp);
        press(&mut handler, &mut scene, KeyCode::KeyA);
        handler.handle(&mut scene, InputEvent::Scroll { dx: 0.0, dy: 12.0 });
        press(&mut handler, &mut scene, KeyCode::KeyC);
        handler.handle(&mut scene, InputEvent::MouseMove { x: 0.0, y: 0.0 });
        handler.handle(&mut scene, InputEvent::MouseMove { x: 40.0, y: 40.0 });

        press(&mut handler, &mut scene, KeyCode::KeyR);

        assert_eq!(scene.instances.len(), 3);
        assert_eq!(scene.camera, startup_camera);
        assert_eq!(scene.transform.scale, 1.0);
        assert_eq!(scene.transform.translation, Vec3::ZERO);
        assert_eq!(scene.rotation_degrees(), [0.0; 3]);
        assert!(!scene.animator.is_animating());
    }

    #[test]
    fn toggles_and_exit() {
        let (mut handler, mut scene) = setup();
        assert!(scene.show_axes);

        press(&mut handler, &mut scene, KeyCode::KeyF);
        press(&mut handler, &mut scene, KeyCode::KeyX);
        assert!(scene.wireframe);
        assert!(!scene.show_axes);

        assert_eq!(press(&mut handler, &mut scene, KeyCode::Escape), Some(Effect::Exit));
        assert_eq!(press(&mut handler, &mut scene, KeyCode::KeyQ), None);
        assert_eq!(handler.handle(&mut scene, InputEvent::KeyUp(KeyCode::Escape)), None);
    }
}
