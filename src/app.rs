use std::sync::Arc;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

use crate::compose::FramePlan;
use crate::config::ViewerConfig;
use crate::cube_pass::CubePass;
use crate::error::InitError;
use crate::gpu::GpuContext;
use crate::input::{Effect, InputEvent, InputHandler};
use crate::scene::SceneState;

const CONTROLS: &[&str] = &[
    "W/S - rotate about X",
    "A/D - rotate about Y",
    "I/J - rotate about Z",
    "[/] - scale down/up",
    "arrows, PageUp/PageDown - translate",
    "SPACE - add cube instance",
    "F - toggle wireframe",
    "X - toggle axes",
    "C - toggle camera mode (mouse steers the view)",
    "R - reset view",
    "ESC - exit",
];

/// Open the viewer window and run until it is closed.
///
/// Returns an error if the window or any GPU resource cannot be created;
/// nothing is rendered in that case.
///
/// # Example
/// ```no_run
/// cubeviz::run(cubeviz::ViewerConfig::new().title("Cubes")).unwrap();
/// ```
pub fn run(config: ViewerConfig) -> Result<(), InitError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::Pending { config };
    event_loop.run_app(&mut app)?;

    match app {
        ViewerApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

enum ViewerApp {
    Pending { config: ViewerConfig },
    Running(Box<Viewer>),
    Failed(InitError),
}

struct Viewer {
    window: Arc<Window>,
    gpu: GpuContext,
    pass: CubePass,
    scene: SceneState,
    input: InputHandler,
    config: ViewerConfig,
    /// Accumulated raw mouse motion while the cursor is grabbed.
    virtual_cursor: Vec2,
}

impl Viewer {
    fn new(event_loop: &ActiveEventLoop, config: ViewerConfig) -> Result<Self, InitError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;
        let pass = CubePass::new(&gpu, &config)?;

        log::info!("controls:");
        for line in CONTROLS {
            log::info!("  {line}");
        }

        Ok(Self {
            window,
            gpu,
            pass,
            scene: SceneState::new(&config),
            input: InputHandler::new(&config),
            config,
            virtual_cursor: Vec2::ZERO,
        })
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: InputEvent) {
        match self.input.handle(&mut self.scene, event) {
            Some(Effect::Exit) => event_loop.exit(),
            Some(Effect::CaptureCursor(capture)) => self.capture_cursor(capture),
            None => {}
        }
    }

    fn capture_cursor(&self, capture: bool) {
        let result = if capture {
            self.window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(err) = result {
            log::warn!("cursor grab change failed: {err}");
        }
        self.window.set_cursor_visible(!capture);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.scene.animator.step();
        let plan = FramePlan::compose(&self.scene, &self.config);

        match self.pass.render(&self.gpu, &plan) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory");
                event_loop.exit();
                return;
            }
            Err(err) => log::warn!("skipping frame: {err}"),
        }

        self.window.request_redraw();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let ViewerApp::Pending { config } = self {
            match Viewer::new(event_loop, config.clone()) {
                Ok(viewer) => *self = ViewerApp::Running(Box::new(viewer)),
                Err(err) => {
                    *self = ViewerApp::Failed(err);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let ViewerApp::Running(viewer) = self else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                viewer.gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                viewer.redraw(event_loop);
            }
            // Raw device motion drives the camera while the cursor is grabbed.
            WindowEvent::CursorMoved { .. } if viewer.scene.camera_mode => {}
            _ => {
                if let Some(input) = InputEvent::from_window_event(&event) {
                    viewer.dispatch(event_loop, input);
                }
            }
        }
    }

    fn device_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let ViewerApp::Running(viewer) = self else {
            return;
        };

        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if viewer.scene.camera_mode {
                viewer.virtual_cursor += Vec2::new(dx as f32, dy as f32);
                let Vec2 { x, y } = viewer.virtual_cursor;
                viewer.dispatch(event_loop, InputEvent::MouseMove { x, y });
            }
        }
    }
}
