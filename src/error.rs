use thiserror::Error;

/// Fatal errors raised while bringing up the window and GPU resources.
///
/// None of these can occur once the frame loop is running.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    /// Shader compilation or pipeline linking was rejected by validation.
    #[error("{stage} failed validation:\n{message}")]
    Shader { stage: &'static str, message: String },
}
