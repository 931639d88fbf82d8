use thiserror::Error;

/// Failure to stand up the GPU side of the renderer.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported texture formats")]
    UnsupportedSurface,
}

/// A frame could not be produced and the renderer cannot recover by itself.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("GPU ran out of memory")]
    OutOfMemory,
    #[error("surface error: {0}")]
    Surface(wgpu::SurfaceError),
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(error: wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            other => RenderError::Surface(other),
        }
    }
}
