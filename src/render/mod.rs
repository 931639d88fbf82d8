//! WebGPU Rendering module
//!
//! This module contains the GPU context, camera and controls, mesh generation,
//! and the scene renderer.

pub mod camera;
pub mod context;
pub mod error;
pub mod mesh;
pub mod pipeline;
pub mod renderer;

pub use camera::{Camera, OrbitControls, OrbitSettings, PointerButton, PointerEvent};
pub use context::GpuContext;
pub use error::{ContextError, RenderError};
pub use mesh::{Mesh, MeshData};
pub use pipeline::ScenePipeline;
pub use renderer::WgpuRenderer;
