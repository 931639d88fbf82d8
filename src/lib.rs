//! # spin-scene
//!
//! A minimal 3D scene (camera, a mesh or two, one light) spun by a
//! display-synchronized frame loop, rendered with WebGPU.
//!
//! ## Features
//! - [`FrameDriver`]: self-rescheduling update/render loop with a real `stop()`
//! - Resize-driven camera reprojection
//! - Optional damped orbit controls
//! - Stock scenes as presets
//! - Cross-platform: Native + WASM support
//!
//! ## Example
//! ```rust,ignore
//! use spin_scene::{FrameContext, FrameDriver, OrbitControls, ScenePreset, WgpuRenderer, WindowScheduler};
//!
//! let config = ScenePreset::Orbit.config();
//! let context = FrameContext {
//!     camera: config.camera.build(width as f32 / height as f32),
//!     scene: config.scene,
//!     renderer: WgpuRenderer::new(gpu, (width, height), 1.0),
//!     controller: config
//!         .controls
//!         .map(|s| Box::new(OrbitControls::new(s)) as Box<dyn spin_scene::InteractionController>),
//! };
//!
//! let mut driver = FrameDriver::new(WindowScheduler::new(window), context);
//! driver.start();
//! // on WindowEvent::RedrawRequested:
//! driver.run_frame()?;
//! ```

pub mod driver;
pub mod math;
pub mod render;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use driver::{
    FrameContext, FrameDriver, FrameScheduler, InteractionController, SceneRenderer, StopHandle,
    Viewport, WindowScheduler,
};
pub use math::Transform;
pub use render::{
    Camera, ContextError, GpuContext, OrbitControls, OrbitSettings, PointerButton, PointerEvent,
    RenderError, WgpuRenderer,
};
pub use scene::{
    Color, Geometry, Light, Material, Scene, SceneConfig, SceneObject, ScenePreset, Sparkles,
    SparklesConfig,
};

/// Builds the frame context for a configured scene.
pub fn frame_context<R: SceneRenderer>(config: SceneConfig, renderer: R) -> FrameContext<R> {
    let (width, height) = renderer.output_size();
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    let mut camera = config.camera.build(aspect);

    let controller = config.controls.map(|settings| {
        let mut controls = OrbitControls::new(settings);
        controls.update(&mut camera);
        Box::new(controls) as Box<dyn InteractionController>
    });

    FrameContext {
        scene: config.scene,
        camera,
        renderer,
        controller,
    }
}
