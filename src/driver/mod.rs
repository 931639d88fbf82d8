//! Frame loop
//!
//! [`FrameDriver`] runs the display-synchronized update/render cycle: each
//! frame it re-registers itself with a [`FrameScheduler`], spins the scene's
//! objects, steps the optional [`InteractionController`] and hands the scene
//! to a [`SceneRenderer`]. It also reprojects the camera when the viewport is
//! resized.

pub mod frame;
pub mod scheduler;

pub use frame::{FrameContext, FrameDriver, StopHandle, Viewport};
pub use scheduler::WindowScheduler;

use crate::render::camera::{Camera, PointerEvent};
use crate::render::RenderError;
use crate::scene::Scene;

/// Host facility that calls back into the driver once per repaint.
pub trait FrameScheduler {
    /// Requests exactly one [`FrameDriver::run_frame`] call at the next
    /// repaint opportunity.
    fn schedule_next_frame(&mut self);
}

/// Backend that turns a scene and camera into a displayed frame.
pub trait SceneRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), RenderError>;

    /// Output size in logical pixels.
    fn set_output_size(&mut self, width: u32, height: u32);

    fn output_size(&self) -> (u32, u32);

    /// Ratio of physical to logical pixels on high-density displays.
    fn set_pixel_density(&mut self, _ratio: f64) {}
}

/// Camera interaction that integrates over frames, such as damped orbiting.
pub trait InteractionController {
    /// Advances one step and writes the result into `camera`. Returns whether
    /// the camera moved.
    fn update(&mut self, camera: &mut Camera) -> bool;

    /// Feeds host pointer input. `viewport` is the current output size.
    fn handle_pointer(&mut self, _event: PointerEvent, _viewport: (u32, u32), _camera: &Camera) {}
}
