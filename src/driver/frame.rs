use super::{FrameScheduler, InteractionController, SceneRenderer};
use crate::render::camera::{Camera, PointerEvent};
use crate::render::RenderError;
use crate::scene::Scene;
use std::cell::Cell;
use std::rc::Rc;

/// Cloneable flag that keeps a [`FrameDriver`] looping.
///
/// Clearing it from anywhere on the driver's thread cancels the next frame.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    running: Rc<Cell<bool>>,
}

impl StopHandle {
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn stop(&self) {
        self.running.set(false);
    }

    fn start(&self) {
        self.running.set(true);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Everything a frame touches, owned in one place.
pub struct FrameContext<R> {
    pub scene: Scene,
    pub camera: Camera,
    pub renderer: R,
    pub controller: Option<Box<dyn InteractionController>>,
}

pub struct FrameDriver<S, R> {
    scheduler: S,
    context: FrameContext<R>,
    viewport: Viewport,
    handle: StopHandle,
    frames: u64,
}

impl<S: FrameScheduler, R: SceneRenderer> FrameDriver<S, R> {
    /// The viewport starts at the renderer's current output size; the camera's
    /// aspect is left as configured until the first resize.
    pub fn new(scheduler: S, context: FrameContext<R>) -> Self {
        let (width, height) = context.renderer.output_size();
        Self {
            scheduler,
            context,
            viewport: Viewport { width, height },
            handle: StopHandle::default(),
            frames: 0,
        }
    }

    /// Marks the loop running and schedules the first frame.
    pub fn start(&mut self) {
        if self.handle.is_running() {
            return;
        }
        log::info!("Frame loop started");
        self.handle.start();
        self.scheduler.schedule_next_frame();
    }

    /// Cancels the next scheduled frame. Frames delivered afterwards are ignored.
    pub fn stop(&mut self) {
        if self.handle.is_running() {
            log::info!("Frame loop stopped after {} frames", self.frames);
        }
        self.handle.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.handle.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    /// Runs one frame: reschedule, spin, step the controller, render.
    ///
    /// Returns `Ok(false)` without side effects when the loop is stopped.
    pub fn run_frame(&mut self) -> Result<bool, RenderError> {
        if !self.handle.is_running() {
            return Ok(false);
        }

        self.scheduler.schedule_next_frame();

        for object in self.context.scene.objects_mut() {
            object.advance();
        }
        log::trace!(
            "Frame {}: advanced {} objects",
            self.frames + 1,
            self.context.scene.objects().len()
        );

        if let Some(controller) = &mut self.context.controller {
            controller.update(&mut self.context.camera);
        }

        self.frames += 1;
        let frame = self.frames;
        self.context
            .renderer
            .render(&self.context.scene, &self.context.camera)
            .inspect_err(|e| log::error!("Frame {} failed: {}", frame, e))?;

        Ok(true)
    }

    /// Reprojects the camera for the new viewport, then resizes the renderer.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring resize to {}x{}", width, height);
            return;
        }

        log::debug!("Resize to {}x{}", width, height);
        self.viewport = Viewport { width, height };
        self.context.camera.aspect = self.viewport.aspect_ratio();
        self.context.camera.update_projection_matrix();
        self.context.renderer.set_output_size(width, height);
    }

    pub fn set_pixel_density(&mut self, ratio: f64) {
        self.context.renderer.set_pixel_density(ratio);
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if let Some(controller) = &mut self.context.controller {
            let viewport = (self.viewport.width, self.viewport.height);
            controller.handle_pointer(event, viewport, &self.context.camera);
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scene(&self) -> &Scene {
        &self.context.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.context.camera
    }

    pub fn renderer(&self) -> &R {
        &self.context.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.context.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_handle_clones_share_state() {
        let handle = StopHandle::default();
        let other = handle.clone();
        handle.start();
        assert!(other.is_running());
        other.stop();
        assert!(!handle.is_running());
    }

    #[test]
    fn viewport_aspect_is_width_over_height() {
        let viewport = Viewport {
            width: 1280,
            height: 720,
        };
        assert_eq!(viewport.aspect_ratio(), 1280.0 / 720.0);
    }
}
