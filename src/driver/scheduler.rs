use super::FrameScheduler;
use std::sync::Arc;
use winit::window::Window;

/// Schedules frames through winit redraw requests.
///
/// The host must answer `WindowEvent::RedrawRequested` with
/// [`FrameDriver::run_frame`](super::FrameDriver::run_frame). On the web
/// backend a redraw request is serviced by `requestAnimationFrame`.
pub struct WindowScheduler {
    window: Arc<Window>,
}

impl WindowScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl FrameScheduler for WindowScheduler {
    fn schedule_next_frame(&mut self) {
        self.window.request_redraw();
    }
}
