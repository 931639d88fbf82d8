use anyhow::Context;
use clap::Parser;
use spin_scene::{
    frame_context, Color, FrameDriver, GpuContext, PointerButton, PointerEvent, ScenePreset,
    WgpuRenderer, WindowScheduler,
};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

type Driver = FrameDriver<WindowScheduler, WgpuRenderer>;

/// Spinning 3D scene rendered with WebGPU.
#[derive(Parser, Debug)]
#[command(name = "spin-scene", version, about)]
struct Args {
    /// Stock scene to show (basic, orbit, sparkles).
    #[arg(long, default_value_t = ScenePreset::Basic)]
    preset: ScenePreset,

    /// Initial window width, in logical pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height, in logical pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Disable orbit-control damping.
    #[arg(long)]
    no_damping: bool,

    /// Background color as `#rrggbb`, replacing the preset's.
    #[arg(long)]
    background: Option<Color>,
}

struct App {
    args: Args,
    window: Option<Arc<Window>>,
    driver: Option<Driver>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(args: Args) -> Self {
        Self {
            args,
            window: None,
            driver: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(format!("spin-scene: {}", self.args.preset))
            .with_inner_size(LogicalSize::new(self.args.width, self.args.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(GpuContext::new(window.clone()))
            .context("failed to initialise the GPU")?;

        let scale_factor = window.scale_factor();
        let (width, height) = logical_size(window.inner_size(), scale_factor);
        let mut renderer = WgpuRenderer::new(gpu, (width, height), scale_factor);
        renderer.set_window_size(window.inner_size());

        let mut config = self.args.preset.config();
        if self.args.no_damping {
            config = config.without_damping();
        }
        if let Some(background) = self.args.background {
            config = config.with_background(background);
        }
        log::info!("Showing preset {}", self.args.preset);

        let mut driver = FrameDriver::new(
            WindowScheduler::new(window.clone()),
            frame_context(config, renderer),
        );
        driver.on_resize(width, height);
        driver.start();

        self.window = Some(window);
        self.driver = Some(driver);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        if let Some(driver) = &mut self.driver {
            driver.stop();
        }
        self.error = Some(error);
        event_loop.exit();
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(driver) = &mut self.driver {
            driver.stop();
        }
        event_loop.exit();
    }
}

fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> (u32, u32) {
    let logical: LogicalSize<u32> = size.to_logical(scale_factor);
    (logical.width, logical.height)
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let (Some(window), Some(driver)) = (&self.window, &mut self.driver) else {
            if let WindowEvent::CloseRequested = event {
                event_loop.exit();
            }
            return;
        };

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                {
                    self.shutdown(event_loop);
                }
            }

            WindowEvent::Resized(size) => {
                let (width, height) = logical_size(size, window.scale_factor());
                driver.renderer_mut().set_window_size(size);
                driver.on_resize(width, height);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                driver.set_pixel_density(scale_factor);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = pointer_button(button) {
                    driver.handle_pointer(match state {
                        ElementState::Pressed => PointerEvent::Pressed(button),
                        ElementState::Released => PointerEvent::Released(button),
                    });
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let position: LogicalPosition<f32> = position.to_logical(window.scale_factor());
                driver.handle_pointer(PointerEvent::Moved {
                    x: position.x,
                    y: position.y,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                if scroll != 0.0 {
                    driver.handle_pointer(PointerEvent::Wheel(scroll));
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(e) = driver.run_frame() {
                    self.fail(event_loop, anyhow::Error::new(e).context("rendering failed"));
                }
            }

            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(args);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_show_the_basic_scene() {
        let args = Args::try_parse_from(["spin-scene"]).unwrap();
        assert_eq!(args.preset, ScenePreset::Basic);
        assert_eq!((args.width, args.height), (1280, 720));
        assert!(args.background.is_none());
    }

    #[test]
    fn background_flag_parses_css_hex() {
        let args = Args::try_parse_from(["spin-scene", "--preset", "orbit", "--background", "#1a2b3c"]).unwrap();
        assert_eq!(args.preset, ScenePreset::Orbit);
        assert_eq!(args.background, Some(Color::from_hex(0x1a2b3c)));
    }

    #[test]
    fn malformed_background_is_rejected() {
        for bad in ["1a2b3c", "#1a2b3", "#1a2b3g"] {
            assert!(Args::try_parse_from(["spin-scene", "--background", bad]).is_err(), "{}", bad);
        }
    }
}
