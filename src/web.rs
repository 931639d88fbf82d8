//! WASM entry point: mounts the frame loop on the page's `#canvas` element.
//!
//! The preset comes from the page URL (`?preset=orbit`), falling back to the
//! basic spinning cube. `background=%23rrggbb` overrides the scene background.

use crate::driver::{FrameDriver, WindowScheduler};
use crate::render::{GpuContext, PointerButton, PointerEvent, WgpuRenderer};
use crate::scene::{Color, ScenePreset};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::web::EventLoopExtWebSys;
use winit::platform::web::WindowAttributesExtWebSys;
use winit::window::{Window, WindowId};

const CANVAS_ID: &str = "canvas";

type Driver = FrameDriver<WindowScheduler, WgpuRenderer>;

struct App {
    preset: ScenePreset,
    background: Option<Color>,
    window: Option<Arc<Window>>,
    driver: Rc<RefCell<Option<Driver>>>,
    follow_pixel_density: bool,
}

impl App {
    fn new(preset: ScenePreset, background: Option<Color>) -> Self {
        Self {
            preset,
            background,
            window: None,
            driver: Rc::new(RefCell::new(None)),
            follow_pixel_density: preset.config().follow_pixel_density,
        }
    }

    fn pixel_density(&self, scale_factor: f64) -> f64 {
        if self.follow_pixel_density {
            scale_factor
        } else {
            1.0
        }
    }
}

fn find_canvas() -> Option<HtmlCanvasElement> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CANVAS_ID))
        .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
}

/// First value of `key` in the page's query string that parses as `T`.
fn query_param<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let search = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();

    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(name, _)| *name == key)
        .find_map(|(_, value)| {
            let value = value.replace("%23", "#");
            match value.parse() {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    log::warn!("Ignoring `{}`: {}", key, e);
                    None
                }
            }
        })
}

fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> (u32, u32) {
    let logical: LogicalSize<u32> = size.to_logical(scale_factor);
    (logical.width, logical.height)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let Some(canvas) = find_canvas() else {
            log::error!("Could not find canvas element with id '{}'", CANVAS_ID);
            event_loop.exit();
            return;
        };

        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let window_attrs = Window::default_attributes()
            .with_canvas(Some(canvas))
            .with_inner_size(PhysicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let slot = self.driver.clone();
        let mut config = self.preset.config();
        if let Some(background) = self.background {
            config = config.with_background(background);
        }
        let density = self.pixel_density(window.scale_factor());

        wasm_bindgen_futures::spawn_local(async move {
            let gpu = match GpuContext::new(window.clone()).await {
                Ok(gpu) => gpu,
                Err(e) => {
                    log::error!("Failed to initialise the GPU: {}", e);
                    return;
                }
            };

            let (width, height) = logical_size(window.inner_size(), window.scale_factor());
            let mut renderer = WgpuRenderer::new(gpu, (width, height), density);
            renderer.set_window_size(window.inner_size());

            let mut driver = FrameDriver::new(
                WindowScheduler::new(window),
                crate::frame_context(config, renderer),
            );
            driver.on_resize(width, height);
            driver.start();

            *slot.borrow_mut() = Some(driver);
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(window) = &self.window else {
            return;
        };
        let scale_factor = window.scale_factor();

        let mut slot = self.driver.borrow_mut();
        let Some(driver) = slot.as_mut() else {
            // GPU still initialising; the driver reads the current size once ready.
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                driver.stop();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                let (width, height) = logical_size(size, scale_factor);
                driver.renderer_mut().set_window_size(size);
                driver.on_resize(width, height);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if self.follow_pixel_density {
                    driver.set_pixel_density(scale_factor);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return,
                };
                driver.handle_pointer(match state {
                    ElementState::Pressed => PointerEvent::Pressed(button),
                    ElementState::Released => PointerEvent::Released(button),
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let position: LogicalPosition<f32> = position.to_logical(scale_factor);
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
                    log::error!("Stopping frame loop: {}", e);
                    driver.stop();
                }
            }

            _ => {}
        }
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Warn).is_err() {
        return Err(JsValue::from_str("logger already initialised"));
    }

    let event_loop = EventLoop::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
    let preset = query_param("preset").unwrap_or_default();
    event_loop.spawn_app(App::new(preset, query_param("background")));
    Ok(())
}
