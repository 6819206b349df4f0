//! Window and frame loop glue between winit, the controller and the renderer.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use glam::{Mat4, Vec3};
use log::{debug, error, info, warn};
use pollster::block_on;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::controller::TransformController;
use crate::input::{InputState, KeyCode, NamedKey};
use crate::mesh::PrismMesh;
use crate::render::{CameraParams, Renderer};

pub const WINDOW_TITLE: &str = "Prism Viewer";
pub const WINDOW_SIZE: (u32, u32) = (800, 800);

const PIXELS_PER_LINE: f32 = 40.0;

/// How the generated mesh is placed in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawMode {
    /// One closed prism.
    Solid,
    /// A flat cap polygon drawn at `+half_length` and `-half_length`.
    CapsOnly { half_length: f32 },
}

impl DrawMode {
    /// Model matrices for one frame given the controller's object transform.
    pub fn models(&self, object: Mat4) -> Vec<Mat4> {
        match *self {
            DrawMode::Solid => vec![object],
            DrawMode::CapsOnly { half_length } => [half_length, -half_length]
                .into_iter()
                .map(|z| object * Mat4::from_translation(Vec3::new(0.0, 0.0, z)))
                .collect(),
        }
    }
}

/// Failure to bring up the event loop or the window.
#[derive(Debug, Error)]
#[error("failed to initialize {stage}: {message}")]
pub struct WindowInitError {
    pub stage: &'static str,
    pub message: String,
}

impl WindowInitError {
    pub fn new(stage: &'static str, message: impl ToString) -> Self {
        Self {
            stage,
            message: message.to_string(),
        }
    }
}

/// All state owned by the running viewer.
pub struct PrismApp {
    mesh: PrismMesh,
    mode: DrawMode,
    controller: TransformController,
    input: InputState,
    renderer: Option<Renderer>,
    last_frame: Option<Instant>,
    last_error: Option<anyhow::Error>,
}

impl PrismApp {
    pub fn new(mesh: PrismMesh, mode: DrawMode, controller: TransformController) -> Self {
        Self {
            mesh,
            mode,
            controller,
            input: InputState::new(),
            renderer: None,
            last_frame: None,
            last_error: None,
        }
    }

    /// Error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.last_error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{err:?}");
        self.last_error = Some(err);
        event_loop.exit();
    }

    fn create_renderer(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1));
        let window = event_loop
            .create_window(attributes)
            .map_err(|err| WindowInitError::new("window", err))?;
        let renderer = block_on(Renderer::new(Arc::new(window), &self.mesh))?;
        renderer.window().request_redraw();
        self.renderer = Some(renderer);
        Ok(())
    }

    fn handle_keyboard(&mut self, event: &KeyEvent, event_loop: &ActiveEventLoop) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(key) = map_keycode(code) else {
            return;
        };
        match event.state {
            ElementState::Pressed => {
                if key == KeyCode::Named(NamedKey::Escape) {
                    info!("escape pressed, closing");
                    event_loop.exit();
                    return;
                }
                self.input.set_key_down(key);
            }
            ElementState::Released => self.input.set_key_up(key),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        self.controller.update(&self.input, dt);
        self.input.end_frame();

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let camera = CameraParams {
            view: self.controller.view_matrix(),
            projection: self.controller.projection_matrix(renderer.aspect()),
        };
        renderer.update_camera(&camera);
        let models = self.mode.models(self.controller.model_matrix());
        let fatal = match renderer.render(&models) {
            Ok(()) => None,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.reconfigure();
                None
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Some(anyhow!("GPU is out of memory")),
            Err(wgpu::SurfaceError::Timeout) => {
                debug!("surface timeout; retrying next frame");
                None
            }
            Err(other) => {
                warn!("failed to acquire surface texture: {other}");
                None
            }
        };
        if let Some(err) = fatal {
            self.fail(event_loop, err);
        }
    }
}

impl ApplicationHandler for PrismApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        if let Err(err) = self.create_renderer(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self
            .renderer
            .as_ref()
            .is_none_or(|renderer| renderer.window_id() != window_id)
        {
            return;
        }
        match event {
            WindowEvent::CloseRequested => {
                info!("window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size);
                }
            }
            WindowEvent::Focused(false) => self.input.release_all(),
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_keyboard(&event, event_loop);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                self.input.add_scroll(lines);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window().request_redraw();
        }
    }
}

fn map_keycode(code: WinitKey) -> Option<KeyCode> {
    Some(match code {
        WinitKey::Space => KeyCode::Named(NamedKey::Space),
        WinitKey::Enter => KeyCode::Named(NamedKey::Enter),
        WinitKey::Escape => KeyCode::Named(NamedKey::Escape),
        WinitKey::Backspace => KeyCode::Named(NamedKey::Backspace),
        WinitKey::ArrowLeft => KeyCode::Named(NamedKey::Left),
        WinitKey::ArrowRight => KeyCode::Named(NamedKey::Right),
        WinitKey::ArrowUp => KeyCode::Named(NamedKey::Up),
        WinitKey::ArrowDown => KeyCode::Named(NamedKey::Down),
        WinitKey::Digit0 => KeyCode::Digit(0),
        WinitKey::Digit1 => KeyCode::Digit(1),
        WinitKey::Digit2 => KeyCode::Digit(2),
        WinitKey::Digit3 => KeyCode::Digit(3),
        WinitKey::Digit4 => KeyCode::Digit(4),
        WinitKey::Digit5 => KeyCode::Digit(5),
        WinitKey::Digit6 => KeyCode::Digit(6),
        WinitKey::Digit7 => KeyCode::Digit(7),
        WinitKey::Digit8 => KeyCode::Digit(8),
        WinitKey::Digit9 => KeyCode::Digit(9),
        WinitKey::KeyA => KeyCode::Character('A'),
        WinitKey::KeyB => KeyCode::Character('B'),
        WinitKey::KeyC => KeyCode::Character('C'),
        WinitKey::KeyD => KeyCode::Character('D'),
        WinitKey::KeyE => KeyCode::Character('E'),
        WinitKey::KeyF => KeyCode::Character('F'),
        WinitKey::KeyG => KeyCode::Character('G'),
        WinitKey::KeyH => KeyCode::Character('H'),
        WinitKey::KeyI => KeyCode::Character('I'),
        WinitKey::KeyJ => KeyCode::Character('J'),
        WinitKey::KeyK => KeyCode::Character('K'),
        WinitKey::KeyL => KeyCode::Character('L'),
        WinitKey::KeyM => KeyCode::Character('M'),
        WinitKey::KeyN => KeyCode::Character('N'),
        WinitKey::KeyO => KeyCode::Character('O'),
        WinitKey::KeyP => KeyCode::Character('P'),
        WinitKey::KeyQ => KeyCode::Character('Q'),
        WinitKey::KeyR => KeyCode::Character('R'),
        WinitKey::KeyS => KeyCode::Character('S'),
        WinitKey::KeyT => KeyCode::Character('T'),
        WinitKey::KeyU => KeyCode::Character('U'),
        WinitKey::KeyV => KeyCode::Character('V'),
        WinitKey::KeyW => KeyCode::Character('W'),
        WinitKey::KeyX => KeyCode::Character('X'),
        WinitKey::KeyY => KeyCode::Character('Y'),
        WinitKey::KeyZ => KeyCode::Character('Z'),
        _ => return None,
    })
}
