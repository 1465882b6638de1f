pub mod args;
pub mod camera_controller;
pub mod input_state;

use std::time::Instant;
use color_eyre::{Report, Result};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, WindowId};
use crate::app::camera_controller::CameraController;
use crate::app::input_state::InputState;
use crate::demos::{Demo, DemoKind};
use crate::renderer::config::RenderConfig;
use crate::renderer::Renderer;

pub struct App {
    event_loop: Option<EventLoop<()>>,
    demo_kind: DemoKind,
    config: RenderConfig,

    renderer: Option<Renderer>,
    demo: Option<Box<dyn Demo>>,
    camera_controller: CameraController,

    // State
    input_state: InputState,
    start_time: Instant,
    prev_frame_time: Instant,
    error: Option<Report>,
}

impl App {
    pub fn new(demo_kind: DemoKind, config: RenderConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;
        let (mode, camera) = demo_kind.camera_setup();

        Ok(Self {
            event_loop: Some(event_loop),
            demo_kind,
            config,

            renderer: None,
            demo: None,
            camera_controller: CameraController::new(camera, mode),

            input_state: InputState::default(),
            start_time: Instant::now(),
            prev_frame_time: Instant::now(),
            error: None,
        })
    }

    /// Runs the event loop until the window closes or a frame fails
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.run_app(&mut self)?;

        // GL objects have to go before the context that owns them
        self.demo = None;
        self.renderer = None;

        match self.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let renderer = Renderer::new(event_loop, &self.config)?;
        log::info!("Starting demo {:?}: {}", self.demo_kind, self.demo_kind.description());
        let demo = self.demo_kind.create(renderer.get_gl(), &self.config)?;

        if self.camera_controller.get_mode().captures_cursor() {
            let window = renderer.get_window();
            if let Err(e) = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
            {
                log::warn!("Could not capture the cursor: {e}");
            }
            window.set_cursor_visible(false);
            self.input_state.reset_first_mouse();
        }

        self.renderer = Some(renderer);
        self.demo = Some(demo);
        self.start_time = Instant::now();
        self.prev_frame_time = self.start_time;
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let (Some(renderer), Some(demo)) = (self.renderer.as_mut(), self.demo.as_mut()) else {
            return Ok(());
        };

        let curr_frame_time = Instant::now();
        let delta_time = curr_frame_time.duration_since(self.prev_frame_time).as_secs_f32();
        self.prev_frame_time = curr_frame_time;
        let time = curr_frame_time.duration_since(self.start_time).as_secs_f32();

        let projection_changed = self.camera_controller.process_input(&self.input_state, delta_time);
        demo.process_input(&self.input_state);
        self.input_state.reset_frame();

        renderer.draw(
            demo.as_mut(),
            self.camera_controller.get_camera(),
            time,
            delta_time,
            projection_changed,
        )
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Report) {
        log::error!("{error:?}");
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent
    ) {
        match self.renderer.as_ref() {
            Some(renderer) if renderer.get_window().id() == window_id => {}
            _ => return,
        }

        self.input_state.process_window_events(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.request_resize();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
            }
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    state: ElementState::Pressed,
                    ..
                },
                ..
            } => {
                event_loop.exit();
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if self.camera_controller.get_mode().captures_cursor() {
            self.input_state.process_device_events(&event);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.as_ref() {
            renderer.get_window().request_redraw();
        }
    }
}
