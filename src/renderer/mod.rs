pub mod camera;
pub mod config;
pub mod primitives;
pub mod resources;
pub mod shader_data;
pub mod util;

mod context;
mod viewport;

use std::sync::Arc;
use color_eyre::Result;
use glow::HasContext;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;
use crate::demos::{Demo, FrameContext};
use crate::renderer::camera::Camera;
use crate::renderer::config::RenderConfig;
use crate::renderer::context::RenderContext;
use crate::renderer::viewport::RenderViewport;

pub struct Renderer {
    ctx: RenderContext,
    vpt: RenderViewport,

    resize_requested: bool,
}

impl Renderer {
    pub fn new(
        event_loop: &ActiveEventLoop,
        config: &RenderConfig,
    ) -> Result<Self> {
        let (window, gl_config) = RenderContext::create_window(event_loop, config)?;
        let (ctx, surface) = RenderContext::new(&window, &gl_config)?;
        let vpt = RenderViewport::new(window, surface);
        vpt.set_vsync(&ctx.gl_context, config.vsync);

        Ok(Self {
            ctx,
            vpt,
            resize_requested: true,
        })
    }

    pub fn get_gl(&self) -> &Arc<glow::Context> {
        &self.ctx.gl
    }

    pub fn get_window(&self) -> &Arc<Window> {
        &self.vpt.window
    }

    pub fn request_resize(&mut self) {
        self.resize_requested = true;
    }

    /// Renders one frame of `demo` and presents it
    pub fn draw(
        &mut self,
        demo: &mut dyn Demo,
        camera: &Camera,
        time: f32,
        delta_time: f32,
        mut projection_changed: bool,
    ) -> Result<()> {
        if self.resize_requested {
            self.resize_requested = false;
            if let Some(size) = self.vpt.resize(&self.ctx.gl, &self.ctx.gl_context) {
                demo.resize(size.width, size.height)?;
                projection_changed = true;
            }
        }

        if self.vpt.is_minimized() {
            return Ok(());
        }
        let size = self.vpt.get_size();

        let frame = FrameContext {
            gl: &self.ctx.gl,
            camera,
            width: size.width,
            height: size.height,
            time,
            delta_time,
            projection_changed,
        };
        demo.render(&frame)?;

        self.report_gl_errors();
        self.vpt.swap_buffers(&self.ctx.gl_context)
    }

    fn report_gl_errors(&self) {
        loop {
            let code = unsafe { self.ctx.gl.get_error() };
            if code == glow::NO_ERROR {
                break;
            }
            log::warn!("GL error during frame: {} (0x{code:04x})", util::gl_error_name(code));
        }
    }
}
