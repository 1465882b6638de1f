use std::sync::Arc;
use color_eyre::Result;
use glam::Vec3;
use glow::HasContext;
use crate::demos::{clear, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::resources::shader::Shader;
use super::{CubesOnFloor, CHAPTER};

/// Shows the depth buffer, linearized between the camera's clip planes, as greyscale
pub struct DepthTesting {
    shader: Shader,
    scene: CubesOnFloor,
}

impl DepthTesting {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let shader = Shader::load(gl, &config.shaders(CHAPTER), "depth_testing")?;
        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);
        }

        Ok(Self {
            shader,
            scene: CubesOnFloor::new(gl)?,
        })
    }
}

impl Demo for DepthTesting {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, Vec3::splat(0.1), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        self.shader.use_program();
        self.shader.set_float("near", frame.camera.get_near());
        self.shader.set_float("far", frame.camera.get_far());
        self.shader.set_mat4("projection", &frame.projection());
        self.shader.set_mat4("view", &frame.view());
        self.scene.draw(&self.shader, None, None);
        Ok(())
    }
}
