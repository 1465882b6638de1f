use std::sync::Arc;
use color_eyre::Result;
use glam::Vec3;
use crate::demos::{clear, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::vertex::VertexLayout;
use super::CHAPTER;

/// Position (3), colour (3)
#[rustfmt::skip]
const VERTICES: [f32; 18] = [
     0.5, -0.5, 0.0, 1.0, 0.0, 0.0,
    -0.5, -0.5, 0.0, 0.0, 1.0, 0.0,
     0.0,  0.5, 0.0, 0.0, 0.0, 1.0,
];

/// Triangle with per-vertex colours, shaders read from files
pub struct ShaderClass {
    shader: Shader,
    triangle: VertexArray,
}

impl ShaderClass {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let shader = Shader::load(gl, &config.shaders(CHAPTER), "shader_class")?;
        let triangle = VertexArray::from_floats(
            gl,
            &VERTICES,
            &VertexLayout::interleaved(&[3, 3]),
            glow::TRIANGLES,
        )?;

        Ok(Self {
            shader,
            triangle,
        })
    }
}

impl Demo for ShaderClass {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, Vec3::new(0.2, 0.3, 0.3), glow::COLOR_BUFFER_BIT);
        self.shader.use_program();
        self.triangle.draw();
        Ok(())
    }
}
