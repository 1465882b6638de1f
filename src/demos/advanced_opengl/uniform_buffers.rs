use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use glow::HasContext;
use crate::demos::{clear, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::primitives;
use crate::renderer::resources::buffer::{Buffer, VertexArray};
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::vertex::VertexLayout;
use crate::renderer::shader_data::MatricesBlock;
use super::CHAPTER;

const MATRICES_BINDING: u32 = 0;

/// Fragment shader and position of each cube
const CUBES: [(&str, Vec3); 4] = [
    ("red", Vec3::new(-0.75, 0.75, 0.0)),
    ("green", Vec3::new(0.75, 0.75, 0.0)),
    ("yellow", Vec3::new(-0.75, -0.75, 0.0)),
    ("blue", Vec3::new(0.75, -0.75, 0.0)),
];

/// Four programs reading projection and view from one shared uniform buffer.
/// The projection is uploaded only when it changes, the view every frame.
pub struct UniformBuffers {
    shaders: Vec<(Shader, Vec3)>,
    cube: VertexArray,
    matrices: Buffer,
}

impl UniformBuffers {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let dir = config.shaders(CHAPTER);
        let shaders = CUBES
            .iter()
            .map(|(color, position)| {
                let shader = Shader::new(gl, &dir, "uniform_buffers", color, None)?;
                shader.bind_uniform_block("Matrices", MATRICES_BINDING);
                Ok((shader, *position))
            })
            .collect::<Result<Vec<_>>>()?;

        let matrices = Buffer::with_size(
            gl,
            glow::UNIFORM_BUFFER,
            size_of::<MatricesBlock>(),
            glow::STATIC_DRAW,
        )?;
        matrices.bind_base(MATRICES_BINDING);

        let cube = VertexArray::from_floats(
            gl,
            &primitives::cube(0.5, false, false),
            &VertexLayout::interleaved(&[3]),
            glow::TRIANGLES,
        )?;

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            shaders,
            cube,
            matrices,
        })
    }
}

impl Demo for UniformBuffers {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, Vec3::splat(0.1), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        if frame.projection_changed {
            self.matrices.write(MatricesBlock::PROJECTION_OFFSET, &[frame.projection()])?;
        }
        self.matrices.write(MatricesBlock::VIEW_OFFSET, &[frame.view()])?;

        for (shader, position) in &self.shaders {
            shader.use_program();
            shader.set_mat4("model", &Mat4::from_translation(*position));
            self.cube.draw();
        }
        Ok(())
    }
}
