use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use crate::demos::{clear, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::{Texture, TextureOptions};
use crate::renderer::resources::vertex::VertexLayout;
use super::CHAPTER;

/// Position (3), texture coordinates (2)
#[rustfmt::skip]
const QUAD: [f32; 20] = [
     0.5,  0.5, 0.0, 1.0, 1.0,
     0.5, -0.5, 0.0, 1.0, 0.0,
    -0.5, -0.5, 0.0, 0.0, 0.0,
    -0.5,  0.5, 0.0, 0.0, 1.0,
];

const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

/// The rotating bottom-right quad and the pulsing top-left quad at `time` seconds
pub fn quad_transforms(time: f32) -> [Mat4; 2] {
    let rotating = Mat4::from_translation(Vec3::new(0.5, -0.5, 0.0)) * Mat4::from_rotation_z(time);
    let scaling = Mat4::from_translation(Vec3::new(-0.5, 0.5, 0.0)) * Mat4::from_scale(Vec3::splat(time.sin()));
    [rotating, scaling]
}

/// Two textured quads sharing one vertex array, each with its own transform
pub struct Transformations {
    shader: Shader,
    quad: VertexArray,
    container: Texture,
    face: Texture,
}

impl Transformations {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let shader = Shader::load(gl, &config.shaders(CHAPTER), "transform")?;
        let quad = VertexArray::from_floats_indexed(
            gl,
            &QUAD,
            &QUAD_INDICES,
            &VertexLayout::interleaved(&[3, 2]),
            glow::TRIANGLES,
        )?;
        let container = Texture::from_path(gl, &config.asset("textures/container.jpg"), TextureOptions::default())?;
        let face = Texture::from_path(gl, &config.asset("textures/awesomeface.png"), TextureOptions::default())?;

        shader.use_program();
        shader.set_int("texture1", 0);
        shader.set_int("texture2", 1);

        Ok(Self {
            shader,
            quad,
            container,
            face,
        })
    }
}

impl Demo for Transformations {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, Vec3::new(0.2, 0.3, 0.3), glow::COLOR_BUFFER_BIT);

        self.container.bind(0);
        self.face.bind(1);
        self.shader.use_program();
        for transform in quad_transforms(frame.time) {
            self.shader.set_mat4("transform", &transform);
            self.quad.draw();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn quads_start_in_opposite_corners() {
        let [rotating, scaling] = quad_transforms(0.0);
        assert_eq!(rotating * Vec4::W, Vec4::new(0.5, -0.5, 0.0, 1.0));
        // sin(0) collapses the second quad onto its centre
        assert_eq!(scaling * Vec4::new(0.5, 0.5, 0.0, 1.0), Vec4::new(-0.5, 0.5, 0.0, 1.0));
    }

    #[test]
    fn first_quad_rotates_with_time() {
        let [rotating, _] = quad_transforms(std::f32::consts::FRAC_PI_2);
        let corner = rotating * Vec4::new(0.5, 0.0, 0.0, 1.0);
        assert!(corner.abs_diff_eq(Vec4::new(0.5, 0.0, 0.0, 1.0), 1e-6));
    }
}
