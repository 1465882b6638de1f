use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use glow::HasContext;
use crate::demos::{clear, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::primitives;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::vertex::VertexLayout;
use super::CHAPTER;

const LIGHT_POS: Vec3 = Vec3::new(1.2, 1.0, 2.0);
const OBJECT_COLOR: Vec3 = Vec3::new(1.0, 0.5, 0.31);
const LIGHT_COLOR: Vec3 = Vec3::ONE;

/// A coral cube next to the small white cube standing in for the light
pub struct Colors {
    lighting_shader: Shader,
    lamp_shader: Shader,
    cube: VertexArray,
}

impl Colors {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let dir = config.shaders(CHAPTER);
        let lighting_shader = Shader::load(gl, &dir, "colors")?;
        let lamp_shader = Shader::load(gl, &dir, "light_cube")?;
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
            lighting_shader,
            lamp_shader,
            cube,
        })
    }
}

impl Demo for Colors {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, Vec3::splat(0.1), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        let projection = frame.projection();
        let view = frame.view();

        self.lighting_shader.use_program();
        self.lighting_shader.set_vec3("objectColor", OBJECT_COLOR);
        self.lighting_shader.set_vec3("lightColor", LIGHT_COLOR);
        self.lighting_shader.set_mat4("projection", &projection);
        self.lighting_shader.set_mat4("view", &view);
        self.lighting_shader.set_mat4("model", &Mat4::IDENTITY);
        self.cube.draw();

        self.lamp_shader.use_program();
        self.lamp_shader.set_mat4("projection", &projection);
        self.lamp_shader.set_mat4("view", &view);
        self.lamp_shader.set_mat4("model", &lamp_model(LIGHT_POS));
        self.cube.draw();
        Ok(())
    }
}

/// Small cube marking a light source
pub(super) fn lamp_model(position: Vec3) -> Mat4 {
    Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(0.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lamp_is_a_fifth_of_the_cube() {
        let model = lamp_model(LIGHT_POS);
        assert_eq!(model.transform_point3(Vec3::ZERO), LIGHT_POS);
        assert!(model.transform_point3(Vec3::splat(0.5)).abs_diff_eq(LIGHT_POS + Vec3::splat(0.1), 1e-6));
    }
}
