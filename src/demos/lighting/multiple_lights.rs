use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat3, Vec3};
use glow::HasContext;
use crate::demos::{clear, cube_model, Demo, FrameContext, CUBE_POSITIONS};
use crate::renderer::config::RenderConfig;
use crate::renderer::primitives;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::{Texture, TextureOptions};
use crate::renderer::resources::vertex::VertexLayout;
use super::colors::lamp_model;
use super::CHAPTER;

const POINT_LIGHT_POSITIONS: [Vec3; 4] = [
    Vec3::new(0.7, 0.2, 2.0),
    Vec3::new(2.3, -3.3, -4.0),
    Vec3::new(-4.0, 2.0, -12.0),
    Vec3::new(0.0, 0.0, -3.0),
];

const SPOT_INNER_DEG: f32 = 12.5;
const SPOT_OUTER_DEG: f32 = 15.0;

/// Uniform name of one field of the `pointLights` array
fn point_light_uniform(index: usize, field: &str) -> String {
    format!("pointLights[{index}].{field}")
}

/// Directional, point and spot lights combined on the ten containers.
/// The spot light follows the camera like a flashlight.
pub struct MultipleLights {
    shader: Shader,
    lamp_shader: Shader,
    cube: VertexArray,
    diffuse_map: Texture,
    specular_map: Texture,
}

impl MultipleLights {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let dir = config.shaders(CHAPTER);
        let shader = Shader::load(gl, &dir, "multiple_lights")?;
        let lamp_shader = Shader::load(gl, &dir, "light_cube")?;
        let cube = VertexArray::from_floats(
            gl,
            &primitives::cube(0.5, true, true),
            &VertexLayout::interleaved(&[3, 3, 2]),
            glow::TRIANGLES,
        )?;
        let diffuse_map = Texture::from_path(gl, &config.asset("textures/container2.png"), TextureOptions::default())?;
        let specular_map = Texture::from_path(
            gl,
            &config.asset("textures/container2_specular.png"),
            TextureOptions::default(),
        )?;

        shader.use_program();
        shader.set_int("material.diffuse", 0);
        shader.set_int("material.specular", 1);
        shader.set_float("material.shininess", 32.0);

        shader.set_vec3("dirLight.direction", Vec3::new(-0.2, -1.0, -0.3));
        shader.set_vec3("dirLight.ambient", Vec3::splat(0.05));
        shader.set_vec3("dirLight.diffuse", Vec3::splat(0.4));
        shader.set_vec3("dirLight.specular", Vec3::splat(0.5));

        for (i, position) in POINT_LIGHT_POSITIONS.iter().enumerate() {
            shader.set_vec3(&point_light_uniform(i, "position"), *position);
            shader.set_vec3(&point_light_uniform(i, "ambient"), Vec3::splat(0.05));
            shader.set_vec3(&point_light_uniform(i, "diffuse"), Vec3::splat(0.8));
            shader.set_vec3(&point_light_uniform(i, "specular"), Vec3::ONE);
            shader.set_float(&point_light_uniform(i, "constant"), 1.0);
            shader.set_float(&point_light_uniform(i, "linear"), 0.09);
            shader.set_float(&point_light_uniform(i, "quadratic"), 0.032);
        }

        shader.set_vec3("spotLight.ambient", Vec3::ZERO);
        shader.set_vec3("spotLight.diffuse", Vec3::ONE);
        shader.set_vec3("spotLight.specular", Vec3::ONE);
        shader.set_float("spotLight.constant", 1.0);
        shader.set_float("spotLight.linear", 0.09);
        shader.set_float("spotLight.quadratic", 0.032);
        shader.set_float("spotLight.cutOff", SPOT_INNER_DEG.to_radians().cos());
        shader.set_float("spotLight.outerCutOff", SPOT_OUTER_DEG.to_radians().cos());

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            shader,
            lamp_shader,
            cube,
            diffuse_map,
            specular_map,
        })
    }
}

impl Demo for MultipleLights {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, Vec3::splat(0.1), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        let projection = frame.projection();
        let view = frame.view();

        self.shader.use_program();
        self.shader.set_vec3("viewPos", frame.camera.get_position());
        self.shader.set_vec3("spotLight.position", frame.camera.get_position());
        self.shader.set_vec3("spotLight.direction", frame.camera.get_front());
        self.shader.set_mat4("projection", &projection);
        self.shader.set_mat4("view", &view);

        self.diffuse_map.bind(0);
        self.specular_map.bind(1);
        for i in 0..CUBE_POSITIONS.len() {
            let model = cube_model(i);
            self.shader.set_mat4("model", &model);
            self.shader.set_mat3("normalMatrix", &Mat3::from_mat4(model).inverse().transpose());
            self.cube.draw();
        }

        self.lamp_shader.use_program();
        self.lamp_shader.set_mat4("projection", &projection);
        self.lamp_shader.set_mat4("view", &view);
        for position in POINT_LIGHT_POSITIONS {
            self.lamp_shader.set_mat4("model", &lamp_model(position));
            self.cube.draw();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_light_uniforms_index_the_array() {
        assert_eq!(point_light_uniform(2, "quadratic"), "pointLights[2].quadratic");
    }

    #[test]
    fn spot_cone_softens_outwards() {
        let inner = SPOT_INNER_DEG.to_radians().cos();
        let outer = SPOT_OUTER_DEG.to_radians().cos();
        assert!(inner > outer);
    }
}
