use std::sync::Arc;
use color_eyre::Result;
use glam::Vec3;
use glow::HasContext;
use crate::demos::{clear, cube_model, Demo, FrameContext, CUBE_POSITIONS};
use crate::renderer::config::RenderConfig;
use crate::renderer::primitives;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::{Texture, TextureOptions};
use crate::renderer::resources::vertex::VertexLayout;
use super::CHAPTER;

const LIGHT_DIRECTION: Vec3 = Vec3::new(-0.2, -1.0, -0.3);

/// Lighting maps on the ten containers under a single directional light
pub struct LightCasters {
    shader: Shader,
    cube: VertexArray,
    diffuse_map: Texture,
    specular_map: Texture,
}

impl LightCasters {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let shader = Shader::load(gl, &config.shaders(CHAPTER), "light_casters")?;
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
        shader.set_vec3("light.direction", LIGHT_DIRECTION);
        shader.set_vec3("light.ambient", Vec3::splat(0.2));
        shader.set_vec3("light.diffuse", Vec3::splat(0.5));
        shader.set_vec3("light.specular", Vec3::ONE);
        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            shader,
            cube,
            diffuse_map,
            specular_map,
        })
    }
}

impl Demo for LightCasters {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, Vec3::splat(0.1), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        self.shader.use_program();
        self.shader.set_vec3("viewPos", frame.camera.get_position());
        self.shader.set_mat4("projection", &frame.projection());
        self.shader.set_mat4("view", &frame.view());

        self.diffuse_map.bind(0);
        self.specular_map.bind(1);
        for i in 0..CUBE_POSITIONS.len() {
            self.shader.set_mat4("model", &cube_model(i));
            self.cube.draw();
        }
        Ok(())
    }
}
