use std::sync::Arc;
use color_eyre::Result;
use glam::Vec3;
use glow::HasContext;
use crate::demos::{clear, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::resources::shader::Shader;
use super::{SphereScene, CHAPTER};

const MIN_ROUGHNESS: f32 = 0.025;

/// Cook-Torrance shading of the sphere grid under four point lights, no environment
pub struct PbrLighting {
    shader: Shader,
    scene: SphereScene,
}

impl PbrLighting {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let shader = Shader::load(gl, &config.shaders(CHAPTER), "pbr")?;
        shader.use_program();
        shader.set_vec3("albedo", Vec3::new(0.5, 0.0, 0.0));
        shader.set_float("ao", 1.0);

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            shader,
            scene: SphereScene::new(gl, MIN_ROUGHNESS)?,
        })
    }
}

impl Demo for PbrLighting {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, Vec3::splat(0.1), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        self.shader.use_program();
        self.shader.set_mat4("projection", &frame.projection());
        self.shader.set_mat4("view", &frame.view());
        self.shader.set_vec3("camPos", frame.camera.get_position());
        self.scene.draw(&self.shader);
        Ok(())
    }
}
