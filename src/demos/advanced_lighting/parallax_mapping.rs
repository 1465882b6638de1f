use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use glow::HasContext;
use crate::app::input_state::InputState;
use crate::demos::{clear, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::primitives;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::{Texture, TextureOptions};
use crate::renderer::resources::vertex::VertexLayout;
use super::{adjust_with_q_e, CHAPTER};

const LIGHT_POS: Vec3 = Vec3::new(0.5, 1.0, 0.3);
const DEFAULT_HEIGHT_SCALE: f32 = 0.1;
/// Height scale change per frame while Q or E is held
const HEIGHT_SCALE_STEP: f32 = 0.0005;

/// Brick wall quad displaced by parallax occlusion mapping in tangent space
pub struct ParallaxMapping {
    shader: Shader,
    quad: VertexArray,
    diffuse_map: Texture,
    normal_map: Texture,
    height_map: Texture,
    height_scale: f32,
}

impl ParallaxMapping {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let shader = Shader::load(gl, &config.shaders(CHAPTER), "parallax_mapping")?;
        let quad = VertexArray::from_floats(
            gl,
            &primitives::tangent_quad(),
            &VertexLayout::model_vertex(),
            glow::TRIANGLES,
        )?;
        let diffuse_map = Texture::from_path(gl, &config.asset("textures/bricks2.jpg"), TextureOptions::default())?;
        let normal_map = Texture::from_path(gl, &config.asset("textures/bricks2_normal.jpg"), TextureOptions::default())?;
        let height_map = Texture::from_path(gl, &config.asset("textures/bricks2_disp.jpg"), TextureOptions::default())?;

        shader.use_program();
        shader.set_int("diffuseMap", 0);
        shader.set_int("normalMap", 1);
        shader.set_int("depthMap", 2);
        shader.set_vec3("lightPos", LIGHT_POS);

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            shader,
            quad,
            diffuse_map,
            normal_map,
            height_map,
            height_scale: DEFAULT_HEIGHT_SCALE,
        })
    }
}

impl Demo for ParallaxMapping {
    fn process_input(&mut self, input: &InputState) {
        let height_scale = adjust_with_q_e(input, self.height_scale, HEIGHT_SCALE_STEP, 0.0, 1.0);
        if height_scale != self.height_scale {
            log::debug!("Height scale: {height_scale:.4}");
            self.height_scale = height_scale;
        }
    }

    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, Vec3::splat(0.1), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        let model = Mat4::from_axis_angle(
            Vec3::new(1.0, 0.0, 1.0).normalize(),
            (frame.time * -10.0).to_radians(),
        );

        self.shader.use_program();
        self.shader.set_mat4("projection", &frame.projection());
        self.shader.set_mat4("view", &frame.view());
        self.shader.set_mat4("model", &model);
        self.shader.set_vec3("viewPos", frame.camera.get_position());
        self.shader.set_float("heightScale", self.height_scale);

        self.diffuse_map.bind(0);
        self.normal_map.bind(1);
        self.height_map.bind(2);
        self.quad.draw();
        Ok(())
    }
}
