use std::sync::Arc;
use color_eyre::Result;
use glam::Vec3;
use glow::HasContext;
use winit::keyboard::KeyCode;
use crate::app::input_state::InputState;
use crate::demos::{clear, toggle_on_press, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::primitives;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::{Texture, TextureOptions};
use crate::renderer::resources::vertex::VertexLayout;
use super::CHAPTER;

const LIGHT_POSITIONS: [Vec3; 4] = [
    Vec3::new(-3.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(3.0, 0.0, 0.0),
];

const LIGHT_COLORS: [Vec3; 4] = [
    Vec3::splat(0.25),
    Vec3::splat(0.50),
    Vec3::splat(0.75),
    Vec3::splat(1.00),
];

/// Blinn-Phong wooden floor lit by four lights of increasing brightness.
/// With gamma correction on, the floor samples an sRGB texture and the shader re-encodes its output.
pub struct GammaCorrection {
    shader: Shader,
    floor: VertexArray,
    floor_texture: Texture,
    floor_texture_srgb: Texture,
    gamma_enabled: bool,
}

impl GammaCorrection {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let shader = Shader::load(gl, &config.shaders(CHAPTER), "gamma_correction")?;
        let floor = VertexArray::from_floats(
            gl,
            &primitives::plane(10.0, -0.5, 10.0),
            &VertexLayout::interleaved(&[3, 3, 2]),
            glow::TRIANGLES,
        )?;
        let wood = config.asset("textures/wood.png");
        let floor_texture = Texture::from_path(gl, &wood, TextureOptions::default())?;
        let floor_texture_srgb = Texture::from_path(gl, &wood, TextureOptions::default().with_gamma(true))?;

        shader.use_program();
        shader.set_int("floorTexture", 0);
        shader.set_vec3_array("lightPositions", &LIGHT_POSITIONS);
        shader.set_vec3_array("lightColors", &LIGHT_COLORS);

        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        }

        Ok(Self {
            shader,
            floor,
            floor_texture,
            floor_texture_srgb,
            gamma_enabled: false,
        })
    }
}

impl Demo for GammaCorrection {
    fn process_input(&mut self, input: &InputState) {
        toggle_on_press(input, KeyCode::Space, &mut self.gamma_enabled, "Gamma correction");
    }

    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, Vec3::splat(0.1), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        self.shader.use_program();
        self.shader.set_mat4("projection", &frame.projection());
        self.shader.set_mat4("view", &frame.view());
        self.shader.set_vec3("viewPos", frame.camera.get_position());
        self.shader.set_bool("gamma", self.gamma_enabled);

        if self.gamma_enabled {
            self.floor_texture_srgb.bind(0);
        } else {
            self.floor_texture.bind(0);
        }
        self.floor.draw();
        Ok(())
    }
}
