use std::sync::Arc;
use color_eyre::Result;
use glam::Vec3;
use glow::HasContext;
use winit::keyboard::KeyCode;
use crate::app::input_state::InputState;
use crate::demos::{clear, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::primitives;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::framebuffer::{Framebuffer, FramebufferBuilder};
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::{Texture, TextureDesc, TextureOptions};
use crate::renderer::resources::vertex::VertexLayout;
use super::{CubesOnFloor, CHAPTER};

/// Post-processing applied when the off-screen image is drawn to the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostEffect {
    None,
    Inversion,
    Grayscale,
    Sharpen,
    Blur,
    EdgeDetection,
}

impl PostEffect {
    const ALL: [PostEffect; 6] = [
        PostEffect::None,
        PostEffect::Inversion,
        PostEffect::Grayscale,
        PostEffect::Sharpen,
        PostEffect::Blur,
        PostEffect::EdgeDetection,
    ];

    /// Value of the `effect` uniform selecting the branch in the screen shader
    pub fn index(&self) -> i32 {
        *self as i32
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() as usize + 1) % Self::ALL.len()]
    }
}

/// Renders the scene into a colour texture, then draws that texture on a full screen quad
pub struct Framebuffers {
    scene_shader: Shader,
    screen_shader: Shader,
    scene: CubesOnFloor,
    screen_quad: VertexArray,
    marble: Texture,
    metal: Texture,
    framebuffer: Framebuffer,
    effect: PostEffect,
}

impl Framebuffers {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let dir = config.shaders(CHAPTER);
        let scene_shader = Shader::load(gl, &dir, "framebuffers")?;
        let screen_shader = Shader::load(gl, &dir, "framebuffers_screen")?;
        let screen_quad = VertexArray::from_floats(
            gl,
            &primitives::SCREEN_QUAD,
            &VertexLayout::interleaved(&[2, 2]),
            glow::TRIANGLES,
        )?;
        let marble = Texture::from_path(gl, &config.asset("textures/marble.jpg"), TextureOptions::default())?;
        let metal = Texture::from_path(gl, &config.asset("textures/metal.png"), TextureOptions::default())?;

        let framebuffer = FramebufferBuilder::new()
            .color(TextureDesc::new(glow::RGB, glow::RGB, glow::UNSIGNED_BYTE))
            .depth_stencil_renderbuffer()
            .build(gl, config.width, config.height)?;

        scene_shader.use_program();
        scene_shader.set_int("texture1", 0);
        screen_shader.use_program();
        screen_shader.set_int("screenTexture", 0);

        Ok(Self {
            scene_shader,
            screen_shader,
            scene: CubesOnFloor::new(gl)?,
            screen_quad,
            marble,
            metal,
            framebuffer,
            effect: PostEffect::None,
        })
    }
}

impl Demo for Framebuffers {
    fn process_input(&mut self, input: &InputState) {
        if input.is_key_just_pressed(KeyCode::Space) {
            self.effect = self.effect.next();
            log::info!("Post effect: {:?}", self.effect);
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.framebuffer.resize(width, height)
    }

    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        let gl = frame.gl;

        self.framebuffer.bind();
        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }
        clear(gl, Vec3::splat(0.1), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        self.scene_shader.use_program();
        self.scene_shader.set_mat4("projection", &frame.projection());
        self.scene_shader.set_mat4("view", &frame.view());
        self.scene.draw(&self.scene_shader, Some(&self.marble), Some(&self.metal));

        Framebuffer::unbind(gl, frame.width, frame.height);
        unsafe {
            gl.disable(glow::DEPTH_TEST);
        }
        clear(gl, Vec3::ONE, glow::COLOR_BUFFER_BIT);
        self.screen_shader.use_program();
        self.screen_shader.set_int("effect", self.effect.index());
        self.framebuffer.color(0).bind(0);
        self.screen_quad.draw();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_cycle_back_to_none() {
        let mut effect = PostEffect::None;
        for _ in 0..PostEffect::ALL.len() {
            effect = effect.next();
        }
        assert_eq!(effect, PostEffect::None);
        assert_eq!(PostEffect::None.next(), PostEffect::Inversion);
    }

    #[test]
    fn effect_indices_match_screen_shader() {
        assert_eq!(PostEffect::None.index(), 0);
        assert_eq!(PostEffect::EdgeDetection.index(), 5);
    }
}
