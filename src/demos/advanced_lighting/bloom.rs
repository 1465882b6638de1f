use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use glow::HasContext;
use winit::keyboard::KeyCode;
use crate::app::input_state::InputState;
use crate::demos::{clear, screen_quad, toggle_on_press, unit_cube, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::framebuffer::{Framebuffer, FramebufferBuilder};
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::{Texture, TextureDesc, TextureOptions};
use crate::renderer::shader_data::PointLight;
use super::{adjust_with_q_e, CHAPTER};

const BLUR_PASSES: usize = 10;
const DEFAULT_EXPOSURE: f32 = 1.0;
/// Exposure change per frame while Q or E is held
const EXPOSURE_STEP: f32 = 0.01;

const HDR_COLOR: TextureDesc = TextureDesc::new(glow::RGBA16F, glow::RGBA, glow::FLOAT);

const LIGHTS: [PointLight; 4] = [
    PointLight { position: Vec3::new(0.0, 0.5, 1.5), color: Vec3::new(5.0, 5.0, 5.0) },
    PointLight { position: Vec3::new(-4.0, 0.5, -3.0), color: Vec3::new(10.0, 0.0, 0.0) },
    PointLight { position: Vec3::new(3.0, 0.5, 1.0), color: Vec3::new(0.0, 0.0, 15.0) },
    PointLight { position: Vec3::new(-0.8, 2.4, -1.0), color: Vec3::new(0.0, 5.0, 0.0) },
];

/// Translation, rotation around (1, 0, 1) in degrees and uniform scale of each container
const CONTAINERS: [(Vec3, f32, f32); 6] = [
    (Vec3::new(0.0, 1.5, 0.0), 0.0, 0.5),
    (Vec3::new(2.0, 0.0, 1.0), 0.0, 0.5),
    (Vec3::new(-1.0, -1.0, 2.0), 60.0, 1.0),
    (Vec3::new(0.0, 2.7, 4.0), 23.0, 1.25),
    (Vec3::new(-2.0, 1.0, -3.0), 124.0, 1.0),
    (Vec3::new(-3.0, 0.0, 0.0), 0.0, 0.5),
];

fn container_transform(&(position, angle_deg, scale): &(Vec3, f32, f32)) -> Mat4 {
    Mat4::from_translation(position)
        * Mat4::from_axis_angle(Vec3::new(1.0, 0.0, 1.0).normalize(), angle_deg.to_radians())
        * Mat4::from_scale(Vec3::splat(scale))
}

/// Which ping-pong target each blur pass reads and writes, alternating horizontal and vertical.
/// `None` as the source means the bright colour attachment of the scene.
pub fn blur_schedule(passes: usize) -> Vec<(bool, Option<usize>, usize)> {
    (0..passes)
        .map(|pass| {
            let horizontal = pass % 2 == 0;
            let target = if horizontal { 0 } else { 1 };
            let source = (pass > 0).then_some(1 - target);
            (horizontal, source, target)
        })
        .collect()
}

/// HDR scene whose bright parts are blurred with a two-pass gaussian and added back before tone mapping
pub struct Bloom {
    shader: Shader,
    light_shader: Shader,
    blur_shader: Shader,
    final_shader: Shader,
    cube: VertexArray,
    quad: VertexArray,
    wood: Texture,
    container: Texture,
    hdr: Framebuffer,
    ping_pong: [Framebuffer; 2],
    bloom_enabled: bool,
    exposure: f32,
}

impl Bloom {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let dir = config.shaders(CHAPTER);
        let shader = Shader::load(gl, &dir, "bloom")?;
        let light_shader = Shader::load(gl, &dir, "light_box")?;
        let blur_shader = Shader::new(gl, &dir, "screen_quad", "blur", None)?;
        let final_shader = Shader::new(gl, &dir, "screen_quad", "bloom_final", None)?;

        let srgb = TextureOptions::default().with_gamma(true);
        let wood = Texture::from_path(gl, &config.asset("textures/wood.png"), srgb)?;
        let container = Texture::from_path(gl, &config.asset("textures/container2.png"), srgb)?;

        let (width, height) = (config.width, config.height);
        let hdr = FramebufferBuilder::new()
            .color(HDR_COLOR)
            .color(HDR_COLOR)
            .depth_renderbuffer()
            .build(gl, width, height)?;
        let ping_pong_desc = FramebufferBuilder::new().color(HDR_COLOR);
        let ping_pong = [
            ping_pong_desc.build(gl, width, height)?,
            ping_pong_desc.build(gl, width, height)?,
        ];

        shader.use_program();
        shader.set_int("diffuseTexture", 0);
        for (i, light) in LIGHTS.iter().enumerate() {
            shader.set_vec3(&format!("lights[{i}].Position"), light.position);
            shader.set_vec3(&format!("lights[{i}].Color"), light.color);
        }
        blur_shader.use_program();
        blur_shader.set_int("image", 0);
        final_shader.use_program();
        final_shader.set_int("scene", 0);
        final_shader.set_int("bloomBlur", 1);

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            shader,
            light_shader,
            blur_shader,
            final_shader,
            cube: unit_cube(gl)?,
            quad: screen_quad(gl)?,
            wood,
            container,
            hdr,
            ping_pong,
            bloom_enabled: true,
            exposure: DEFAULT_EXPOSURE,
        })
    }

    fn render_scene(&self, frame: &FrameContext) {
        let projection = frame.projection();
        let view = frame.view();

        self.shader.use_program();
        self.shader.set_mat4("projection", &projection);
        self.shader.set_mat4("view", &view);
        self.shader.set_vec3("viewPos", frame.camera.get_position());

        self.wood.bind(0);
        let floor = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0)) * Mat4::from_scale(Vec3::new(12.5, 0.5, 12.5));
        self.shader.set_mat4("model", &floor);
        self.cube.draw();

        self.container.bind(0);
        for container in &CONTAINERS {
            self.shader.set_mat4("model", &container_transform(container));
            self.cube.draw();
        }

        self.light_shader.use_program();
        self.light_shader.set_mat4("projection", &projection);
        self.light_shader.set_mat4("view", &view);
        for light in &LIGHTS {
            let model = Mat4::from_translation(light.position) * Mat4::from_scale(Vec3::splat(0.25));
            self.light_shader.set_mat4("model", &model);
            self.light_shader.set_vec3("lightColor", light.color);
            self.cube.draw();
        }
    }

    /// Blurs the bright attachment and returns the index of the ping-pong target holding the result
    fn blur(&self) -> usize {
        self.blur_shader.use_program();
        let mut result = 0;
        for (horizontal, source, target) in blur_schedule(BLUR_PASSES) {
            self.ping_pong[target].bind();
            self.blur_shader.set_bool("horizontal", horizontal);
            match source {
                Some(source) => self.ping_pong[source].color(0).bind(0),
                None => self.hdr.color(1).bind(0),
            }
            self.quad.draw();
            result = target;
        }
        result
    }
}

/// Exposure after one frame of Q/E input, never below zero
fn next_exposure(input: &InputState, exposure: f32) -> f32 {
    adjust_with_q_e(input, exposure, EXPOSURE_STEP, 0.0, f32::MAX)
}

impl Demo for Bloom {
    fn process_input(&mut self, input: &InputState) {
        toggle_on_press(input, KeyCode::Space, &mut self.bloom_enabled, "Bloom");
        let exposure = next_exposure(input, self.exposure);
        if exposure != self.exposure {
            log::debug!("Exposure: {exposure:.3}");
            self.exposure = exposure;
        }
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.hdr.resize(width, height)?;
        for target in &mut self.ping_pong {
            target.resize(width, height)?;
        }
        Ok(())
    }

    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        let gl = frame.gl;

        self.hdr.bind();
        clear(gl, Vec3::ZERO, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        self.render_scene(frame);

        let blurred = self.blur();

        Framebuffer::unbind(gl, frame.width, frame.height);
        clear(gl, Vec3::ZERO, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        self.final_shader.use_program();
        self.final_shader.set_bool("bloom", self.bloom_enabled);
        self.final_shader.set_float("exposure", self.exposure);
        self.hdr.color(0).bind(0);
        self.ping_pong[blurred].color(0).bind(1);
        self.quad.draw();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposure_moves_a_hundredth_per_frame() {
        let mut input = InputState::default();
        input.on_key(KeyCode::KeyE, true, false);
        assert!((next_exposure(&input, DEFAULT_EXPOSURE) - 1.01).abs() < 1e-6);

        input.on_key(KeyCode::KeyE, false, false);
        input.on_key(KeyCode::KeyQ, true, false);
        assert!((next_exposure(&input, 0.5) - 0.49).abs() < 1e-6);
        assert_eq!(next_exposure(&input, 0.005), 0.0);
    }

    #[test]
    fn blur_starts_from_the_bright_attachment() {
        let schedule = blur_schedule(BLUR_PASSES);
        assert_eq!(schedule.len(), 10);
        assert_eq!(schedule[0], (true, None, 0));
        assert_eq!(schedule[1], (false, Some(0), 1));
        assert_eq!(schedule[2], (true, Some(1), 0));
    }

    #[test]
    fn blur_ends_after_a_vertical_pass() {
        let (horizontal, _, target) = *blur_schedule(BLUR_PASSES).last().unwrap();
        assert!(!horizontal);
        assert_eq!(target, 1);
    }

    #[test]
    fn every_pass_reads_what_the_previous_one_wrote() {
        let schedule = blur_schedule(6);
        for pair in schedule.windows(2) {
            assert_eq!(pair[1].1, Some(pair[0].2));
        }
    }
}
