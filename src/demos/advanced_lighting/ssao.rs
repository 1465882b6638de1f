use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat4, Vec2, Vec3};
use glow::HasContext;
use rand::Rng;
use crate::demos::{clear, screen_quad, unit_cube, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::framebuffer::{Framebuffer, FramebufferBuilder};
use crate::renderer::resources::model::Model;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::{Texture, TextureDesc};
use super::CHAPTER;

const KERNEL_SIZE: usize = 64;
const NOISE_SIZE: u32 = 4;
const LIGHT_POS: Vec3 = Vec3::new(2.0, 4.0, -2.0);
const LIGHT_COLOR: Vec3 = Vec3::new(0.2, 0.2, 0.7);

/// Sample offsets in a unit hemisphere around +z, denser close to the origin
pub fn ssao_kernel(rng: &mut impl Rng, size: usize) -> Vec<Vec3> {
    (0..size)
        .map(|i| {
            let sample = Vec3::new(
                rng.random::<f32>() * 2.0 - 1.0,
                rng.random::<f32>() * 2.0 - 1.0,
                rng.random::<f32>(),
            )
            .normalize_or_zero()
                * rng.random::<f32>();

            let t = i as f32 / size as f32;
            let scale = 0.1 + (1.0 - 0.1) * t * t;
            sample * scale
        })
        .collect()
}

/// Random rotations around the surface normal, tiled over the screen
pub fn ssao_noise(rng: &mut impl Rng, count: usize) -> Vec<Vec3> {
    (0..count)
        .map(|_| Vec3::new(rng.random::<f32>() * 2.0 - 1.0, rng.random::<f32>() * 2.0 - 1.0, 0.0))
        .collect()
}

/// Screen-space ambient occlusion over a view-space G-buffer: occlusion pass, 4x4 blur,
/// then a single light shaded with the blurred occlusion as its ambient term
pub struct Ssao {
    geometry_shader: Shader,
    ssao_shader: Shader,
    blur_shader: Shader,
    lighting_shader: Shader,
    model: Model,
    cube: VertexArray,
    quad: VertexArray,
    g_buffer: Framebuffer,
    ssao_target: Framebuffer,
    blur_target: Framebuffer,
    noise: Texture,
}

impl Ssao {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let dir = config.shaders(CHAPTER);
        let geometry_shader = Shader::load(gl, &dir, "ssao_geometry")?;
        let ssao_shader = Shader::new(gl, &dir, "screen_quad", "ssao", None)?;
        let blur_shader = Shader::new(gl, &dir, "screen_quad", "ssao_blur", None)?;
        let lighting_shader = Shader::new(gl, &dir, "screen_quad", "ssao_lighting", None)?;
        let model = Model::load(gl, &config.asset("objects/backpack/backpack.obj"), false)?;

        let (width, height) = (config.width, config.height);
        let g_buffer = FramebufferBuilder::new()
            .color(TextureDesc::new(glow::RGBA16F, glow::RGBA, glow::FLOAT).with_filter(glow::NEAREST))
            .color(TextureDesc::new(glow::RGBA16F, glow::RGBA, glow::FLOAT).with_filter(glow::NEAREST))
            .color(TextureDesc::new(glow::RGBA, glow::RGBA, glow::UNSIGNED_BYTE).with_filter(glow::NEAREST))
            .depth_renderbuffer()
            .build(gl, width, height)?;
        let occlusion = FramebufferBuilder::new()
            .color(TextureDesc::new(glow::R16F, glow::RED, glow::FLOAT).with_filter(glow::NEAREST));
        let ssao_target = occlusion.build(gl, width, height)?;
        let blur_target = occlusion.build(gl, width, height)?;

        let mut rng = rand::rng();
        let kernel = ssao_kernel(&mut rng, KERNEL_SIZE);
        let noise_data = ssao_noise(&mut rng, (NOISE_SIZE * NOISE_SIZE) as usize);
        let noise = Texture::from_raw_2d(
            gl,
            NOISE_SIZE,
            NOISE_SIZE,
            TextureDesc::new(glow::RGB32F, glow::RGB, glow::FLOAT)
                .with_filter(glow::NEAREST)
                .with_wrap(glow::REPEAT),
            Some(bytemuck::cast_slice(&noise_data)),
        )?;

        ssao_shader.use_program();
        ssao_shader.set_int("gPosition", 0);
        ssao_shader.set_int("gNormal", 1);
        ssao_shader.set_int("texNoise", 2);
        ssao_shader.set_vec3_array("samples", &kernel);
        blur_shader.use_program();
        blur_shader.set_int("ssaoInput", 0);
        lighting_shader.use_program();
        lighting_shader.set_int("gPosition", 0);
        lighting_shader.set_int("gNormal", 1);
        lighting_shader.set_int("gAlbedo", 2);
        lighting_shader.set_int("ssao", 3);

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            geometry_shader,
            ssao_shader,
            blur_shader,
            lighting_shader,
            model,
            cube: unit_cube(gl)?,
            quad: screen_quad(gl)?,
            g_buffer,
            ssao_target,
            blur_target,
            noise,
        })
    }

    fn geometry_pass(&self, gl: &glow::Context, projection: &Mat4, view: &Mat4) {
        self.g_buffer.bind();
        clear(gl, Vec3::ZERO, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        self.geometry_shader.use_program();
        self.geometry_shader.set_mat4("projection", projection);
        self.geometry_shader.set_mat4("view", view);

        // Room around the scene, seen from inside
        let room = Mat4::from_translation(Vec3::new(0.0, 7.0, 0.0)) * Mat4::from_scale(Vec3::splat(7.5));
        self.geometry_shader.set_mat4("model", &room);
        self.geometry_shader.set_bool("invertedNormals", true);
        self.cube.draw();
        self.geometry_shader.set_bool("invertedNormals", false);

        let model = Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0))
            * Mat4::from_rotation_x(-90.0_f32.to_radians());
        self.geometry_shader.set_mat4("model", &model);
        self.model.draw(&self.geometry_shader);
    }
}

impl Demo for Ssao {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.g_buffer.resize(width, height)?;
        self.ssao_target.resize(width, height)?;
        self.blur_target.resize(width, height)
    }

    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        let gl = frame.gl;
        let projection = frame.projection();
        let view = frame.view();

        self.geometry_pass(gl, &projection, &view);

        self.ssao_target.bind();
        clear(gl, Vec3::ZERO, glow::COLOR_BUFFER_BIT);
        self.ssao_shader.use_program();
        self.ssao_shader.set_mat4("projection", &projection);
        self.ssao_shader.set_vec2(
            "noiseScale",
            Vec2::new(frame.width as f32, frame.height as f32) / NOISE_SIZE as f32,
        );
        self.g_buffer.color(0).bind(0);
        self.g_buffer.color(1).bind(1);
        self.noise.bind(2);
        self.quad.draw();

        self.blur_target.bind();
        clear(gl, Vec3::ZERO, glow::COLOR_BUFFER_BIT);
        self.blur_shader.use_program();
        self.ssao_target.color(0).bind(0);
        self.quad.draw();

        Framebuffer::unbind(gl, frame.width, frame.height);
        clear(gl, Vec3::ZERO, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        self.lighting_shader.use_program();
        self.lighting_shader.set_vec3("light.Position", view.transform_point3(LIGHT_POS));
        self.lighting_shader.set_vec3("light.Color", LIGHT_COLOR);
        self.lighting_shader.set_float("light.Linear", 0.09);
        self.lighting_shader.set_float("light.Quadratic", 0.032);
        for i in 0..3 {
            self.g_buffer.color(i).bind(i as u32);
        }
        self.blur_target.color(0).bind(3);
        self.quad.draw();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn kernel_lies_in_the_upper_hemisphere() {
        let kernel = ssao_kernel(&mut StdRng::seed_from_u64(3), KERNEL_SIZE);
        assert_eq!(kernel.len(), 64);
        for sample in &kernel {
            assert!(sample.z >= 0.0);
            assert!(sample.length() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn kernel_samples_cluster_near_the_origin() {
        let kernel = ssao_kernel(&mut StdRng::seed_from_u64(5), KERNEL_SIZE);
        // The first sample is scaled by 0.1
        assert!(kernel[0].length() <= 0.1 + 1e-6);
        let first_quarter = kernel[..16].iter().map(|s| s.length()).fold(0.0, f32::max);
        assert!(first_quarter <= 0.1 + 0.9 * (15.0 / 64.0_f32).powi(2) + 1e-5);
    }

    #[test]
    fn noise_rotates_around_z() {
        let noise = ssao_noise(&mut StdRng::seed_from_u64(11), 16);
        assert_eq!(noise.len(), 16);
        assert!(noise.iter().all(|n| n.z == 0.0 && n.x.abs() <= 1.0 && n.y.abs() <= 1.0));
    }
}
