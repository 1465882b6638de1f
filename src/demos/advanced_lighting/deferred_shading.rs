use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use glow::HasContext;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::demos::{clear, screen_quad, unit_cube, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::framebuffer::{Framebuffer, FramebufferBuilder};
use crate::renderer::resources::model::Model;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::TextureDesc;
use crate::renderer::shader_data::PointLight;
use super::CHAPTER;

const LIGHT_COUNT: usize = 32;
const LIGHT_SEED: u64 = 13;
const LIGHT_CONSTANT: f32 = 1.0;
const LIGHT_LINEAR: f32 = 0.7;
const LIGHT_QUADRATIC: f32 = 1.8;

const OBJECT_POSITIONS: [Vec3; 9] = [
    Vec3::new(-3.0, -0.5, -3.0),
    Vec3::new(0.0, -0.5, -3.0),
    Vec3::new(3.0, -0.5, -3.0),
    Vec3::new(-3.0, -0.5, 0.0),
    Vec3::new(0.0, -0.5, 0.0),
    Vec3::new(3.0, -0.5, 0.0),
    Vec3::new(-3.0, -0.5, 3.0),
    Vec3::new(0.0, -0.5, 3.0),
    Vec3::new(3.0, -0.5, 3.0),
];

/// Random lights inside a 6x6x6 box around the objects, each with a bright colour in [0.5, 1)
pub fn scatter_lights(rng: &mut impl Rng, count: usize) -> Vec<PointLight> {
    let mut hundredths = || rng.random_range(0..100u32) as f32 / 100.0;
    (0..count)
        .map(|_| {
            let position = Vec3::new(
                hundredths() * 6.0 - 3.0,
                hundredths() * 6.0 - 4.0,
                hundredths() * 6.0 - 3.0,
            );
            let color = Vec3::new(
                hundredths() / 2.0 + 0.5,
                hundredths() / 2.0 + 0.5,
                hundredths() / 2.0 + 0.5,
            );
            PointLight { position, color }
        })
        .collect()
}

/// Distance at which the attenuated brightest channel falls to 5/256
pub fn light_volume_radius(color: Vec3) -> f32 {
    let max_brightness = color.max_element();
    let discriminant = LIGHT_LINEAR * LIGHT_LINEAR
        - 4.0 * LIGHT_QUADRATIC * (LIGHT_CONSTANT - (256.0 / 5.0) * max_brightness);
    (-LIGHT_LINEAR + discriminant.sqrt()) / (2.0 * LIGHT_QUADRATIC)
}

/// Geometry goes into position, normal and albedo/specular attachments, then one full screen pass
/// lights every pixel. The depth is copied back so the light cubes can be drawn forward on top.
pub struct DeferredShading {
    geometry_shader: Shader,
    lighting_shader: Shader,
    light_box_shader: Shader,
    model: Model,
    cube: VertexArray,
    quad: VertexArray,
    g_buffer: Framebuffer,
    lights: Vec<PointLight>,
}

impl DeferredShading {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let dir = config.shaders(CHAPTER);
        let geometry_shader = Shader::load(gl, &dir, "g_buffer")?;
        let lighting_shader = Shader::new(gl, &dir, "screen_quad", "deferred_shading", None)?;
        let light_box_shader = Shader::new(gl, &dir, "light_box", "deferred_light_box", None)?;
        let model = Model::load(gl, &config.asset("objects/backpack/backpack.obj"), false)?;

        let g_buffer = FramebufferBuilder::new()
            .color(TextureDesc::new(glow::RGBA16F, glow::RGBA, glow::FLOAT).with_filter(glow::NEAREST))
            .color(TextureDesc::new(glow::RGBA16F, glow::RGBA, glow::FLOAT).with_filter(glow::NEAREST))
            .color(TextureDesc::new(glow::RGBA, glow::RGBA, glow::UNSIGNED_BYTE).with_filter(glow::NEAREST))
            .depth_renderbuffer()
            .build(gl, config.width, config.height)?;

        let lights = scatter_lights(&mut StdRng::seed_from_u64(LIGHT_SEED), LIGHT_COUNT);
        lighting_shader.use_program();
        lighting_shader.set_int("gPosition", 0);
        lighting_shader.set_int("gNormal", 1);
        lighting_shader.set_int("gAlbedoSpec", 2);
        for (i, light) in lights.iter().enumerate() {
            lighting_shader.set_vec3(&format!("lights[{i}].Position"), light.position);
            lighting_shader.set_vec3(&format!("lights[{i}].Color"), light.color);
            lighting_shader.set_float(&format!("lights[{i}].Linear"), LIGHT_LINEAR);
            lighting_shader.set_float(&format!("lights[{i}].Quadratic"), LIGHT_QUADRATIC);
            lighting_shader.set_float(&format!("lights[{i}].Radius"), light_volume_radius(light.color));
        }

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            geometry_shader,
            lighting_shader,
            light_box_shader,
            model,
            cube: unit_cube(gl)?,
            quad: screen_quad(gl)?,
            g_buffer,
            lights,
        })
    }
}

impl Demo for DeferredShading {
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.g_buffer.resize(width, height)
    }

    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        let gl = frame.gl;
        let projection = frame.projection();
        let view = frame.view();

        self.g_buffer.bind();
        clear(gl, Vec3::ZERO, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        self.geometry_shader.use_program();
        self.geometry_shader.set_mat4("projection", &projection);
        self.geometry_shader.set_mat4("view", &view);
        for position in OBJECT_POSITIONS {
            let model = Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(0.5));
            self.geometry_shader.set_mat4("model", &model);
            self.model.draw(&self.geometry_shader);
        }

        Framebuffer::unbind(gl, frame.width, frame.height);
        clear(gl, Vec3::ZERO, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        self.lighting_shader.use_program();
        self.lighting_shader.set_vec3("viewPos", frame.camera.get_position());
        for i in 0..3 {
            self.g_buffer.color(i).bind(i as u32);
        }
        self.quad.draw();

        self.g_buffer.blit_depth_to_default(frame.width, frame.height);
        self.light_box_shader.use_program();
        self.light_box_shader.set_mat4("projection", &projection);
        self.light_box_shader.set_mat4("view", &view);
        for light in &self.lights {
            let model = Mat4::from_translation(light.position) * Mat4::from_scale(Vec3::splat(0.125));
            self.light_box_shader.set_mat4("model", &model);
            self.light_box_shader.set_vec3("lightColor", light.color);
            self.cube.draw();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lights_are_reproducible_from_the_seed() {
        let a = scatter_lights(&mut StdRng::seed_from_u64(LIGHT_SEED), LIGHT_COUNT);
        let b = scatter_lights(&mut StdRng::seed_from_u64(LIGHT_SEED), LIGHT_COUNT);
        assert_eq!(a.len(), 32);
        assert!(a.iter().zip(&b).all(|(a, b)| a.position == b.position && a.color == b.color));
    }

    #[test]
    fn lights_stay_in_their_box() {
        for light in scatter_lights(&mut StdRng::seed_from_u64(99), 200) {
            let p = light.position;
            assert!((-3.0..3.0).contains(&p.x));
            assert!((-4.0..2.0).contains(&p.y));
            assert!((-3.0..3.0).contains(&p.z));
            assert!(light.color.min_element() >= 0.5 && light.color.max_element() < 1.0);
        }
    }

    #[test]
    fn brighter_lights_reach_further() {
        let dim = light_volume_radius(Vec3::splat(0.5));
        let bright = light_volume_radius(Vec3::new(0.2, 1.0, 0.2));
        assert!(dim > 0.0);
        assert!(bright > dim);

        // The attenuated brightness at the radius is 5/256
        let attenuation = 1.0 / (LIGHT_CONSTANT + LIGHT_LINEAR * bright + LIGHT_QUADRATIC * bright * bright);
        assert!((attenuation - 5.0 / 256.0).abs() < 1e-4);
    }
}
