use std::f32::consts::TAU;
use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use glow::HasContext;
use rand::Rng;
use crate::demos::{clear, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::resources::model::Model;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::vertex::VertexLayout;
use crate::renderer::shader_data::PerInstanceData;
use super::CHAPTER;

const ASTEROID_COUNT: usize = 100_000;
const RING_RADIUS: f32 = 150.0;
const RING_OFFSET: f32 = 25.0;
/// First of the four attribute slots taken by the per-instance model matrix
const INSTANCE_MATRIX_LOCATION: u32 = 3;

/// Model matrices of `count` rocks scattered around a ring in the XZ plane.
/// The ring is thinner vertically than horizontally.
pub fn asteroid_transforms(rng: &mut impl Rng, count: usize, radius: f32, offset: f32) -> Vec<PerInstanceData> {
    let spread = (2.0 * offset * 100.0) as u32;

    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * TAU;
            let x = angle.sin() * radius + rng_hundredths(rng, spread) - offset;
            let y = (rng_hundredths(rng, spread) - offset) * 0.4;
            let z = angle.cos() * radius + rng_hundredths(rng, spread) - offset;

            let scale = rng_hundredths(rng, 20) + 0.05;
            let rotation = (rng.random_range(0..360) as f32).to_radians();

            let model = Mat4::from_translation(Vec3::new(x, y, z))
                * Mat4::from_scale(Vec3::splat(scale))
                * Mat4::from_axis_angle(Vec3::new(0.4, 0.6, 0.8).normalize(), rotation);
            PerInstanceData { model }
        })
        .collect()
}

/// Random whole number below `bound` divided by 100
fn rng_hundredths(rng: &mut impl Rng, bound: u32) -> f32 {
    rng.random_range(0..bound.max(1)) as f32 / 100.0
}

/// A planet ringed by instanced rocks, each with its own model matrix attribute
pub struct Asteroids {
    planet_shader: Shader,
    rock_shader: Shader,
    planet: Model,
    rock: Model,
    instance_count: i32,
}

impl Asteroids {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let dir = config.shaders(CHAPTER);
        let planet_shader = Shader::load(gl, &dir, "planet")?;
        let rock_shader = Shader::load(gl, &dir, "asteroids")?;
        let planet = Model::load(gl, &config.asset("objects/planet/planet.obj"), false)?;
        let mut rock = Model::load(gl, &config.asset("objects/rock/rock.obj"), false)?;

        let transforms = asteroid_transforms(&mut rand::rng(), ASTEROID_COUNT, RING_RADIUS, RING_OFFSET);
        let layout = VertexLayout::mat4(INSTANCE_MATRIX_LOCATION);
        for mesh in rock.get_meshes_mut() {
            mesh.get_vertex_array_mut().add_instance_buffer(&transforms, &layout)?;
        }
        log::info!("Placed {} asteroids", transforms.len());

        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            planet_shader,
            rock_shader,
            planet,
            rock,
            instance_count: transforms.len() as i32,
        })
    }
}

impl Demo for Asteroids {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, Vec3::splat(0.1), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        let projection = frame.projection();
        let view = frame.view();

        self.planet_shader.use_program();
        self.planet_shader.set_mat4("projection", &projection);
        self.planet_shader.set_mat4("view", &view);
        let planet_model = Mat4::from_translation(Vec3::new(0.0, -3.0, 0.0)) * Mat4::from_scale(Vec3::splat(4.0));
        self.planet_shader.set_mat4("model", &planet_model);
        self.planet.draw(&self.planet_shader);

        self.rock_shader.use_program();
        self.rock_shader.set_mat4("projection", &projection);
        self.rock_shader.set_mat4("view", &view);
        for mesh in self.rock.get_meshes() {
            mesh.draw_instanced(&self.rock_shader, self.instance_count);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rocks_stay_within_the_ring() {
        let mut rng = StdRng::seed_from_u64(7);
        let transforms = asteroid_transforms(&mut rng, 1000, RING_RADIUS, RING_OFFSET);
        assert_eq!(transforms.len(), 1000);

        for PerInstanceData { model } in transforms {
            let position = model.w_axis.truncate();
            let horizontal = position.truncate().with_y(position.z).length();
            assert!(horizontal >= RING_RADIUS - 2.0 * RING_OFFSET);
            assert!(horizontal <= RING_RADIUS + 2.0 * RING_OFFSET);
            assert!(position.y.abs() <= RING_OFFSET * 0.4);

            let scale = model.x_axis.truncate().length();
            assert!((0.05..0.25).contains(&scale), "scale {scale}");
        }
    }

    #[test]
    fn same_seed_gives_same_ring() {
        let a = asteroid_transforms(&mut StdRng::seed_from_u64(1), 10, 10.0, 1.0);
        let b = asteroid_transforms(&mut StdRng::seed_from_u64(1), 10, 10.0, 1.0);
        assert_eq!(a.iter().map(|t| t.model).collect::<Vec<_>>(), b.iter().map(|t| t.model).collect::<Vec<_>>());
    }
}
