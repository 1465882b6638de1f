mod asteroids;
mod depth_testing;
mod framebuffers;
mod instancing;
mod uniform_buffers;

pub use asteroids::Asteroids;
pub use depth_testing::DepthTesting;
pub use framebuffers::Framebuffers;
pub use instancing::InstancingQuads;
pub use uniform_buffers::UniformBuffers;

use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use crate::renderer::primitives;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::Texture;
use crate::renderer::resources::vertex::VertexLayout;

const CHAPTER: &str = "advanced_opengl";

const SCENE_CUBES: [Vec3; 2] = [Vec3::new(-1.0, 0.0, -1.0), Vec3::new(2.0, 0.0, 0.0)];

/// Two unit cubes resting on a textured floor, drawn with position (3) and texture coordinates (2)
struct CubesOnFloor {
    cube: VertexArray,
    floor: VertexArray,
}

impl CubesOnFloor {
    fn new(gl: &Arc<glow::Context>) -> Result<Self> {
        let layout = VertexLayout::interleaved(&[3, 2]);
        let cube = VertexArray::from_floats(gl, &primitives::cube(0.5, false, true), &layout, glow::TRIANGLES)?;
        let floor_data = primitives::select_attributes(
            &primitives::plane(5.0, -0.5, 2.0),
            primitives::CUBE_STRIDE,
            &[(0, 3), (6, 2)],
        );
        let floor = VertexArray::from_floats(gl, &floor_data, &layout, glow::TRIANGLES)?;

        Ok(Self {
            cube,
            floor,
        })
    }

    /// Draws with `shader` already in use, binding the textures to unit 0 when given
    fn draw(&self, shader: &Shader, cube_texture: Option<&Texture>, floor_texture: Option<&Texture>) {
        if let Some(texture) = cube_texture {
            texture.bind(0);
        }
        for position in SCENE_CUBES {
            shader.set_mat4("model", &Mat4::from_translation(position));
            self.cube.draw();
        }

        if let Some(texture) = floor_texture {
            texture.bind(0);
        }
        shader.set_mat4("model", &Mat4::IDENTITY);
        self.floor.draw();
    }
}
