use std::sync::Arc;
use color_eyre::Result;
use glam::{Vec2, Vec3};
use crate::demos::{clear, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::vertex::VertexLayout;
use crate::renderer::shader_data::ColoredQuadVertex;
use super::CHAPTER;

const OFFSET_LOCATION: u32 = 2;

const fn vertex(x: f32, y: f32, r: f32, g: f32, b: f32) -> ColoredQuadVertex {
    ColoredQuadVertex {
        position: Vec2::new(x, y),
        color: Vec3::new(r, g, b),
    }
}

const QUAD: [ColoredQuadVertex; 6] = [
    vertex(-0.05, 0.05, 1.0, 0.0, 0.0),
    vertex(0.05, -0.05, 0.0, 1.0, 0.0),
    vertex(-0.05, -0.05, 0.0, 0.0, 1.0),
    vertex(-0.05, 0.05, 1.0, 0.0, 0.0),
    vertex(0.05, -0.05, 0.0, 1.0, 0.0),
    vertex(0.05, 0.05, 0.0, 1.0, 1.0),
];

/// Offsets of a 10x10 grid covering clip space, row by row from the bottom
pub fn instance_offsets() -> Vec<Vec2> {
    let offset = 0.1;
    (-10..10)
        .step_by(2)
        .flat_map(|y| {
            (-10..10)
                .step_by(2)
                .map(move |x| Vec2::new(x as f32 / 10.0 + offset, y as f32 / 10.0 + offset))
        })
        .collect()
}

/// 100 small quads drawn with one call, each moved by its own instanced offset
pub struct InstancingQuads {
    shader: Shader,
    quad: VertexArray,
    instance_count: i32,
}

impl InstancingQuads {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let shader = Shader::load(gl, &config.shaders(CHAPTER), "instancing")?;
        let mut quad = VertexArray::new(
            gl,
            &QUAD,
            None,
            &VertexLayout::interleaved(&[2, 3]),
            glow::TRIANGLES,
        )?;

        let offsets = instance_offsets();
        quad.add_instance_buffer(&offsets, &VertexLayout::interleaved_from(OFFSET_LOCATION, &[2]))?;

        Ok(Self {
            shader,
            quad,
            instance_count: offsets.len() as i32,
        })
    }
}

impl Demo for InstancingQuads {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, Vec3::splat(0.1), glow::COLOR_BUFFER_BIT);
        self.shader.use_program();
        self.quad.draw_instanced(self.instance_count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_a_hundred_evenly_spaced_offsets() {
        let offsets = instance_offsets();
        assert_eq!(offsets.len(), 100);
        assert!(offsets[0].abs_diff_eq(Vec2::new(-0.9, -0.9), 1e-6));
        assert!(offsets[1].abs_diff_eq(Vec2::new(-0.7, -0.9), 1e-6));
        assert!(offsets[10].abs_diff_eq(Vec2::new(-0.9, -0.7), 1e-6));
        assert!(offsets[99].abs_diff_eq(Vec2::new(0.9, 0.9), 1e-6));
    }

    #[test]
    fn quad_vertices_are_tightly_packed() {
        assert_eq!(size_of_val(&QUAD) as i32, VertexLayout::interleaved(&[2, 3]).stride * 6);
    }
}
