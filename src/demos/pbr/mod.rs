mod ibl;
mod lighting;

pub use ibl::{IblDemo, IblQuality};
pub use lighting::PbrLighting;

use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use crate::renderer::primitives;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::vertex::VertexLayout;
use crate::renderer::shader_data::PointLight;

const CHAPTER: &str = "pbr";

const GRID_ROWS: u32 = 7;
const GRID_COLUMNS: u32 = 7;
const GRID_SPACING: f32 = 2.5;

const LIGHT_INTENSITY: Vec3 = Vec3::splat(300.0);
const LIGHTS: [PointLight; 4] = [
    PointLight { position: Vec3::new(-10.0, 10.0, 10.0), color: LIGHT_INTENSITY },
    PointLight { position: Vec3::new(10.0, 10.0, 10.0), color: LIGHT_INTENSITY },
    PointLight { position: Vec3::new(-10.0, -10.0, 10.0), color: LIGHT_INTENSITY },
    PointLight { position: Vec3::new(10.0, -10.0, 10.0), color: LIGHT_INTENSITY },
];

/// Material and placement of one sphere in the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSphere {
    pub position: Vec3,
    pub metallic: f32,
    pub roughness: f32,
}

/// Spheres grow more metallic from the bottom row up and rougher from left to right.
/// Roughness is kept at or above `min_roughness`, a perfectly smooth sphere looks wrong.
pub fn sphere_grid(min_roughness: f32) -> Vec<GridSphere> {
    (0..GRID_ROWS)
        .flat_map(|row| (0..GRID_COLUMNS).map(move |col| (row, col)))
        .map(|(row, col)| GridSphere {
            position: Vec3::new(
                (col as f32 - (GRID_COLUMNS / 2) as f32) * GRID_SPACING,
                (row as f32 - (GRID_ROWS / 2) as f32) * GRID_SPACING,
                0.0,
            ),
            metallic: row as f32 / GRID_ROWS as f32,
            roughness: (col as f32 / GRID_COLUMNS as f32).clamp(min_roughness, 1.0),
        })
        .collect()
}

/// The sphere mesh plus the grid it is drawn in, shared by every PBR demo
struct SphereScene {
    sphere: VertexArray,
    grid: Vec<GridSphere>,
}

impl SphereScene {
    fn new(gl: &Arc<glow::Context>, min_roughness: f32) -> Result<Self> {
        let (vertices, indices) = primitives::sphere(64, 64);
        let sphere = VertexArray::from_floats_indexed(
            gl,
            &vertices,
            &indices,
            &VertexLayout::interleaved(&[3, 2, 3]),
            glow::TRIANGLE_STRIP,
        )?;
        Ok(Self {
            sphere,
            grid: sphere_grid(min_roughness),
        })
    }

    /// Draws the grid, then a small sphere at each light. `shader` must be in use.
    fn draw(&self, shader: &Shader) {
        for sphere in &self.grid {
            shader.set_float("metallic", sphere.metallic);
            shader.set_float("roughness", sphere.roughness);
            shader.set_mat4("model", &Mat4::from_translation(sphere.position));
            self.sphere.draw();
        }

        for (i, light) in LIGHTS.iter().enumerate() {
            shader.set_vec3(&format!("lightPositions[{i}]"), light.position);
            shader.set_vec3(&format!("lightColors[{i}]"), light.color);
            let model = Mat4::from_translation(light.position) * Mat4::from_scale(Vec3::splat(0.5));
            shader.set_mat4("model", &model);
            self.sphere.draw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_centred_on_the_origin() {
        let grid = sphere_grid(0.025);
        assert_eq!(grid.len(), 49);
        assert_eq!(grid[0].position, Vec3::new(-7.5, -7.5, 0.0));
        assert_eq!(grid[24].position, Vec3::ZERO);
        assert_eq!(grid[48].position, Vec3::new(7.5, 7.5, 0.0));
    }

    #[test]
    fn metallic_follows_rows_and_roughness_columns() {
        let grid = sphere_grid(0.025);
        // Second row, fourth column
        let sphere = grid[7 + 3];
        assert!((sphere.metallic - 1.0 / 7.0).abs() < 1e-6);
        assert!((sphere.roughness - 3.0 / 7.0).abs() < 1e-6);
        assert!(grid.iter().all(|s| s.metallic < 1.0));
    }

    #[test]
    fn first_column_roughness_is_clamped() {
        assert_eq!(sphere_grid(0.025)[0].roughness, 0.025);
        assert_eq!(sphere_grid(0.05)[14].roughness, 0.05);
    }
}
