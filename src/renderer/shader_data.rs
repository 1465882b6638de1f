use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Camera matrices shared between programs through the `Matrices` uniform block (std140)
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, Pod, Zeroable)]
pub struct MatricesBlock {
    pub projection: Mat4,
    pub view: Mat4,
}

impl MatricesBlock {
    pub const PROJECTION_OFFSET: i32 = 0;
    pub const VIEW_OFFSET: i32 = size_of::<Mat4>() as i32;
}

/// Data unique to each instance passed through an instanced vertex attribute
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, Pod, Zeroable)]
pub struct PerInstanceData {
    pub model: Mat4,
}

/// Vertex of the instanced quad, a 2D position and a colour
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, Pod, Zeroable)]
pub struct ColoredQuadVertex {
    pub position: Vec2,
    pub color: Vec3,
}

/// Point light as uploaded to the lighting passes
#[derive(Debug, Default, Copy, Clone)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrices_block_matches_std140_layout() {
        assert_eq!(size_of::<MatricesBlock>(), 128);
        assert_eq!(MatricesBlock::VIEW_OFFSET, 64);
    }

    #[test]
    fn instance_data_is_four_vec4_columns() {
        assert_eq!(size_of::<PerInstanceData>(), 4 * 16);
    }

    #[test]
    fn colored_quad_vertex_is_tightly_packed() {
        assert_eq!(size_of::<ColoredQuadVertex>(), 5 * 4);
    }
}
