use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Vertex of an imported model, laid out for attribute locations 0 to 4
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

/// One float attribute inside an interleaved vertex buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: i32,
    /// Byte offset from the start of the vertex
    pub offset: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pub attributes: Vec<VertexAttribute>,
    /// Byte distance between consecutive vertices
    pub stride: i32,
}

impl VertexLayout {
    /// Tightly packed float attributes at consecutive locations starting from 0.
    /// `[3, 3, 2]` describes position, normal and texture coordinates.
    pub fn interleaved(components: &[i32]) -> Self {
        Self::interleaved_from(0, components)
    }

    pub fn interleaved_from(first_location: u32, components: &[i32]) -> Self {
        let float_size = size_of::<f32>() as i32;
        let mut offset = 0;
        let attributes = components
            .iter()
            .zip(first_location..)
            .map(|(&components, location)| {
                let attribute = VertexAttribute { location, components, offset };
                offset += components * float_size;
                attribute
            })
            .collect();

        Self {
            attributes,
            stride: offset,
        }
    }

    /// A mat4 occupies four consecutive vec4 attribute slots
    pub fn mat4(first_location: u32) -> Self {
        Self::interleaved_from(first_location, &[4, 4, 4, 4])
    }

    pub fn model_vertex() -> Self {
        Self::interleaved(&[3, 3, 2, 3, 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaved_offsets_accumulate() {
        let layout = VertexLayout::interleaved(&[3, 3, 2]);
        assert_eq!(layout.stride, 32);
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        let locations: Vec<_> = layout.attributes.iter().map(|a| a.location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
        assert_eq!(layout.attributes.len(), 3);
    }

    #[test]
    fn model_vertex_layout_matches_struct() {
        let layout = VertexLayout::model_vertex();
        assert_eq!(layout.stride as usize, size_of::<Vertex>());
        assert_eq!(layout.attributes[3].offset as usize, std::mem::offset_of!(Vertex, tangent));
    }

    #[test]
    fn mat4_layout_spans_four_locations() {
        let layout = VertexLayout::mat4(3);
        assert_eq!(layout.stride, 64);
        let locations: Vec<_> = layout.attributes.iter().map(|a| a.location).collect();
        assert_eq!(locations, vec![3, 4, 5, 6]);
        assert_eq!(layout.attributes[3].offset, 48);
    }
}
