use std::f32::consts::PI;
use glam::{Vec2, Vec3};

/// Cube spanning [-1, 1] on every axis with counter-clockwise front faces.
/// Per vertex: position (3), normal (3), texture coordinates (2).
#[rustfmt::skip]
pub const CUBE: [f32; 288] = [
    // Back face
    -1.0, -1.0, -1.0,  0.0,  0.0, -1.0, 0.0, 0.0, // Bottom left
     1.0,  1.0, -1.0,  0.0,  0.0, -1.0, 1.0, 1.0, // Top right
     1.0, -1.0, -1.0,  0.0,  0.0, -1.0, 1.0, 0.0, // Bottom right
     1.0,  1.0, -1.0,  0.0,  0.0, -1.0, 1.0, 1.0, // Top right
    -1.0, -1.0, -1.0,  0.0,  0.0, -1.0, 0.0, 0.0, // Bottom left
    -1.0,  1.0, -1.0,  0.0,  0.0, -1.0, 0.0, 1.0, // Top left
    // Front face
    -1.0, -1.0,  1.0,  0.0,  0.0,  1.0, 0.0, 0.0, // Bottom left
     1.0, -1.0,  1.0,  0.0,  0.0,  1.0, 1.0, 0.0, // Bottom right
     1.0,  1.0,  1.0,  0.0,  0.0,  1.0, 1.0, 1.0, // Top right
     1.0,  1.0,  1.0,  0.0,  0.0,  1.0, 1.0, 1.0, // Top right
    -1.0,  1.0,  1.0,  0.0,  0.0,  1.0, 0.0, 1.0, // Top left
    -1.0, -1.0,  1.0,  0.0,  0.0,  1.0, 0.0, 0.0, // Bottom left
    // Left face
    -1.0,  1.0,  1.0, -1.0,  0.0,  0.0, 1.0, 0.0, // Top right
    -1.0,  1.0, -1.0, -1.0,  0.0,  0.0, 1.0, 1.0, // Top left
    -1.0, -1.0, -1.0, -1.0,  0.0,  0.0, 0.0, 1.0, // Bottom left
    -1.0, -1.0, -1.0, -1.0,  0.0,  0.0, 0.0, 1.0, // Bottom left
    -1.0, -1.0,  1.0, -1.0,  0.0,  0.0, 0.0, 0.0, // Bottom right
    -1.0,  1.0,  1.0, -1.0,  0.0,  0.0, 1.0, 0.0, // Top right
    // Right face
     1.0,  1.0,  1.0,  1.0,  0.0,  0.0, 1.0, 0.0, // Top left
     1.0, -1.0, -1.0,  1.0,  0.0,  0.0, 0.0, 1.0, // Bottom right
     1.0,  1.0, -1.0,  1.0,  0.0,  0.0, 1.0, 1.0, // Top right
     1.0, -1.0, -1.0,  1.0,  0.0,  0.0, 0.0, 1.0, // Bottom right
     1.0,  1.0,  1.0,  1.0,  0.0,  0.0, 1.0, 0.0, // Top left
     1.0, -1.0,  1.0,  1.0,  0.0,  0.0, 0.0, 0.0, // Bottom left
    // Bottom face
    -1.0, -1.0, -1.0,  0.0, -1.0,  0.0, 0.0, 1.0, // Top right
     1.0, -1.0, -1.0,  0.0, -1.0,  0.0, 1.0, 1.0, // Top left
     1.0, -1.0,  1.0,  0.0, -1.0,  0.0, 1.0, 0.0, // Bottom left
     1.0, -1.0,  1.0,  0.0, -1.0,  0.0, 1.0, 0.0, // Bottom left
    -1.0, -1.0,  1.0,  0.0, -1.0,  0.0, 0.0, 0.0, // Bottom right
    -1.0, -1.0, -1.0,  0.0, -1.0,  0.0, 0.0, 1.0, // Top right
    // Top face
    -1.0,  1.0, -1.0,  0.0,  1.0,  0.0, 0.0, 1.0, // Top left
     1.0,  1.0,  1.0,  0.0,  1.0,  0.0, 1.0, 0.0, // Bottom right
     1.0,  1.0, -1.0,  0.0,  1.0,  0.0, 1.0, 1.0, // Top right
     1.0,  1.0,  1.0,  0.0,  1.0,  0.0, 1.0, 0.0, // Bottom right
    -1.0,  1.0, -1.0,  0.0,  1.0,  0.0, 0.0, 1.0, // Top left
    -1.0,  1.0,  1.0,  0.0,  1.0,  0.0, 0.0, 0.0, // Bottom left
];

pub const CUBE_STRIDE: usize = 8;

/// Full screen quad drawn as two triangles: position (2), texture coordinates (2)
#[rustfmt::skip]
pub const SCREEN_QUAD: [f32; 24] = [
    -1.0,  1.0, 0.0, 1.0,
    -1.0, -1.0, 0.0, 0.0,
     1.0, -1.0, 1.0, 0.0,

    -1.0,  1.0, 0.0, 1.0,
     1.0, -1.0, 1.0, 0.0,
     1.0,  1.0, 1.0, 1.0,
];

/// Full screen quad drawn as a triangle strip: position (3), texture coordinates (2)
#[rustfmt::skip]
pub const QUAD_STRIP: [f32; 20] = [
    -1.0,  1.0, 0.0, 0.0, 1.0,
    -1.0, -1.0, 0.0, 0.0, 0.0,
     1.0,  1.0, 0.0, 1.0, 1.0,
     1.0, -1.0, 0.0, 1.0, 0.0,
];

/// Keeps the listed `(offset, count)` float ranges of every `stride`-float vertex
pub fn select_attributes(data: &[f32], stride: usize, ranges: &[(usize, usize)]) -> Vec<f32> {
    data.chunks_exact(stride)
        .flat_map(|vertex| {
            ranges
                .iter()
                .flat_map(move |&(offset, count)| vertex[offset..offset + count].iter().copied())
        })
        .collect()
}

/// Cube vertices scaled by `half_extent`, keeping the requested attributes
pub fn cube(half_extent: f32, normals: bool, tex_coords: bool) -> Vec<f32> {
    let mut ranges = vec![(0, 3)];
    if normals {
        ranges.push((3, 3));
    }
    if tex_coords {
        ranges.push((6, 2));
    }

    let mut data = select_attributes(&CUBE, CUBE_STRIDE, &ranges);
    let stride = ranges.iter().map(|(_, count)| count).sum::<usize>();
    for vertex in data.chunks_exact_mut(stride) {
        for p in &mut vertex[..3] {
            *p *= half_extent;
        }
    }
    data
}

/// Horizontal square at height `y`, facing up.
/// Per vertex: position (3), normal (3), texture coordinates (2) repeating `uv_scale` times.
pub fn plane(half_extent: f32, y: f32, uv_scale: f32) -> Vec<f32> {
    let (e, s) = (half_extent, uv_scale);
    #[rustfmt::skip]
    let corners = [
        [ e, y,  e, s,   0.0],
        [ e, y, -e, s,   s  ],
        [-e, y, -e, 0.0, s  ],
        [ e, y,  e, s,   0.0],
        [-e, y, -e, 0.0, s  ],
        [-e, y,  e, 0.0, 0.0],
    ];
    corners
        .iter()
        .flat_map(|&[x, y, z, u, v]| [x, y, z, 0.0, 1.0, 0.0, u, v])
        .collect()
}

/// Tangent and bitangent of a triangle from its positions and texture coordinates.
/// Degenerate UV mappings yield zero vectors.
pub fn compute_tangent(positions: [Vec3; 3], uvs: [Vec2; 3]) -> (Vec3, Vec3) {
    let edge1 = positions[1] - positions[0];
    let edge2 = positions[2] - positions[0];
    let delta_uv1 = uvs[1] - uvs[0];
    let delta_uv2 = uvs[2] - uvs[0];

    let det = delta_uv1.x * delta_uv2.y - delta_uv2.x * delta_uv1.y;
    if det.abs() < f32::EPSILON {
        return (Vec3::ZERO, Vec3::ZERO);
    }
    let f = 1.0 / det;

    let tangent = f * (delta_uv2.y * edge1 - delta_uv1.y * edge2);
    let bitangent = f * (-delta_uv2.x * edge1 + delta_uv1.x * edge2);
    (tangent, bitangent)
}

/// Quad in the XY plane facing +Z with per-triangle tangent space.
/// Per vertex: position (3), normal (3), texture coordinates (2), tangent (3), bitangent (3).
pub fn tangent_quad() -> Vec<f32> {
    let positions = [
        Vec3::new(-1.0, 1.0, 0.0),
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
    ];
    let uvs = [
        Vec2::new(0.0, 1.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
    ];
    let normal = Vec3::Z;

    [[0, 1, 2], [0, 2, 3]]
        .iter()
        .flat_map(|&triangle| {
            let (tangent, bitangent) = compute_tangent(
                triangle.map(|i| positions[i]),
                triangle.map(|i| uvs[i]),
            );
            triangle.into_iter().flat_map(move |i| {
                let p = positions[i];
                let uv = uvs[i];
                [
                    p.x, p.y, p.z,
                    normal.x, normal.y, normal.z,
                    uv.x, uv.y,
                    tangent.x, tangent.y, tangent.z,
                    bitangent.x, bitangent.y, bitangent.z,
                ]
            })
        })
        .collect()
}

/// UV sphere of radius 1 drawn as one triangle strip.
/// Per vertex: position (3), texture coordinates (2), normal (3).
/// Rows alternate direction so the strip continues without restarts.
pub fn sphere(x_segments: u32, y_segments: u32) -> (Vec<f32>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(((x_segments + 1) * (y_segments + 1) * 8) as usize);
    for y in 0..=y_segments {
        for x in 0..=x_segments {
            let x_segment = x as f32 / x_segments as f32;
            let y_segment = y as f32 / y_segments as f32;
            let position = Vec3::new(
                (x_segment * 2.0 * PI).cos() * (y_segment * PI).sin(),
                (y_segment * PI).cos(),
                (x_segment * 2.0 * PI).sin() * (y_segment * PI).sin(),
            );
            vertices.extend_from_slice(&position.to_array());
            vertices.extend_from_slice(&[x_segment, y_segment]);
            vertices.extend_from_slice(&position.to_array());
        }
    }

    let row = x_segments + 1;
    let mut indices = Vec::with_capacity((y_segments * row * 2) as usize);
    for y in 0..y_segments {
        if y % 2 == 0 {
            for x in 0..=x_segments {
                indices.push(y * row + x);
                indices.push((y + 1) * row + x);
            }
        } else {
            for x in (0..=x_segments).rev() {
                indices.push((y + 1) * row + x);
                indices.push(y * row + x);
            }
        }
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangles(data: &[f32], stride: usize) -> Vec<[Vec3; 3]> {
        data.chunks_exact(stride * 3)
            .map(|t| [0, 1, 2].map(|i| Vec3::from_slice(&t[i * stride..i * stride + 3])))
            .collect()
    }

    #[test]
    fn cube_faces_wind_counter_clockwise_from_outside() {
        for (i, [a, b, c]) in triangles(&CUBE, CUBE_STRIDE).into_iter().enumerate() {
            let normal = Vec3::from_slice(&CUBE[i * 3 * CUBE_STRIDE + 3..i * 3 * CUBE_STRIDE + 6]);
            assert!((b - a).cross(c - a).dot(normal) > 0.0, "triangle {i}");
        }
    }

    #[test]
    fn cube_attribute_selection() {
        let positions = cube(0.5, false, false);
        assert_eq!(positions.len(), 36 * 3);
        assert!(positions.iter().all(|p| p.abs() == 0.5));

        let with_uv = cube(0.5, false, true);
        assert_eq!(with_uv.len(), 36 * 5);
        assert_eq!(&with_uv[3..5], &CUBE[6..8]);

        let with_normals = cube(1.0, true, false);
        assert_eq!(&with_normals[..6], &CUBE[..6]);
    }

    #[test]
    fn plane_faces_up() {
        let data = plane(5.0, -0.5, 2.0);
        assert_eq!(data.len(), 6 * 8);
        for [a, b, c] in triangles(&data, 8) {
            assert!((b - a).cross(c - a).y > 0.0);
            assert_eq!(a.y, -0.5);
        }
        let max_uv = data.chunks_exact(8).map(|v| v[6].max(v[7])).fold(0.0, f32::max);
        assert_eq!(max_uv, 2.0);
    }

    #[test]
    fn tangent_follows_u_and_bitangent_follows_v() {
        let (tangent, bitangent) = compute_tangent(
            [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)],
            [Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        );
        assert!(tangent.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-6));
        assert!(bitangent.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));
    }

    #[test]
    fn degenerate_uvs_give_zero_tangent() {
        let (tangent, bitangent) = compute_tangent(
            [Vec3::ZERO, Vec3::X, Vec3::Y],
            [Vec2::ZERO, Vec2::ZERO, Vec2::ZERO],
        );
        assert_eq!(tangent, Vec3::ZERO);
        assert_eq!(bitangent, Vec3::ZERO);
    }

    #[test]
    fn tangent_quad_has_consistent_tangent_space() {
        let data = tangent_quad();
        assert_eq!(data.len(), 6 * 14);
        for vertex in data.chunks_exact(14) {
            let tangent = Vec3::from_slice(&vertex[8..11]).normalize();
            let bitangent = Vec3::from_slice(&vertex[11..14]).normalize();
            assert!(tangent.abs_diff_eq(Vec3::X, 1e-6));
            assert!(bitangent.abs_diff_eq(Vec3::Y, 1e-6));
        }
    }

    #[test]
    fn sphere_strip_indices() {
        let (vertices, indices) = sphere(64, 64);
        assert_eq!(vertices.len(), 65 * 65 * 8);
        assert_eq!(indices.len(), 64 * 65 * 2);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len() / 8));

        // The second row runs backwards and revisits the last vertex of the first one
        assert_eq!(indices[65 * 2 - 1], 129);
        assert_eq!(&indices[65 * 2..65 * 2 + 2], &[194, 129]);
    }

    #[test]
    fn sphere_normals_are_unit_positions() {
        let (vertices, _) = sphere(16, 8);
        for vertex in vertices.chunks_exact(8) {
            let position = Vec3::from_slice(&vertex[0..3]);
            let normal = Vec3::from_slice(&vertex[5..8]);
            assert!((position.length() - 1.0).abs() < 1e-5);
            assert_eq!(position, normal);
        }
    }
}
