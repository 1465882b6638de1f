use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use color_eyre::eyre::{eyre, Result, WrapErr};
use glam::{Vec2, Vec3};
use super::mesh::{Mesh, MeshTexture, TextureKind};
use super::shader::Shader;
use super::texture::{Texture, TextureOptions};
use super::vertex::Vertex;
use crate::renderer::primitives::compute_tangent;

/// A set of meshes imported from a Wavefront OBJ file together with their material textures
pub struct Model {
    meshes: Vec<Mesh>,
    /// Every texture loaded so far, in load order; a path is only ever loaded once
    textures_loaded: Vec<MeshTexture>,
    directory: PathBuf,
    gamma: bool,
}

impl Model {
    /// Imports `path`, triangulating faces and computing tangents.
    /// Texture paths in the material file resolve relative to the model's directory.
    pub fn load(gl: &Arc<glow::Context>, path: &Path, gamma: bool) -> Result<Self> {
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        ).wrap_err_with(|| format!("Failed to import model {}", path.display()))?;

        let materials = materials.unwrap_or_else(|e| {
            log::warn!("No materials for {}: {e}", path.display());
            Vec::new()
        });

        let mut model = Self {
            meshes: Vec::with_capacity(models.len()),
            textures_loaded: Vec::new(),
            directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            gamma,
        };

        for imported in &models {
            let mesh = &imported.mesh;
            let vertices = build_vertices(&mesh.positions, &mesh.normals, &mesh.texcoords, &mesh.indices);
            let textures = match mesh.material_id.and_then(|id| materials.get(id)) {
                Some(material) => model.load_material_textures(gl, material)?,
                None => Vec::new(),
            };
            model.meshes.push(Mesh::new(gl, vertices, mesh.indices.clone(), textures)?);
        }

        if model.meshes.is_empty() {
            return Err(eyre!("Model {} contains no meshes", path.display()));
        }

        log::info!(
            "Loaded {}: {} meshes, {} vertices, {} textures",
            path.display(),
            model.meshes.len(),
            model.meshes.iter().map(|m| m.vertices.len()).sum::<usize>(),
            model.textures_loaded.len(),
        );

        Ok(model)
    }

    fn load_material_textures(
        &mut self,
        gl: &Arc<glow::Context>,
        material: &tobj::Material,
    ) -> Result<Vec<MeshTexture>> {
        material_texture_paths(material)
            .into_iter()
            .map(|(kind, path)| self.load_texture(gl, kind, &path))
            .collect()
    }

    fn load_texture(
        &mut self,
        gl: &Arc<glow::Context>,
        kind: TextureKind,
        path: &str,
    ) -> Result<MeshTexture> {
        if let Some(loaded) = self.textures_loaded.iter().find(|t| t.path == path) {
            return Ok(MeshTexture {
                texture: loaded.texture.clone(),
                kind,
                path: path.to_string(),
            });
        }

        // Texture coordinates are already flipped on import
        let options = TextureOptions::default()
            .with_flip_y(false)
            .with_gamma(self.gamma);
        let texture = Texture::from_path(gl, &self.directory.join(path), options)?;
        let mesh_texture = MeshTexture {
            texture: Rc::new(texture),
            kind,
            path: path.to_string(),
        };
        self.textures_loaded.push(mesh_texture.clone());
        Ok(mesh_texture)
    }

    pub fn draw(&self, shader: &Shader) {
        for mesh in &self.meshes {
            mesh.draw(shader);
        }
    }

    pub fn get_meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn get_meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }
}

/// Material textures in binding order: diffuse, specular, normal and height maps.
/// `map_Bump` is treated as a height map and `norm` as a normal map.
fn material_texture_paths(material: &tobj::Material) -> Vec<(TextureKind, String)> {
    let normal = material.unknown_param
        .get("norm")
        .or_else(|| material.unknown_param.get("map_Kn"))
        .cloned();

    [
        (TextureKind::Diffuse, material.diffuse_texture.clone()),
        (TextureKind::Specular, material.specular_texture.clone()),
        (TextureKind::Normal, normal),
        (TextureKind::Height, material.normal_texture.clone()),
    ]
        .into_iter()
        .filter_map(|(kind, path)| path.map(|p| (kind, p)))
        .collect()
}

/// Builds interleaved vertices from single-indexed OBJ attribute streams.
/// Missing texture coordinates default to zero, missing normals are averaged from face normals.
/// V coordinates are flipped to match GL's bottom-left texture origin.
pub fn build_vertices(
    positions: &[f32],
    normals: &[f32],
    texcoords: &[f32],
    indices: &[u32],
) -> Vec<Vertex> {
    let count = positions.len() / 3;
    let mut vertices = (0..count)
        .map(|i| Vertex {
            position: Vec3::from_slice(&positions[i * 3..i * 3 + 3]),
            normal: normals
                .get(i * 3..i * 3 + 3)
                .map(Vec3::from_slice)
                .unwrap_or(Vec3::ZERO),
            tex_coords: texcoords
                .get(i * 2..i * 2 + 2)
                .map(|uv| Vec2::new(uv[0], 1.0 - uv[1]))
                .unwrap_or(Vec2::ZERO),
            ..Default::default()
        })
        .collect::<Vec<_>>();

    let has_normals = normals.len() >= count * 3;

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        if a >= count || b >= count || c >= count {
            continue;
        }

        let (p1, p2, p3) = (vertices[a].position, vertices[b].position, vertices[c].position);
        let (tangent, bitangent) = compute_tangent(
            [p1, p2, p3],
            [vertices[a].tex_coords, vertices[b].tex_coords, vertices[c].tex_coords],
        );
        let face_normal = (p2 - p1).cross(p3 - p1);

        for i in [a, b, c] {
            vertices[i].tangent += tangent;
            vertices[i].bitangent += bitangent;
            if !has_normals {
                vertices[i].normal += face_normal;
            }
        }
    }

    for vertex in &mut vertices {
        vertex.normal = vertex.normal.normalize_or_zero();
        vertex.tangent = vertex.tangent.normalize_or_zero();
        vertex.bitangent = vertex.bitangent.normalize_or_zero();
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    // Unit quad in the XY plane, two triangles, UVs matching positions
    const POSITIONS: [f32; 12] = [
        0.0, 0.0, 0.0,
        1.0, 0.0, 0.0,
        1.0, 1.0, 0.0,
        0.0, 1.0, 0.0,
    ];
    const TEXCOORDS: [f32; 8] = [
        0.0, 1.0,
        1.0, 1.0,
        1.0, 0.0,
        0.0, 0.0,
    ];
    const INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

    #[test]
    fn texcoords_are_flipped_vertically() {
        let vertices = build_vertices(&POSITIONS, &[], &TEXCOORDS, &INDICES);
        assert_eq!(vertices[0].tex_coords, Vec2::new(0.0, 0.0));
        assert_eq!(vertices[2].tex_coords, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn missing_normals_come_from_faces() {
        let vertices = build_vertices(&POSITIONS, &[], &TEXCOORDS, &INDICES);
        for vertex in &vertices {
            assert!(vertex.normal.abs_diff_eq(Vec3::Z, 1e-6));
        }
    }

    #[test]
    fn tangent_space_follows_uv_axes() {
        let vertices = build_vertices(&POSITIONS, &[], &TEXCOORDS, &INDICES);
        for vertex in &vertices {
            assert!(vertex.tangent.abs_diff_eq(Vec3::X, 1e-6));
            assert!(vertex.bitangent.abs_diff_eq(Vec3::Y, 1e-6));
        }
    }

    #[test]
    fn missing_texcoords_default_to_zero() {
        let vertices = build_vertices(&POSITIONS, &[], &[], &INDICES);
        assert!(vertices.iter().all(|v| v.tex_coords == Vec2::ZERO));
        assert!(vertices.iter().all(|v| v.tangent == Vec3::ZERO));
    }

    #[test]
    fn supplied_normals_are_kept() {
        let normals = [0.0, 0.0, 2.0].repeat(4);
        let vertices = build_vertices(&POSITIONS, &normals, &TEXCOORDS, &INDICES);
        assert!(vertices.iter().all(|v| v.normal.abs_diff_eq(Vec3::Z, 1e-6)));
    }

    #[test]
    fn material_textures_keep_binding_order() {
        let mut material = tobj::Material {
            diffuse_texture: Some("body_dif.png".into()),
            specular_texture: Some("body_spec.png".into()),
            normal_texture: Some("body_ddn.png".into()),
            ..Default::default()
        };
        material.unknown_param.insert("norm".into(), "body_nrm.png".into());

        let paths = material_texture_paths(&material);
        assert_eq!(paths, vec![
            (TextureKind::Diffuse, "body_dif.png".to_string()),
            (TextureKind::Specular, "body_spec.png".to_string()),
            (TextureKind::Normal, "body_nrm.png".to_string()),
            (TextureKind::Height, "body_ddn.png".to_string()),
        ]);
    }
}
