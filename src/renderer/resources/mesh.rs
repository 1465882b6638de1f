use std::rc::Rc;
use std::sync::Arc;
use color_eyre::Result;
use glow::HasContext;
use super::buffer::VertexArray;
use super::shader::Shader;
use super::texture::Texture;
use super::vertex::Vertex;

/// Role of a material texture, determines the sampler uniform it is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
}

impl TextureKind {
    pub fn uniform_prefix(&self) -> &'static str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
            TextureKind::Normal => "texture_normal",
            TextureKind::Height => "texture_height",
        }
    }
}

#[derive(Clone)]
pub struct MeshTexture {
    pub texture: Rc<Texture>,
    pub kind: TextureKind,
    /// Path as written in the material file, used to share textures between meshes
    pub path: String,
}

/// Sampler uniform names for textures bound to units 0, 1, 2, ... in order.
/// Each kind is numbered from 1 on its own, e.g. `texture_diffuse1`, `texture_specular1`, `texture_diffuse2`.
pub fn sampler_names(kinds: &[TextureKind]) -> Vec<String> {
    let mut counters = [0u32; 4];
    kinds
        .iter()
        .map(|kind| {
            let counter = &mut counters[*kind as usize];
            *counter += 1;
            format!("{}{}", kind.uniform_prefix(), counter)
        })
        .collect()
}

pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub textures: Vec<MeshTexture>,
    vertex_array: VertexArray,
    gl: Arc<glow::Context>,
}

impl Mesh {
    pub fn new(
        gl: &Arc<glow::Context>,
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        textures: Vec<MeshTexture>,
    ) -> Result<Self> {
        let vertex_array = VertexArray::from_vertices(gl, &vertices, &indices)?;

        Ok(Self {
            vertices,
            indices,
            textures,
            vertex_array,
            gl: gl.clone(),
        })
    }

    fn bind_textures(&self, shader: &Shader) {
        let kinds = self.textures.iter().map(|t| t.kind).collect::<Vec<_>>();
        for (unit, (texture, name)) in self.textures.iter().zip(sampler_names(&kinds)).enumerate() {
            shader.set_int(&name, unit as i32);
            texture.texture.bind(unit as u32);
        }
    }

    pub fn draw(&self, shader: &Shader) {
        self.bind_textures(shader);
        self.vertex_array.draw();
        unsafe {
            self.gl.active_texture(glow::TEXTURE0);
        }
    }

    pub fn draw_instanced(&self, shader: &Shader, instance_count: i32) {
        self.bind_textures(shader);
        self.vertex_array.draw_instanced(instance_count);
        unsafe {
            self.gl.active_texture(glow::TEXTURE0);
        }
    }

    pub fn get_vertex_array_mut(&mut self) -> &mut VertexArray {
        &mut self.vertex_array
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TextureKind::*;

    #[test]
    fn sampler_names_count_each_kind_separately() {
        let names = sampler_names(&[Diffuse, Diffuse, Specular, Normal, Height, Diffuse, Specular]);
        assert_eq!(names, vec![
            "texture_diffuse1",
            "texture_diffuse2",
            "texture_specular1",
            "texture_normal1",
            "texture_height1",
            "texture_diffuse3",
            "texture_specular2",
        ]);
    }

    #[test]
    fn no_textures_no_samplers() {
        assert!(sampler_names(&[]).is_empty());
    }
}
