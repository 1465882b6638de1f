use std::sync::Arc;
use bytemuck::Pod;
use color_eyre::eyre::{eyre, Result};
use glow::HasContext;
use super::vertex::{Vertex, VertexLayout};

/// GPU buffer object bound to a single target (array, element array or uniform)
pub struct Buffer {
    pub raw: glow::Buffer,
    pub target: u32,
    pub size: usize,
    gl: Arc<glow::Context>,
}

impl Buffer {
    pub fn new<T: Pod>(
        gl: &Arc<glow::Context>,
        target: u32,
        data: &[T],
        usage: u32,
    ) -> Result<Self> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        unsafe {
            let raw = gl.create_buffer().map_err(|e| eyre!(e))?;
            gl.bind_buffer(target, Some(raw));
            gl.buffer_data_u8_slice(target, bytes, usage);
            gl.bind_buffer(target, None);

            Ok(Self {
                raw,
                target,
                size: bytes.len(),
                gl: gl.clone(),
            })
        }
    }

    /// Allocates uninitialized storage, used for uniform blocks filled later with `write`
    pub fn with_size(
        gl: &Arc<glow::Context>,
        target: u32,
        size: usize,
        usage: u32,
    ) -> Result<Self> {
        unsafe {
            let raw = gl.create_buffer().map_err(|e| eyre!(e))?;
            gl.bind_buffer(target, Some(raw));
            gl.buffer_data_size(target, size as i32, usage);
            gl.bind_buffer(target, None);

            Ok(Self {
                raw,
                target,
                size,
                gl: gl.clone(),
            })
        }
    }

    pub fn write<T: Pod>(&self, offset: i32, data: &[T]) -> Result<()> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        if offset < 0 || offset as usize + bytes.len() > self.size {
            return Err(eyre!(
                "Write of {} bytes at offset {} exceeds buffer of {} bytes",
                bytes.len(), offset, self.size,
            ));
        }

        unsafe {
            self.gl.bind_buffer(self.target, Some(self.raw));
            self.gl.buffer_sub_data_u8_slice(self.target, offset, bytes);
            self.gl.bind_buffer(self.target, None);
        }
        Ok(())
    }

    pub fn bind(&self) {
        unsafe {
            self.gl.bind_buffer(self.target, Some(self.raw));
        }
    }

    /// Links the whole buffer to an indexed binding point such as a uniform block binding
    pub fn bind_base(&self, index: u32) {
        unsafe {
            self.gl.bind_buffer_range(self.target, index, Some(self.raw), 0, self.size as i32);
        }
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.raw);
        }
    }
}

/// Vertex array object together with the buffers it references
pub struct VertexArray {
    pub raw: glow::VertexArray,
    mode: u32,
    vertex_count: i32,
    index_count: Option<i32>,
    _vertex_buffer: Buffer,
    _index_buffer: Option<Buffer>,
    instance_buffers: Vec<Buffer>,
    gl: Arc<glow::Context>,
}

impl VertexArray {
    /// Non-indexed geometry from interleaved floats
    pub fn from_floats(
        gl: &Arc<glow::Context>,
        data: &[f32],
        layout: &VertexLayout,
        mode: u32,
    ) -> Result<Self> {
        Self::new(gl, data, None, layout, mode)
    }

    pub fn from_floats_indexed(
        gl: &Arc<glow::Context>,
        data: &[f32],
        indices: &[u32],
        layout: &VertexLayout,
        mode: u32,
    ) -> Result<Self> {
        Self::new(gl, data, Some(indices), layout, mode)
    }

    pub fn from_vertices(
        gl: &Arc<glow::Context>,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> Result<Self> {
        Self::new(gl, vertices, Some(indices), &VertexLayout::model_vertex(), glow::TRIANGLES)
    }

    pub fn new<T: Pod>(
        gl: &Arc<glow::Context>,
        vertices: &[T],
        indices: Option<&[u32]>,
        layout: &VertexLayout,
        mode: u32,
    ) -> Result<Self> {
        let vertex_bytes = size_of_val(vertices);
        if layout.stride <= 0 || vertex_bytes % layout.stride as usize != 0 {
            return Err(eyre!(
                "Vertex data of {} bytes is not a multiple of the {} byte stride",
                vertex_bytes, layout.stride,
            ));
        }

        let vertex_buffer = Buffer::new(gl, glow::ARRAY_BUFFER, vertices, glow::STATIC_DRAW)?;
        let index_buffer = indices
            .map(|indices| Buffer::new(gl, glow::ELEMENT_ARRAY_BUFFER, indices, glow::STATIC_DRAW))
            .transpose()?;

        unsafe {
            let raw = gl.create_vertex_array().map_err(|e| eyre!(e))?;
            gl.bind_vertex_array(Some(raw));
            vertex_buffer.bind();
            if let Some(index_buffer) = &index_buffer {
                // The element array binding is part of the VAO state
                index_buffer.bind();
            }
            enable_attributes(gl, layout, 0);
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                raw,
                mode,
                vertex_count: (vertex_bytes / layout.stride as usize) as i32,
                index_count: indices.map(|i| i.len() as i32),
                _vertex_buffer: vertex_buffer,
                _index_buffer: index_buffer,
                instance_buffers: Vec::new(),
                gl: gl.clone(),
            })
        }
    }

    /// Adds a per-instance vertex stream advanced once per instance
    pub fn add_instance_buffer<T: Pod>(
        &mut self,
        data: &[T],
        layout: &VertexLayout,
    ) -> Result<()> {
        let buffer = Buffer::new(&self.gl, glow::ARRAY_BUFFER, data, glow::STATIC_DRAW)?;
        unsafe {
            self.gl.bind_vertex_array(Some(self.raw));
            buffer.bind();
            enable_attributes(&self.gl, layout, 1);
            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
        self.instance_buffers.push(buffer);
        Ok(())
    }

    pub fn bind(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.raw));
        }
    }

    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.raw));
            match self.index_count {
                Some(count) => self.gl.draw_elements(self.mode, count, glow::UNSIGNED_INT, 0),
                None => self.gl.draw_arrays(self.mode, 0, self.vertex_count),
            }
            self.gl.bind_vertex_array(None);
        }
    }

    pub fn draw_instanced(&self, instance_count: i32) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.raw));
            match self.index_count {
                Some(count) => self.gl.draw_elements_instanced(
                    self.mode,
                    count,
                    glow::UNSIGNED_INT,
                    0,
                    instance_count,
                ),
                None => self.gl.draw_arrays_instanced(self.mode, 0, self.vertex_count, instance_count),
            }
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_vertex_array(self.raw);
        }
    }
}

/// Points every attribute of `layout` at the currently bound array buffer
unsafe fn enable_attributes(gl: &glow::Context, layout: &VertexLayout, divisor: u32) {
    for attribute in &layout.attributes {
        unsafe {
            gl.enable_vertex_attrib_array(attribute.location);
            gl.vertex_attrib_pointer_f32(
                attribute.location,
                attribute.components,
                glow::FLOAT,
                false,
                layout.stride,
                attribute.offset,
            );
            if divisor != 0 {
                gl.vertex_attrib_divisor(attribute.location, divisor);
            }
        }
    }
}
