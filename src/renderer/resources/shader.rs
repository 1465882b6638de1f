use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use color_eyre::eyre::{eyre, Result, WrapErr};
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use glow::HasContext;

const VERTEX_EXT: &str = "vs";
const FRAGMENT_EXT: &str = "fs";
const GEOMETRY_EXT: &str = "gs";

/// Linked GLSL program with cached uniform locations
pub struct Shader {
    pub program: glow::Program,
    uniform_locations: RefCell<HashMap<String, Option<glow::UniformLocation>>>,
    gl: Arc<glow::Context>,
}

impl Shader {
    /// Loads `<vertex_name>.vs` and `<fragment_name>.fs` (plus an optional `<geometry_name>.gs`) from `dir`.
    /// Several programs can share a vertex stage this way.
    pub fn new(
        gl: &Arc<glow::Context>,
        dir: &Path,
        vertex_name: &str,
        fragment_name: &str,
        geometry_name: Option<&str>,
    ) -> Result<Self> {
        let vertex = read_source(&stage_path(dir, vertex_name, VERTEX_EXT))?;
        let fragment = read_source(&stage_path(dir, fragment_name, FRAGMENT_EXT))?;
        let geometry = geometry_name
            .map(|name| read_source(&stage_path(dir, name, GEOMETRY_EXT)))
            .transpose()?;

        Self::from_sources(gl, &vertex, &fragment, geometry.as_deref())
            .wrap_err_with(|| format!("Failed to build program {}/{}", dir.display(), fragment_name))
    }

    /// Loads the `name.vs`/`name.fs` pair, picking up `name.gs` when it exists
    pub fn load(gl: &Arc<glow::Context>, dir: &Path, name: &str) -> Result<Self> {
        let geometry = stage_path(dir, name, GEOMETRY_EXT)
            .exists()
            .then_some(name);
        Self::new(gl, dir, name, name, geometry)
    }

    pub fn from_sources(
        gl: &Arc<glow::Context>,
        vertex: &str,
        fragment: &str,
        geometry: Option<&str>,
    ) -> Result<Self> {
        let mut stages = vec![
            compile_stage(gl, glow::VERTEX_SHADER, vertex)?,
            compile_stage(gl, glow::FRAGMENT_SHADER, fragment)?,
        ];
        if let Some(geometry) = geometry {
            stages.push(compile_stage(gl, glow::GEOMETRY_SHADER, geometry)?);
        }

        unsafe {
            let program = gl.create_program().map_err(|e| eyre!(e))?;
            for &stage in &stages {
                gl.attach_shader(program, stage);
            }
            gl.link_program(program);

            for stage in stages {
                gl.detach_shader(program, stage);
                gl.delete_shader(stage);
            }

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(eyre!("Program linking failed:\n{}", log));
            }

            Ok(Self {
                program,
                uniform_locations: RefCell::new(HashMap::new()),
                gl: gl.clone(),
            })
        }
    }

    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.program));
        }
    }

    /// Assigns the uniform block `name` to binding point `binding`
    pub fn bind_uniform_block(&self, name: &str, binding: u32) {
        unsafe {
            match self.gl.get_uniform_block_index(self.program, name) {
                Some(index) => self.gl.uniform_block_binding(self.program, index, binding),
                None => log::warn!("Uniform block {name} not found in program"),
            }
        }
    }

    fn location(&self, name: &str) -> Option<glow::UniformLocation> {
        let mut cache = self.uniform_locations.borrow_mut();
        if let Some(location) = cache.get(name) {
            return location.clone();
        }

        let location = unsafe { self.gl.get_uniform_location(self.program, name) };
        if location.is_none() {
            log::debug!("Uniform {name} is not active in program {:?}", self.program);
        }
        cache.insert(name.to_string(), location.clone());
        location
    }

    pub fn set_bool(&self, name: &str, value: bool) {
        self.set_int(name, value as i32);
    }

    pub fn set_int(&self, name: &str, value: i32) {
        unsafe {
            self.gl.uniform_1_i32(self.location(name).as_ref(), value);
        }
    }

    pub fn set_float(&self, name: &str, value: f32) {
        unsafe {
            self.gl.uniform_1_f32(self.location(name).as_ref(), value);
        }
    }

    pub fn set_vec2(&self, name: &str, value: Vec2) {
        unsafe {
            self.gl.uniform_2_f32(self.location(name).as_ref(), value.x, value.y);
        }
    }

    pub fn set_vec3(&self, name: &str, value: Vec3) {
        unsafe {
            self.gl.uniform_3_f32(self.location(name).as_ref(), value.x, value.y, value.z);
        }
    }

    pub fn set_vec4(&self, name: &str, value: Vec4) {
        unsafe {
            self.gl.uniform_4_f32(self.location(name).as_ref(), value.x, value.y, value.z, value.w);
        }
    }

    pub fn set_mat3(&self, name: &str, value: &Mat3) {
        unsafe {
            self.gl.uniform_matrix_3_f32_slice(self.location(name).as_ref(), false, &value.to_cols_array());
        }
    }

    pub fn set_mat4(&self, name: &str, value: &Mat4) {
        unsafe {
            self.gl.uniform_matrix_4_f32_slice(self.location(name).as_ref(), false, &value.to_cols_array());
        }
    }

    /// Uploads `values` to the array uniform `name[0..]`
    pub fn set_mat4_array(&self, name: &str, values: &[Mat4]) {
        unsafe {
            self.gl.uniform_matrix_4_f32_slice(
                self.location(&format!("{name}[0]")).as_ref(),
                false,
                bytemuck::cast_slice(values),
            );
        }
    }

    pub fn set_vec3_array(&self, name: &str, values: &[Vec3]) {
        unsafe {
            self.gl.uniform_3_f32_slice(
                self.location(&format!("{name}[0]")).as_ref(),
                bytemuck::cast_slice(values),
            );
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.program);
        }
    }
}

pub fn stage_path(dir: &Path, name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{name}.{extension}"))
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read shader source {}", path.display()))
}

fn stage_name(stage: u32) -> &'static str {
    match stage {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        glow::GEOMETRY_SHADER => "geometry",
        _ => "unknown",
    }
}

fn compile_stage(gl: &glow::Context, stage: u32, source: &str) -> Result<glow::Shader> {
    unsafe {
        let shader = gl.create_shader(stage).map_err(|e| eyre!(e))?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(eyre!("{} shader compilation failed:\n{}", stage_name(stage), log));
        }
        Ok(shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_files_use_tutorial_extensions() {
        let dir = Path::new("shaders/lighting");
        assert_eq!(stage_path(dir, "colors", VERTEX_EXT), PathBuf::from("shaders/lighting/colors.vs"));
        assert_eq!(stage_path(dir, "light_cube", FRAGMENT_EXT), PathBuf::from("shaders/lighting/light_cube.fs"));
        assert_eq!(stage_path(dir, "depth", GEOMETRY_EXT), PathBuf::from("shaders/lighting/depth.gs"));
    }

    #[test]
    fn stage_names() {
        assert_eq!(stage_name(glow::VERTEX_SHADER), "vertex");
        assert_eq!(stage_name(glow::GEOMETRY_SHADER), "geometry");
    }

    #[test]
    fn matrix_arrays_flatten_column_major() {
        let values = [Mat4::IDENTITY, Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))];
        let flat: &[f32] = bytemuck::cast_slice(&values);
        assert_eq!(flat.len(), 32);
        assert_eq!(&flat[28..31], &[1.0, 2.0, 3.0]);
    }
}
