use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use glow::HasContext;
use crate::demos::{clear, cube_model, Demo, FrameContext, CUBE_POSITIONS};
use crate::renderer::config::RenderConfig;
use crate::renderer::primitives;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::{Texture, TextureOptions};
use crate::renderer::resources::vertex::VertexLayout;
use super::CHAPTER;

/// Ten textured cubes, shared by the coordinate system and camera demos
struct TexturedCubes {
    shader: Shader,
    cube: VertexArray,
    container: Texture,
    face: Texture,
}

impl TexturedCubes {
    fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let shader = Shader::load(gl, &config.shaders(CHAPTER), "coordinate_systems")?;
        let cube = VertexArray::from_floats(
            gl,
            &primitives::cube(0.5, false, true),
            &VertexLayout::interleaved(&[3, 2]),
            glow::TRIANGLES,
        )?;
        let container = Texture::from_path(gl, &config.asset("textures/container.jpg"), TextureOptions::default())?;
        let face = Texture::from_path(gl, &config.asset("textures/awesomeface.png"), TextureOptions::default())?;

        shader.use_program();
        shader.set_int("texture1", 0);
        shader.set_int("texture2", 1);
        unsafe {
            gl.enable(glow::DEPTH_TEST);
        }

        Ok(Self {
            shader,
            cube,
            container,
            face,
        })
    }

    fn draw(&self, frame: &FrameContext, view: &Mat4, projection: &Mat4) {
        clear(frame.gl, Vec3::new(0.2, 0.3, 0.3), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        self.container.bind(0);
        self.face.bind(1);
        self.shader.use_program();
        self.shader.set_mat4("view", view);
        self.shader.set_mat4("projection", projection);
        for i in 0..CUBE_POSITIONS.len() {
            self.shader.set_mat4("model", &cube_model(i));
            self.cube.draw();
        }
    }
}

/// Cubes seen through a fixed view three units back and a 45 degree projection
pub struct CoordinateSystems {
    cubes: TexturedCubes,
}

impl CoordinateSystems {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        Ok(Self {
            cubes: TexturedCubes::new(gl, config)?,
        })
    }
}

impl Demo for CoordinateSystems {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));
        let projection = Mat4::perspective_rh_gl(45.0_f32.to_radians(), frame.aspect_ratio(), 0.1, 100.0);
        self.cubes.draw(frame, &view, &projection);
        Ok(())
    }
}

/// The same cubes seen through the controllable camera
pub struct CameraDemo {
    cubes: TexturedCubes,
}

impl CameraDemo {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        Ok(Self {
            cubes: TexturedCubes::new(gl, config)?,
        })
    }
}

impl Demo for CameraDemo {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        self.cubes.draw(frame, &frame.view(), &frame.projection());
        Ok(())
    }
}
