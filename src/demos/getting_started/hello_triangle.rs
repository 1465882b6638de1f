use std::sync::Arc;
use color_eyre::Result;
use glam::{Vec3, Vec4};
use crate::demos::{clear, Demo, FrameContext};
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::vertex::VertexLayout;

const VERTEX_SOURCE: &str = r#"#version 330 core
layout (location = 0) in vec3 aPos;

void main()
{
    gl_Position = vec4(aPos, 1.0);
}
"#;

const FRAGMENT_SOURCE: &str = r#"#version 330 core
out vec4 FragColor;

uniform vec4 color;

void main()
{
    FragColor = color;
}
"#;

const ORANGE: Vec4 = Vec4::new(1.0, 0.5, 0.2, 1.0);
const YELLOW: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);
const BACKGROUND: Vec3 = Vec3::new(0.2, 0.3, 0.3);

#[rustfmt::skip]
const TRIANGLE: [f32; 9] = [
    -0.5, -0.5, 0.0,
     0.5, -0.5, 0.0,
     0.0,  0.5, 0.0,
];

#[rustfmt::skip]
const LEFT_TRIANGLE: [f32; 9] = [
    -0.9,  -0.5, 0.0,
     0.0,  -0.5, 0.0,
    -0.45,  0.5, 0.0,
];

#[rustfmt::skip]
const RIGHT_TRIANGLE: [f32; 9] = [
    0.0,  -0.5, 0.0,
    0.9,  -0.5, 0.0,
    0.45,  0.5, 0.0,
];

fn triangle(gl: &Arc<glow::Context>, vertices: &[f32]) -> Result<VertexArray> {
    VertexArray::from_floats(gl, vertices, &VertexLayout::interleaved(&[3]), glow::TRIANGLES)
}

fn solid_color_shader(gl: &Arc<glow::Context>, color: Vec4) -> Result<Shader> {
    let shader = Shader::from_sources(gl, VERTEX_SOURCE, FRAGMENT_SOURCE, None)?;
    shader.use_program();
    shader.set_vec4("color", color);
    Ok(shader)
}

/// A single orange triangle from shaders compiled out of inline sources
pub struct HelloTriangle {
    shader: Shader,
    triangle: VertexArray,
}

impl HelloTriangle {
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self> {
        Ok(Self {
            shader: solid_color_shader(gl, ORANGE)?,
            triangle: triangle(gl, &TRIANGLE)?,
        })
    }
}

impl Demo for HelloTriangle {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, BACKGROUND, glow::COLOR_BUFFER_BIT);
        self.shader.use_program();
        self.triangle.draw();
        Ok(())
    }
}

/// Two triangles in separate vertex arrays, each drawn with its own program
pub struct HelloTriangleTwoPrograms {
    orange: Shader,
    yellow: Shader,
    left: VertexArray,
    right: VertexArray,
}

impl HelloTriangleTwoPrograms {
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self> {
        Ok(Self {
            orange: solid_color_shader(gl, ORANGE)?,
            yellow: solid_color_shader(gl, YELLOW)?,
            left: triangle(gl, &LEFT_TRIANGLE)?,
            right: triangle(gl, &RIGHT_TRIANGLE)?,
        })
    }
}

impl Demo for HelloTriangleTwoPrograms {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        clear(frame.gl, BACKGROUND, glow::COLOR_BUFFER_BIT);
        self.orange.use_program();
        self.left.draw();
        self.yellow.use_program();
        self.right.draw();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_triangles_sit_side_by_side() {
        let max_left_x = LEFT_TRIANGLE.iter().step_by(3).fold(f32::MIN, |a, &b| a.max(b));
        let min_right_x = RIGHT_TRIANGLE.iter().step_by(3).fold(f32::MAX, |a, &b| a.min(b));
        assert!(max_left_x <= min_right_x);
    }
}
