use std::sync::Arc;
use color_eyre::eyre::OptionExt;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use glow::HasContext;
use winit::keyboard::KeyCode;
use crate::app::input_state::InputState;
use crate::demos::{clear, toggle_on_press, unit_cube, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::framebuffer::{Framebuffer, FramebufferBuilder};
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::{Texture, TextureOptions};
use crate::renderer::util;
use super::CHAPTER;

const SHADOW_SIZE: u32 = 1024;
const SHADOW_NEAR: f32 = 1.0;
const SHADOW_FAR: f32 = 25.0;

/// Translation, rotation (axis angle in degrees) and uniform scale of the cubes inside the room
const CUBES: [(Vec3, f32, f32); 5] = [
    (Vec3::new(4.0, -3.5, 0.0), 0.0, 0.5),
    (Vec3::new(2.0, 3.0, 1.0), 0.0, 0.75),
    (Vec3::new(-3.0, -1.0, 0.0), 0.0, 0.5),
    (Vec3::new(-1.5, 1.0, 1.5), 0.0, 0.5),
    (Vec3::new(-1.5, 2.0, -3.0), 60.0, 0.75),
];

/// The light swings back and forth along z
pub fn light_position(time: f32) -> Vec3 {
    Vec3::new(0.0, 0.0, (time * 0.5).sin() * 3.0)
}

/// Light space matrices rendering the six faces of the shadow cubemap
pub fn shadow_transforms(light: Vec3) -> [Mat4; 6] {
    let projection = util::cube_face_projection(SHADOW_NEAR, SHADOW_FAR);
    util::cube_face_views(light).map(|view| projection * view)
}

fn cube_transform(&(position, angle_deg, scale): &(Vec3, f32, f32)) -> Mat4 {
    Mat4::from_translation(position)
        * Mat4::from_axis_angle(Vec3::new(1.0, 0.0, 1.0).normalize(), angle_deg.to_radians())
        * Mat4::from_scale(Vec3::splat(scale))
}

/// Omnidirectional shadows: distances to the light go into a depth cubemap in one layered pass,
/// then the room and its cubes are lit against it
pub struct PointShadows {
    depth_shader: Shader,
    shader: Shader,
    cube: VertexArray,
    wood: Texture,
    shadow_map: Framebuffer,
    shadows_enabled: bool,
}

impl PointShadows {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Self> {
        let dir = config.shaders(CHAPTER);
        let depth_shader = Shader::load(gl, &dir, "point_shadows_depth")?;
        let shader = Shader::load(gl, &dir, "point_shadows")?;
        let wood = Texture::from_path(gl, &config.asset("textures/wood.png"), TextureOptions::default())?;
        let shadow_map = FramebufferBuilder::new()
            .depth_cubemap()
            .build(gl, SHADOW_SIZE, SHADOW_SIZE)?;

        shader.use_program();
        shader.set_int("diffuseTexture", 0);
        shader.set_int("depthMap", 1);

        unsafe {
            gl.enable(glow::DEPTH_TEST);
            gl.enable(glow::CULL_FACE);
        }

        Ok(Self {
            depth_shader,
            shader,
            cube: unit_cube(gl)?,
            wood,
            shadow_map,
            shadows_enabled: true,
        })
    }

    fn render_scene(&self, gl: &glow::Context, shader: &Shader) {
        // The camera sits inside the room, so its faces are drawn from the back with flipped normals
        shader.set_mat4("model", &Mat4::from_scale(Vec3::splat(5.0)));
        unsafe {
            gl.disable(glow::CULL_FACE);
        }
        shader.set_bool("reverse_normals", true);
        self.cube.draw();
        shader.set_bool("reverse_normals", false);
        unsafe {
            gl.enable(glow::CULL_FACE);
        }

        for cube in &CUBES {
            shader.set_mat4("model", &cube_transform(cube));
            self.cube.draw();
        }
    }
}

impl Demo for PointShadows {
    fn process_input(&mut self, input: &InputState) {
        toggle_on_press(input, KeyCode::Space, &mut self.shadows_enabled, "Shadows");
    }

    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        let gl = frame.gl;
        let light = light_position(frame.time);

        self.shadow_map.bind();
        unsafe {
            gl.clear(glow::DEPTH_BUFFER_BIT);
        }
        self.depth_shader.use_program();
        self.depth_shader.set_mat4_array("shadowMatrices", &shadow_transforms(light));
        self.depth_shader.set_float("far_plane", SHADOW_FAR);
        self.depth_shader.set_vec3("lightPos", light);
        self.render_scene(gl, &self.depth_shader);

        Framebuffer::unbind(gl, frame.width, frame.height);
        clear(gl, Vec3::splat(0.1), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        self.shader.use_program();
        self.shader.set_mat4("projection", &frame.projection());
        self.shader.set_mat4("view", &frame.view());
        self.shader.set_vec3("lightPos", light);
        self.shader.set_vec3("viewPos", frame.camera.get_position());
        self.shader.set_bool("shadows", self.shadows_enabled);
        self.shader.set_float("far_plane", SHADOW_FAR);

        self.wood.bind(0);
        self.shadow_map
            .depth()
            .ok_or_eyre("Shadow framebuffer has no depth cubemap")?
            .bind(1);
        self.render_scene(gl, &self.shader);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn light_oscillates_along_z() {
        assert_eq!(light_position(0.0), Vec3::ZERO);
        let peak = light_position(std::f32::consts::PI);
        assert!((peak.z - 3.0).abs() < 1e-5);
        assert_eq!((peak.x, peak.y), (0.0, 0.0));
    }

    #[test]
    fn positive_x_face_sees_points_right_of_the_light() {
        let light = Vec3::new(0.0, 0.0, 1.0);
        let transforms = shadow_transforms(light);
        let clip = transforms[0] * Vec4::new(5.0, 0.0, 1.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);

        // Behind the face, outside its frustum
        let behind = transforms[0] * Vec4::new(-5.0, 0.0, 1.0, 1.0);
        assert!(behind.w < 0.0);
    }
}
