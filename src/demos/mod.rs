/// Demo programs, one per tutorial chapter section.
/// Each demo owns its GL resources and draws one frame per `render` call.

mod advanced_lighting;
mod advanced_opengl;
mod getting_started;
mod lighting;
mod pbr;

use std::sync::Arc;
use clap::ValueEnum;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use glow::HasContext;
use crate::app::camera_controller::CameraMode;
use crate::app::input_state::InputState;
use crate::renderer::camera::Camera;
use crate::renderer::config::RenderConfig;
use crate::renderer::primitives;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::vertex::VertexLayout;

/// Everything a demo needs to render a single frame
pub struct FrameContext<'a> {
    pub gl: &'a Arc<glow::Context>,
    pub camera: &'a Camera,
    pub width: u32,
    pub height: u32,
    /// Seconds since the demo started
    pub time: f32,
    pub delta_time: f32,
    /// Set on the first frame and whenever the window size or the zoom changed
    pub projection_changed: bool,
}

impl FrameContext<'_> {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn projection(&self) -> Mat4 {
        self.camera.get_proj_mat(self.aspect_ratio())
    }

    pub fn view(&self) -> Mat4 {
        self.camera.get_view_mat()
    }
}

pub trait Demo {
    /// Handles demo specific keys, e.g. toggles and parameter tweaks
    fn process_input(&mut self, _input: &InputState) {}

    /// Called with the new framebuffer size before the next frame is rendered
    fn resize(&mut self, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn render(&mut self, frame: &FrameContext) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoKind {
    HelloWindow,
    HelloWindowClear,
    HelloTriangle,
    HelloTriangleExercise3,
    ShaderClass,
    TransformationsExercise2,
    CoordinateSystems,
    CameraKeyboardDt,
    CameraMouseZoom,
    Colors,
    LightCastersDirectional,
    MultipleLights,
    DepthTestingView,
    Framebuffers,
    UniformBuffers,
    InstancingQuads,
    Asteroids,
    GammaCorrection,
    PointShadows,
    ParallaxMapping,
    Bloom,
    DeferredShading,
    Ssao,
    PbrLighting,
    IblIrradianceConversion,
    IblSpecular,
}

impl DemoKind {
    pub fn description(&self) -> &'static str {
        match self {
            DemoKind::HelloWindow => "Empty window",
            DemoKind::HelloWindowClear => "Window cleared to a solid colour",
            DemoKind::HelloTriangle => "Orange triangle from inline shaders",
            DemoKind::HelloTriangleExercise3 => "Two triangles drawn with two programs",
            DemoKind::ShaderClass => "Triangle with interpolated vertex colours",
            DemoKind::TransformationsExercise2 => "Two textured quads, one rotating and one scaling",
            DemoKind::CoordinateSystems => "Ten tilted textured cubes",
            DemoKind::CameraKeyboardDt => "Fly through the cubes with W/A/S/D",
            DemoKind::CameraMouseZoom => "Mouse look and scroll zoom",
            DemoKind::Colors => "Coral cube next to a white lamp",
            DemoKind::LightCastersDirectional => "Diffuse and specular maps under a directional light",
            DemoKind::MultipleLights => "Directional, point and spot lights combined",
            DemoKind::DepthTestingView => "Linearized depth buffer visualization",
            DemoKind::Framebuffers => "Scene rendered to a texture and drawn on a screen quad",
            DemoKind::UniformBuffers => "Four programs sharing matrices through a uniform buffer",
            DemoKind::InstancingQuads => "100 instanced quads with per-instance offsets",
            DemoKind::Asteroids => "Planet ringed by instanced asteroids",
            DemoKind::GammaCorrection => "Blinn-Phong floor, Space toggles gamma correction",
            DemoKind::PointShadows => "Omnidirectional shadows, Space toggles shadows",
            DemoKind::ParallaxMapping => "Parallax occlusion mapping, Q/E adjust the height scale",
            DemoKind::Bloom => "HDR bloom, Space toggles bloom and Q/E adjust exposure",
            DemoKind::DeferredShading => "G-buffer with 32 lights and forward rendered light boxes",
            DemoKind::Ssao => "Screen-space ambient occlusion",
            DemoKind::PbrLighting => "Metallic/roughness sphere grid under four point lights",
            DemoKind::IblIrradianceConversion => "Diffuse image based lighting from an HDR environment",
            DemoKind::IblSpecular => "Diffuse and specular image based lighting",
        }
    }

    pub fn default_window_size(&self) -> (u32, u32) {
        match self {
            DemoKind::DepthTestingView
            | DemoKind::Framebuffers
            | DemoKind::UniformBuffers
            | DemoKind::InstancingQuads
            | DemoKind::Asteroids
            | DemoKind::PointShadows
            | DemoKind::ParallaxMapping
            | DemoKind::Bloom
            | DemoKind::DeferredShading
            | DemoKind::Ssao
            | DemoKind::PbrLighting
            | DemoKind::IblIrradianceConversion
            | DemoKind::IblSpecular => (1280, 720),
            _ => (800, 600),
        }
    }

    pub fn camera_setup(&self) -> (CameraMode, Camera) {
        let camera_at = |z: f32| Camera::new(Vec3::new(0.0, 0.0, z));
        match self {
            DemoKind::HelloWindow
            | DemoKind::HelloWindowClear
            | DemoKind::HelloTriangle
            | DemoKind::HelloTriangleExercise3
            | DemoKind::ShaderClass
            | DemoKind::TransformationsExercise2
            | DemoKind::CoordinateSystems
            | DemoKind::InstancingQuads => (CameraMode::Static, Camera::default()),
            DemoKind::CameraKeyboardDt => (CameraMode::Keyboard, camera_at(3.0)),
            DemoKind::Asteroids => (CameraMode::FreeLook, camera_at(155.0).with_clip_planes(0.1, 1000.0)),
            DemoKind::Bloom | DemoKind::DeferredShading => (CameraMode::FreeLook, camera_at(5.0)),
            DemoKind::Ssao => (CameraMode::FreeLook, camera_at(5.0).with_clip_planes(0.1, 50.0)),
            _ => (CameraMode::FreeLook, camera_at(3.0)),
        }
    }

    pub fn create(&self, gl: &Arc<glow::Context>, config: &RenderConfig) -> Result<Box<dyn Demo>> {
        use advanced_lighting::*;
        use advanced_opengl::*;
        use getting_started::*;
        use lighting::*;
        use pbr::*;

        let demo: Box<dyn Demo> = match self {
            DemoKind::HelloWindow => Box::new(HelloWindow::new(None)),
            DemoKind::HelloWindowClear => Box::new(HelloWindow::new(Some(Vec3::new(0.2, 0.3, 0.3)))),
            DemoKind::HelloTriangle => Box::new(HelloTriangle::new(gl)?),
            DemoKind::HelloTriangleExercise3 => Box::new(HelloTriangleTwoPrograms::new(gl)?),
            DemoKind::ShaderClass => Box::new(ShaderClass::new(gl, config)?),
            DemoKind::TransformationsExercise2 => Box::new(Transformations::new(gl, config)?),
            DemoKind::CoordinateSystems => Box::new(CoordinateSystems::new(gl, config)?),
            DemoKind::CameraKeyboardDt | DemoKind::CameraMouseZoom => Box::new(CameraDemo::new(gl, config)?),
            DemoKind::Colors => Box::new(Colors::new(gl, config)?),
            DemoKind::LightCastersDirectional => Box::new(LightCasters::new(gl, config)?),
            DemoKind::MultipleLights => Box::new(MultipleLights::new(gl, config)?),
            DemoKind::DepthTestingView => Box::new(DepthTesting::new(gl, config)?),
            DemoKind::Framebuffers => Box::new(Framebuffers::new(gl, config)?),
            DemoKind::UniformBuffers => Box::new(UniformBuffers::new(gl, config)?),
            DemoKind::InstancingQuads => Box::new(InstancingQuads::new(gl, config)?),
            DemoKind::Asteroids => Box::new(Asteroids::new(gl, config)?),
            DemoKind::GammaCorrection => Box::new(GammaCorrection::new(gl, config)?),
            DemoKind::PointShadows => Box::new(PointShadows::new(gl, config)?),
            DemoKind::ParallaxMapping => Box::new(ParallaxMapping::new(gl, config)?),
            DemoKind::Bloom => Box::new(Bloom::new(gl, config)?),
            DemoKind::DeferredShading => Box::new(DeferredShading::new(gl, config)?),
            DemoKind::Ssao => Box::new(Ssao::new(gl, config)?),
            DemoKind::PbrLighting => Box::new(PbrLighting::new(gl, config)?),
            DemoKind::IblIrradianceConversion => Box::new(IblDemo::new(gl, config, IblQuality::Diffuse)?),
            DemoKind::IblSpecular => Box::new(IblDemo::new(gl, config, IblQuality::Specular)?),
        };
        Ok(demo)
    }
}

/// World positions of the ten cubes shared by the early chapters
pub const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// Model matrix of the i-th cube, rotated 20 degrees per index around a fixed axis
pub fn cube_model(index: usize) -> Mat4 {
    let axis = Vec3::new(1.0, 0.3, 0.5).normalize();
    let angle = (20.0 * index as f32).to_radians();
    Mat4::from_translation(CUBE_POSITIONS[index]) * Mat4::from_axis_angle(axis, angle)
}

/// The [-1, 1] cube with position (0), normal (1) and texture coordinates (2)
pub fn unit_cube(gl: &Arc<glow::Context>) -> Result<VertexArray> {
    VertexArray::from_floats(gl, &primitives::CUBE, &VertexLayout::interleaved(&[3, 3, 2]), glow::TRIANGLES)
}

/// Full screen triangle strip with position (0) and texture coordinates (1)
pub fn screen_quad(gl: &Arc<glow::Context>) -> Result<VertexArray> {
    VertexArray::from_floats(gl, &primitives::QUAD_STRIP, &VertexLayout::interleaved(&[3, 2]), glow::TRIANGLE_STRIP)
}

pub fn clear(gl: &glow::Context, color: Vec3, mask: u32) {
    unsafe {
        gl.clear_color(color.x, color.y, color.z, 1.0);
        gl.clear(mask);
    }
}

/// Flips `flag` when `key` went down this frame and logs the new state
pub fn toggle_on_press(input: &InputState, key: winit::keyboard::KeyCode, flag: &mut bool, name: &str) {
    if input.is_key_just_pressed(key) {
        *flag = !*flag;
        log::info!("{name}: {}", if *flag { "on" } else { "off" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_names_are_kebab_case() {
        let names = DemoKind::value_variants()
            .iter()
            .filter_map(|kind| kind.to_possible_value())
            .map(|value| value.get_name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names.len(), 26);
        assert!(names.contains(&"hello-triangle-exercise3".to_string()));
        assert!(names.contains(&"camera-keyboard-dt".to_string()));
        assert!(names.contains(&"ibl-irradiance-conversion".to_string()));
        assert!(names.contains(&"ssao".to_string()));
    }

    #[test]
    fn every_demo_has_a_description() {
        for kind in DemoKind::value_variants() {
            assert!(!kind.description().is_empty());
        }
    }

    #[test]
    fn camera_modes_follow_chapters() {
        assert_eq!(DemoKind::HelloTriangle.camera_setup().0, CameraMode::Static);
        assert_eq!(DemoKind::CameraKeyboardDt.camera_setup().0, CameraMode::Keyboard);
        let (mode, camera) = DemoKind::Asteroids.camera_setup();
        assert_eq!(mode, CameraMode::FreeLook);
        assert_eq!(camera.get_position(), Vec3::new(0.0, 0.0, 155.0));
        assert_eq!(camera.get_far(), 1000.0);
    }

    #[test]
    fn later_chapters_open_larger_windows() {
        assert_eq!(DemoKind::Colors.default_window_size(), (800, 600));
        assert_eq!(DemoKind::GammaCorrection.default_window_size(), (800, 600));
        assert_eq!(DemoKind::Bloom.default_window_size(), (1280, 720));
    }

    #[test]
    fn toggle_flips_once_per_press() {
        use winit::keyboard::KeyCode;

        let mut input = InputState::default();
        let mut flag = false;
        input.on_key(KeyCode::Space, true, false);
        toggle_on_press(&input, KeyCode::Space, &mut flag, "Test");
        assert!(flag);

        // Still held on the next frame
        input.reset_frame();
        toggle_on_press(&input, KeyCode::Space, &mut flag, "Test");
        assert!(flag);

        input.on_key(KeyCode::Space, false, false);
        input.on_key(KeyCode::Space, true, false);
        toggle_on_press(&input, KeyCode::Space, &mut flag, "Test");
        assert!(!flag);
    }

    #[test]
    fn cube_models_rotate_twenty_degrees_per_index() {
        assert_eq!(cube_model(0), Mat4::IDENTITY);
        let model = cube_model(3);
        let expected = Mat4::from_translation(CUBE_POSITIONS[3])
            * Mat4::from_axis_angle(Vec3::new(1.0, 0.3, 0.5).normalize(), 60.0_f32.to_radians());
        assert!(model.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn cube_models_do_not_depend_on_time() {
        // The last cube sits at a fixed 180 degree tilt every frame
        let expected = Mat4::from_translation(CUBE_POSITIONS[9])
            * Mat4::from_axis_angle(Vec3::new(1.0, 0.3, 0.5).normalize(), 180.0_f32.to_radians());
        assert!(cube_model(9).abs_diff_eq(expected, 1e-6));
    }
}
