use std::sync::Arc;
use color_eyre::Result;
use glam::{Mat4, Vec3};
use glow::HasContext;
use crate::demos::{clear, screen_quad, unit_cube, Demo, FrameContext};
use crate::renderer::config::RenderConfig;
use crate::renderer::resources::buffer::VertexArray;
use crate::renderer::resources::framebuffer::{CaptureFramebuffer, Framebuffer};
use crate::renderer::resources::shader::Shader;
use crate::renderer::resources::texture::{Texture, TextureDesc};
use crate::renderer::util;
use super::{SphereScene, CHAPTER};

const ENVIRONMENT_SIZE: u32 = 512;
const IRRADIANCE_SIZE: u32 = 32;
const PREFILTER_SIZE: u32 = 128;
const PREFILTER_MIP_LEVELS: u32 = 5;
const BRDF_LUT_SIZE: u32 = 512;
const MIN_ROUGHNESS: f32 = 0.05;

const HDR_CUBE: TextureDesc = TextureDesc::new(glow::RGB16F, glow::RGB, glow::FLOAT);

/// How much of the environment lighting is baked and applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IblQuality {
    /// Irradiance map only, the ambient term is purely diffuse
    Diffuse,
    /// Irradiance plus the split-sum specular term from a prefiltered map and a BRDF lookup table
    Specular,
}

/// Mip level, face size and the roughness baked into each level of the prefiltered map
pub fn prefilter_mip_levels(base_size: u32, levels: u32) -> Vec<(i32, u32, f32)> {
    (0..levels)
        .map(|mip| {
            let size = (base_size >> mip).max(1);
            let roughness = if levels > 1 { mip as f32 / (levels - 1) as f32 } else { 0.0 };
            (mip as i32, size, roughness)
        })
        .collect()
}

/// Renders the unit cube from its centre into each face of a cubemap
struct CubemapBaker<'a> {
    gl: &'a glow::Context,
    capture: CaptureFramebuffer,
    cube: &'a VertexArray,
    projection: Mat4,
    views: [Mat4; 6],
}

impl<'a> CubemapBaker<'a> {
    fn new(gl: &'a Arc<glow::Context>, cube: &'a VertexArray) -> Result<Self> {
        Ok(Self {
            gl,
            capture: CaptureFramebuffer::new(gl)?,
            cube,
            projection: util::cube_face_projection(0.1, 10.0),
            views: util::cube_face_views(Vec3::ZERO),
        })
    }

    /// Draws the cube with `shader` into mip level `mip` of every face of `target`.
    /// `shader` must be in use with its samplers bound.
    fn bake(&self, shader: &Shader, target: &Texture, size: u32, mip: i32) -> Result<()> {
        self.capture.bind(size);
        shader.set_mat4("projection", &self.projection);
        for (face, view) in self.views.iter().enumerate() {
            shader.set_mat4("view", view);
            self.capture.attach_cube_face(target, face as u32, mip);
            self.capture.check_complete()?;
            clear(self.gl, Vec3::ZERO, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            self.cube.draw();
        }
        Ok(())
    }
}

struct SpecularMaps {
    prefilter: Texture,
    brdf_lut: Texture,
}

/// PBR sphere grid lit by four point lights and by an HDR environment baked into cubemaps at startup
pub struct IblDemo {
    pbr_shader: Shader,
    background_shader: Shader,
    scene: SphereScene,
    cube: VertexArray,
    environment: Texture,
    irradiance: Texture,
    specular: Option<SpecularMaps>,
}

impl IblDemo {
    pub fn new(gl: &Arc<glow::Context>, config: &RenderConfig, quality: IblQuality) -> Result<Self> {
        let dir = config.shaders(CHAPTER);
        let pbr_fragment = match quality {
            IblQuality::Diffuse => "pbr_ibl_diffuse",
            IblQuality::Specular => "pbr_ibl_specular",
        };
        let pbr_shader = Shader::new(gl, &dir, "pbr", pbr_fragment, None)?;
        let background_shader = Shader::load(gl, &dir, "background")?;
        let equirect_shader = Shader::new(gl, &dir, "cubemap", "equirectangular_to_cubemap", None)?;
        let irradiance_shader = Shader::new(gl, &dir, "cubemap", "irradiance_convolution", None)?;

        unsafe {
            gl.enable(glow::DEPTH_TEST);
            // The skybox is drawn at the far plane
            gl.depth_func(glow::LEQUAL);
            gl.enable(glow::TEXTURE_CUBE_MAP_SEAMLESS);
        }

        let cube = unit_cube(gl)?;
        let baker = CubemapBaker::new(gl, &cube)?;
        let specular = quality == IblQuality::Specular;

        let hdr = Texture::from_hdr_path(gl, &config.asset("textures/hdr/newport_loft.hdr"))?;
        let environment = Texture::cubemap_empty(gl, ENVIRONMENT_SIZE, HDR_CUBE, specular)?;
        equirect_shader.use_program();
        equirect_shader.set_int("equirectangularMap", 0);
        hdr.bind(0);
        baker.bake(&equirect_shader, &environment, ENVIRONMENT_SIZE, 0)?;
        if specular {
            // Prefiltering samples lower mips of the environment to avoid bright dots
            environment.generate_mipmaps();
        }
        log::debug!("Baked {ENVIRONMENT_SIZE}x{ENVIRONMENT_SIZE} environment cubemap");

        let irradiance = Texture::cubemap_empty(gl, IRRADIANCE_SIZE, HDR_CUBE, false)?;
        irradiance_shader.use_program();
        irradiance_shader.set_int("environmentMap", 0);
        environment.bind(0);
        baker.bake(&irradiance_shader, &irradiance, IRRADIANCE_SIZE, 0)?;
        log::debug!("Baked {IRRADIANCE_SIZE}x{IRRADIANCE_SIZE} irradiance map");

        let specular = if specular {
            Some(Self::bake_specular(gl, config, &baker, &environment)?)
        } else {
            None
        };
        Framebuffer::unbind(gl, config.width, config.height);

        pbr_shader.use_program();
        pbr_shader.set_vec3("albedo", Vec3::new(0.5, 0.0, 0.0));
        pbr_shader.set_float("ao", 1.0);
        pbr_shader.set_int("irradianceMap", 0);
        if specular.is_some() {
            pbr_shader.set_int("prefilterMap", 1);
            pbr_shader.set_int("brdfLUT", 2);
        }
        background_shader.use_program();
        background_shader.set_int("environmentMap", 0);

        drop(baker);
        Ok(Self {
            pbr_shader,
            background_shader,
            scene: SphereScene::new(gl, MIN_ROUGHNESS)?,
            cube,
            environment,
            irradiance,
            specular,
        })
    }

    fn bake_specular(
        gl: &Arc<glow::Context>,
        config: &RenderConfig,
        baker: &CubemapBaker,
        environment: &Texture,
    ) -> Result<SpecularMaps> {
        let dir = config.shaders(CHAPTER);
        let prefilter_shader = Shader::new(gl, &dir, "cubemap", "prefilter", None)?;
        let brdf_shader = Shader::load(gl, &dir, "brdf")?;

        let prefilter = Texture::cubemap_empty(gl, PREFILTER_SIZE, HDR_CUBE, true)?;
        prefilter_shader.use_program();
        prefilter_shader.set_int("environmentMap", 0);
        environment.bind(0);
        for (mip, size, roughness) in prefilter_mip_levels(PREFILTER_SIZE, PREFILTER_MIP_LEVELS) {
            prefilter_shader.set_float("roughness", roughness);
            baker.bake(&prefilter_shader, &prefilter, size, mip)?;
        }
        log::debug!("Baked {PREFILTER_MIP_LEVELS} prefiltered mip levels from {PREFILTER_SIZE}x{PREFILTER_SIZE}");

        let brdf_lut = Texture::empty_2d(
            gl,
            BRDF_LUT_SIZE,
            BRDF_LUT_SIZE,
            TextureDesc::new(glow::RG16F, glow::RG, glow::FLOAT),
        )?;
        baker.capture.bind(BRDF_LUT_SIZE);
        baker.capture.attach_2d(&brdf_lut);
        baker.capture.check_complete()?;
        clear(gl, Vec3::ZERO, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        brdf_shader.use_program();
        screen_quad(gl)?.draw();
        log::debug!("Baked {BRDF_LUT_SIZE}x{BRDF_LUT_SIZE} BRDF lookup table");

        Ok(SpecularMaps { prefilter, brdf_lut })
    }
}

impl Demo for IblDemo {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        let gl = frame.gl;
        let projection = frame.projection();
        let view = frame.view();

        Framebuffer::unbind(gl, frame.width, frame.height);
        clear(gl, Vec3::splat(0.2), glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        self.pbr_shader.use_program();
        self.pbr_shader.set_mat4("projection", &projection);
        self.pbr_shader.set_mat4("view", &view);
        self.pbr_shader.set_vec3("camPos", frame.camera.get_position());
        self.irradiance.bind(0);
        if let Some(maps) = &self.specular {
            maps.prefilter.bind(1);
            maps.brdf_lut.bind(2);
        }
        self.scene.draw(&self.pbr_shader);

        self.background_shader.use_program();
        self.background_shader.set_mat4("projection", &projection);
        self.background_shader.set_mat4("view", &view);
        self.environment.bind(0);
        self.cube.draw();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefilter_levels_halve_in_size() {
        let levels = prefilter_mip_levels(PREFILTER_SIZE, PREFILTER_MIP_LEVELS);
        let sizes = levels.iter().map(|&(_, size, _)| size).collect::<Vec<_>>();
        assert_eq!(sizes, vec![128, 64, 32, 16, 8]);
        assert_eq!(levels[4].0, 4);
    }

    #[test]
    fn roughness_spans_the_mip_chain() {
        let levels = prefilter_mip_levels(PREFILTER_SIZE, PREFILTER_MIP_LEVELS);
        assert_eq!(levels[0].2, 0.0);
        assert_eq!(levels[2].2, 0.5);
        assert_eq!(levels[4].2, 1.0);
    }

    #[test]
    fn single_level_is_perfectly_smooth() {
        assert_eq!(prefilter_mip_levels(16, 1), vec![(0, 16, 0.0)]);
        assert_eq!(prefilter_mip_levels(2, 4).last().map(|l| l.1), Some(1));
    }
}
