use std::path::Path;
use std::sync::Arc;
use color_eyre::eyre::{eyre, Result, WrapErr};
use glow::HasContext;
use image::DynamicImage;

/// How an image file is turned into a 2D texture
#[derive(Debug, Clone, Copy)]
pub struct TextureOptions {
    /// Flip rows so the first row is the bottom of the image, as GL expects
    pub flip_y: bool,
    /// Store colour textures in sRGB space so sampling returns linear values
    pub gamma: bool,
    pub wrap: u32,
    pub min_filter: u32,
    pub mag_filter: u32,
    pub mipmaps: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            flip_y: true,
            gamma: false,
            wrap: glow::REPEAT,
            min_filter: glow::LINEAR_MIPMAP_LINEAR,
            mag_filter: glow::LINEAR,
            mipmaps: true,
        }
    }
}

impl TextureOptions {
    pub fn with_gamma(mut self, gamma: bool) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_flip_y(mut self, flip_y: bool) -> Self {
        self.flip_y = flip_y;
        self
    }
}

/// Storage description of a texture without initial data, e.g. a framebuffer attachment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureDesc {
    pub internal_format: u32,
    pub format: u32,
    pub data_type: u32,
    pub filter: u32,
    pub wrap: u32,
}

impl TextureDesc {
    pub const fn new(internal_format: u32, format: u32, data_type: u32) -> Self {
        Self {
            internal_format,
            format,
            data_type,
            filter: glow::LINEAR,
            wrap: glow::CLAMP_TO_EDGE,
        }
    }

    pub const fn with_filter(mut self, filter: u32) -> Self {
        self.filter = filter;
        self
    }

    pub const fn with_wrap(mut self, wrap: u32) -> Self {
        self.wrap = wrap;
        self
    }
}

/// Picks the (internal format, pixel format) pair for an 8-bit image with `channels` channels
pub fn pixel_formats(channels: u8, gamma: bool) -> Option<(u32, u32)> {
    match (channels, gamma) {
        (1, _) => Some((glow::RED, glow::RED)),
        (2, _) => Some((glow::RG, glow::RG)),
        (3, false) => Some((glow::RGB, glow::RGB)),
        (3, true) => Some((glow::SRGB, glow::RGB)),
        (4, false) => Some((glow::RGBA, glow::RGBA)),
        (4, true) => Some((glow::SRGB_ALPHA, glow::RGBA)),
        _ => None,
    }
}

pub struct Texture {
    pub raw: glow::Texture,
    pub target: u32,
    gl: Arc<glow::Context>,
}

impl Texture {
    pub fn from_path(
        gl: &Arc<glow::Context>,
        path: &Path,
        options: TextureOptions,
    ) -> Result<Self> {
        let image = image::open(path)
            .wrap_err_with(|| format!("Failed to load texture at {}", path.display()))?;
        Self::from_image(gl, image, options)
    }

    pub fn from_image(
        gl: &Arc<glow::Context>,
        image: DynamicImage,
        options: TextureOptions,
    ) -> Result<Self> {
        let image = if options.flip_y { image.flipv() } else { image };
        let (width, height) = (image.width(), image.height());

        let (channels, data) = match image {
            DynamicImage::ImageLuma8(img) => (1, img.into_raw()),
            DynamicImage::ImageLumaA8(img) => (2, img.into_raw()),
            DynamicImage::ImageRgb8(img) => (3, img.into_raw()),
            DynamicImage::ImageRgba8(img) => (4, img.into_raw()),
            other => (4, other.to_rgba8().into_raw()),
        };
        let (internal_format, format) = pixel_formats(channels, options.gamma)
            .ok_or_else(|| eyre!("Unsupported channel count {}", channels))?;

        let texture = Self::create(gl, glow::TEXTURE_2D)?;
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture.raw));
            // Rows of RGB and single channel images are not 4-byte aligned
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal_format as i32,
                width as i32,
                height as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(&data)),
            );
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 4);
            if options.mipmaps {
                gl.generate_mipmap(glow::TEXTURE_2D);
            }
            set_sampling(gl, glow::TEXTURE_2D, options.wrap, options.min_filter, options.mag_filter);
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        Ok(texture)
    }

    /// Loads a floating point equirectangular map (.hdr) into an RGB16F texture
    pub fn from_hdr_path(gl: &Arc<glow::Context>, path: &Path) -> Result<Self> {
        let image = image::open(path)
            .wrap_err_with(|| format!("Failed to load HDR image at {}", path.display()))?
            .flipv()
            .into_rgb32f();
        let (width, height) = image.dimensions();
        let data = image.into_raw();

        let texture = Self::create(gl, glow::TEXTURE_2D)?;
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture.raw));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGB16F as i32,
                width as i32,
                height as i32,
                0,
                glow::RGB,
                glow::FLOAT,
                glow::PixelUnpackData::Slice(Some(bytemuck::cast_slice(&data))),
            );
            set_sampling(gl, glow::TEXTURE_2D, glow::CLAMP_TO_EDGE, glow::LINEAR, glow::LINEAR);
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        Ok(texture)
    }

    pub fn empty_2d(
        gl: &Arc<glow::Context>,
        width: u32,
        height: u32,
        desc: TextureDesc,
    ) -> Result<Self> {
        Self::from_raw_2d(gl, width, height, desc, None)
    }

    pub fn from_raw_2d(
        gl: &Arc<glow::Context>,
        width: u32,
        height: u32,
        desc: TextureDesc,
        data: Option<&[u8]>,
    ) -> Result<Self> {
        let texture = Self::create(gl, glow::TEXTURE_2D)?;
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture.raw));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                desc.internal_format as i32,
                width as i32,
                height as i32,
                0,
                desc.format,
                desc.data_type,
                glow::PixelUnpackData::Slice(data),
            );
            set_sampling(gl, glow::TEXTURE_2D, desc.wrap, desc.filter, desc.filter);
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        Ok(texture)
    }

    /// Cubemap with six uninitialized `size`x`size` faces.
    /// A mipmapped cubemap gets trilinear minification and its chain allocated up front.
    pub fn cubemap_empty(
        gl: &Arc<glow::Context>,
        size: u32,
        desc: TextureDesc,
        mipmapped: bool,
    ) -> Result<Self> {
        let texture = Self::create(gl, glow::TEXTURE_CUBE_MAP)?;
        unsafe {
            gl.bind_texture(glow::TEXTURE_CUBE_MAP, Some(texture.raw));
            for face in 0..6 {
                gl.tex_image_2d(
                    glow::TEXTURE_CUBE_MAP_POSITIVE_X + face,
                    0,
                    desc.internal_format as i32,
                    size as i32,
                    size as i32,
                    0,
                    desc.format,
                    desc.data_type,
                    glow::PixelUnpackData::Slice(None),
                );
            }
            let min_filter = if mipmapped { glow::LINEAR_MIPMAP_LINEAR } else { desc.filter };
            set_sampling(gl, glow::TEXTURE_CUBE_MAP, desc.wrap, min_filter, desc.filter);
            gl.tex_parameter_i32(glow::TEXTURE_CUBE_MAP, glow::TEXTURE_WRAP_R, desc.wrap as i32);
            if mipmapped {
                gl.generate_mipmap(glow::TEXTURE_CUBE_MAP);
            }
            gl.bind_texture(glow::TEXTURE_CUBE_MAP, None);
        }

        Ok(texture)
    }

    pub fn depth_cubemap(gl: &Arc<glow::Context>, size: u32) -> Result<Self> {
        Self::cubemap_empty(
            gl,
            size,
            TextureDesc::new(glow::DEPTH_COMPONENT, glow::DEPTH_COMPONENT, glow::FLOAT)
                .with_filter(glow::NEAREST),
            false,
        )
    }

    fn create(gl: &Arc<glow::Context>, target: u32) -> Result<Self> {
        let raw = unsafe { gl.create_texture() }.map_err(|e| eyre!(e))?;
        Ok(Self {
            raw,
            target,
            gl: gl.clone(),
        })
    }

    /// Binds the texture to texture unit `unit`
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(self.target, Some(self.raw));
        }
    }

    pub fn generate_mipmaps(&self) {
        unsafe {
            self.gl.bind_texture(self.target, Some(self.raw));
            self.gl.generate_mipmap(self.target);
            self.gl.bind_texture(self.target, None);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.raw);
        }
    }
}

unsafe fn set_sampling(gl: &glow::Context, target: u32, wrap: u32, min_filter: u32, mag_filter: u32) {
    unsafe {
        gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, wrap as i32);
        gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, wrap as i32);
        gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, min_filter as i32);
        gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, mag_filter as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_count_selects_format() {
        assert_eq!(pixel_formats(1, false), Some((glow::RED, glow::RED)));
        assert_eq!(pixel_formats(2, false), Some((glow::RG, glow::RG)));
        assert_eq!(pixel_formats(3, false), Some((glow::RGB, glow::RGB)));
        assert_eq!(pixel_formats(4, false), Some((glow::RGBA, glow::RGBA)));
        assert_eq!(pixel_formats(5, false), None);
    }

    #[test]
    fn gamma_only_affects_colour_formats() {
        assert_eq!(pixel_formats(1, true), Some((glow::RED, glow::RED)));
        assert_eq!(pixel_formats(3, true), Some((glow::SRGB, glow::RGB)));
        assert_eq!(pixel_formats(4, true), Some((glow::SRGB_ALPHA, glow::RGBA)));
    }

    #[test]
    fn default_options_repeat_and_mipmap() {
        let options = TextureOptions::default();
        assert!(options.flip_y);
        assert!(options.mipmaps);
        assert_eq!(options.wrap, glow::REPEAT);
        assert_eq!(options.min_filter, glow::LINEAR_MIPMAP_LINEAR);
        assert!(TextureOptions::default().with_gamma(true).gamma);
    }
}
