use std::sync::Arc;
use color_eyre::eyre::{eyre, Result};
use glow::HasContext;
use super::texture::{Texture, TextureDesc};

/// Depth (and stencil) storage of an off-screen framebuffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DepthAttachment {
    None,
    /// Write-only depth/stencil renderbuffer with the given internal format
    Renderbuffer(u32),
    /// Sampleable depth cubemap, all six faces attached as a layered target
    Cubemap,
}

/// Describes a framebuffer so it can be rebuilt at a new size
#[derive(Debug, Clone, PartialEq)]
pub struct FramebufferBuilder {
    colors: Vec<TextureDesc>,
    depth: DepthAttachment,
}

impl Default for FramebufferBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FramebufferBuilder {
    pub fn new() -> Self {
        Self {
            colors: Vec::new(),
            depth: DepthAttachment::None,
        }
    }

    /// Adds a colour attachment, the n-th call becomes `COLOR_ATTACHMENTn`
    pub fn color(mut self, desc: TextureDesc) -> Self {
        self.colors.push(desc);
        self
    }

    pub fn depth_renderbuffer(mut self) -> Self {
        self.depth = DepthAttachment::Renderbuffer(glow::DEPTH_COMPONENT24);
        self
    }

    pub fn depth_stencil_renderbuffer(mut self) -> Self {
        self.depth = DepthAttachment::Renderbuffer(glow::DEPTH24_STENCIL8);
        self
    }

    pub fn depth_cubemap(mut self) -> Self {
        self.depth = DepthAttachment::Cubemap;
        self
    }

    pub fn build(&self, gl: &Arc<glow::Context>, width: u32, height: u32) -> Result<Framebuffer> {
        let width = width.max(1);
        let height = height.max(1);

        let colors = self.colors
            .iter()
            .map(|desc| Texture::empty_2d(gl, width, height, *desc))
            .collect::<Result<Vec<_>>>()?;

        let depth_texture = match self.depth {
            DepthAttachment::Cubemap => Some(Texture::depth_cubemap(gl, width)?),
            _ => None,
        };

        unsafe {
            let fbo = gl.create_framebuffer().map_err(|e| eyre!(e))?;
            // Owns everything created so far, an early return deletes it
            let mut framebuffer = Framebuffer {
                fbo,
                colors,
                depth_texture,
                depth_renderbuffer: None,
                width,
                height,
                desc: self.clone(),
                gl: gl.clone(),
            };
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));

            for (i, texture) in framebuffer.colors.iter().enumerate() {
                gl.framebuffer_texture_2d(
                    glow::FRAMEBUFFER,
                    glow::COLOR_ATTACHMENT0 + i as u32,
                    glow::TEXTURE_2D,
                    Some(texture.raw),
                    0,
                );
            }

            if let DepthAttachment::Renderbuffer(format) = self.depth {
                let rbo = gl.create_renderbuffer().map_err(|e| eyre!(e))?;
                framebuffer.depth_renderbuffer = Some(rbo);
                gl.bind_renderbuffer(glow::RENDERBUFFER, Some(rbo));
                gl.renderbuffer_storage(glow::RENDERBUFFER, format, width as i32, height as i32);
                gl.bind_renderbuffer(glow::RENDERBUFFER, None);
                let attachment = if format == glow::DEPTH24_STENCIL8 {
                    glow::DEPTH_STENCIL_ATTACHMENT
                } else {
                    glow::DEPTH_ATTACHMENT
                };
                gl.framebuffer_renderbuffer(glow::FRAMEBUFFER, attachment, glow::RENDERBUFFER, Some(rbo));
            }

            if let Some(depth) = &framebuffer.depth_texture {
                gl.framebuffer_texture(glow::FRAMEBUFFER, glow::DEPTH_ATTACHMENT, Some(depth.raw), 0);
            }

            match framebuffer.colors.len() {
                0 => {
                    gl.draw_buffer(glow::NONE);
                    gl.read_buffer(glow::NONE);
                }
                1 => {}
                n => {
                    let attachments = (0..n as u32)
                        .map(|i| glow::COLOR_ATTACHMENT0 + i)
                        .collect::<Vec<_>>();
                    gl.draw_buffers(&attachments);
                }
            }

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            if status != glow::FRAMEBUFFER_COMPLETE {
                return Err(eyre!("Framebuffer is not complete: {}", status_name(status)));
            }

            Ok(framebuffer)
        }
    }
}

pub struct Framebuffer {
    pub fbo: glow::Framebuffer,
    colors: Vec<Texture>,
    depth_texture: Option<Texture>,
    depth_renderbuffer: Option<glow::Renderbuffer>,
    width: u32,
    height: u32,
    desc: FramebufferBuilder,
    gl: Arc<glow::Context>,
}

impl Framebuffer {
    /// Binds the framebuffer and sets the viewport to cover it
    pub fn bind(&self) {
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            self.gl.viewport(0, 0, self.width as i32, self.height as i32);
        }
    }

    /// Binds the default framebuffer and restores the window viewport
    pub fn unbind(gl: &glow::Context, width: u32, height: u32) {
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn color(&self, index: usize) -> &Texture {
        &self.colors[index]
    }

    pub fn depth(&self) -> Option<&Texture> {
        self.depth_texture.as_ref()
    }

    /// Recreates every attachment at the new size, keeping the same layout
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        *self = self.desc.build(&self.gl, width, height)?;
        Ok(())
    }

    /// Copies this framebuffer's depth into the default framebuffer of size `width`x`height`
    pub fn blit_depth_to_default(&self, width: u32, height: u32) {
        unsafe {
            self.gl.bind_framebuffer(glow::READ_FRAMEBUFFER, Some(self.fbo));
            self.gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, None);
            self.gl.blit_framebuffer(
                0,
                0,
                self.width as i32,
                self.height as i32,
                0,
                0,
                width as i32,
                height as i32,
                glow::DEPTH_BUFFER_BIT,
                glow::NEAREST,
            );
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            if let Some(rbo) = self.depth_renderbuffer {
                self.gl.delete_renderbuffer(rbo);
            }
            self.gl.delete_framebuffer(self.fbo);
        }
    }
}

/// Runs `cleanup` when dropped unless disarmed first.
/// Holds GL objects created ahead of a fallible step that could return early.
struct CleanupGuard<F: FnOnce()> {
    cleanup: Option<F>,
}

impl<F: FnOnce()> CleanupGuard<F> {
    fn new(cleanup: F) -> Self {
        Self { cleanup: Some(cleanup) }
    }

    fn disarm(mut self) {
        self.cleanup = None;
    }
}

impl<F: FnOnce()> Drop for CleanupGuard<F> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

/// Render target for baking cubemaps and lookup textures.
/// Its depth renderbuffer is resized for each bake and the colour target is attached per face.
pub struct CaptureFramebuffer {
    fbo: glow::Framebuffer,
    rbo: glow::Renderbuffer,
    gl: Arc<glow::Context>,
}

impl CaptureFramebuffer {
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self> {
        unsafe {
            let fbo = gl.create_framebuffer().map_err(|e| eyre!(e))?;
            let fbo_guard = CleanupGuard::new(|| gl.delete_framebuffer(fbo));
            let rbo = gl.create_renderbuffer().map_err(|e| eyre!(e))?;
            fbo_guard.disarm();
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(rbo));
            gl.framebuffer_renderbuffer(glow::FRAMEBUFFER, glow::DEPTH_ATTACHMENT, glow::RENDERBUFFER, Some(rbo));
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);

            Ok(Self {
                fbo,
                rbo,
                gl: gl.clone(),
            })
        }
    }

    /// Binds the framebuffer with a `size`x`size` depth buffer and viewport
    pub fn bind(&self, size: u32) {
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            self.gl.bind_renderbuffer(glow::RENDERBUFFER, Some(self.rbo));
            self.gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH_COMPONENT24, size as i32, size as i32);
            self.gl.viewport(0, 0, size as i32, size as i32);
        }
    }

    pub fn attach_cube_face(&self, texture: &Texture, face: u32, mip: i32) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_CUBE_MAP_POSITIVE_X + face,
                Some(texture.raw),
                mip,
            );
        }
    }

    pub fn attach_2d(&self, texture: &Texture) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(texture.raw),
                0,
            );
        }
    }

    pub fn check_complete(&self) -> Result<()> {
        let status = unsafe { self.gl.check_framebuffer_status(glow::FRAMEBUFFER) };
        if status != glow::FRAMEBUFFER_COMPLETE {
            return Err(eyre!("Capture framebuffer is not complete: {}", status_name(status)));
        }
        Ok(())
    }
}

impl Drop for CaptureFramebuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_renderbuffer(self.rbo);
            self.gl.delete_framebuffer(self.fbo);
        }
    }
}

pub fn status_name(status: u32) -> &'static str {
    match status {
        glow::FRAMEBUFFER_COMPLETE => "complete",
        glow::FRAMEBUFFER_UNDEFINED => "undefined",
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => "incomplete attachment",
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => "missing attachment",
        glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => "incomplete draw buffer",
        glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => "incomplete read buffer",
        glow::FRAMEBUFFER_UNSUPPORTED => "unsupported format combination",
        glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => "incomplete multisample",
        glow::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => "incomplete layer targets",
        _ => "unknown status",
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use super::*;

    #[test]
    fn builder_records_attachments() {
        let desc = FramebufferBuilder::new()
            .color(TextureDesc::new(glow::RGBA16F, glow::RGBA, glow::FLOAT))
            .color(TextureDesc::new(glow::RGBA16F, glow::RGBA, glow::FLOAT))
            .depth_renderbuffer();
        assert_eq!(desc.colors.len(), 2);
        assert_eq!(desc.depth, DepthAttachment::Renderbuffer(glow::DEPTH_COMPONENT24));
    }

    #[test]
    fn later_depth_choice_wins() {
        let desc = FramebufferBuilder::new().depth_renderbuffer().depth_cubemap();
        assert_eq!(desc.depth, DepthAttachment::Cubemap);
        assert_eq!(desc.colors.len(), 0);
    }

    fn create_pair(second: std::result::Result<u32, String>, deleted: &Cell<u32>) -> Result<(u32, u32)> {
        let first = 1;
        let guard = CleanupGuard::new(|| deleted.set(deleted.get() + 1));
        let second = second.map_err(|e| eyre!(e))?;
        guard.disarm();
        Ok((first, second))
    }

    #[test]
    fn failed_second_object_releases_the_first() {
        let deleted = Cell::new(0);
        assert!(create_pair(Err("out of memory".to_string()), &deleted).is_err());
        assert_eq!(deleted.get(), 1);
    }

    #[test]
    fn disarmed_guard_keeps_the_object() {
        let deleted = Cell::new(0);
        assert_eq!(create_pair(Ok(2), &deleted).unwrap(), (1, 2));
        assert_eq!(deleted.get(), 0);
    }

    #[test]
    fn incomplete_status_is_named() {
        assert_eq!(status_name(glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT), "missing attachment");
        assert_eq!(status_name(0), "unknown status");
    }
}
