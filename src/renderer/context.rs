use std::ffi::CString;
use std::num::NonZeroU32;
use std::sync::Arc;
use color_eyre::eyre::{eyre, OptionExt};
use color_eyre::Result;
use glow::HasContext;
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentContext, NotCurrentGlContext,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{Surface, SurfaceAttributesBuilder, WindowSurface};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;
use crate::renderer::config::RenderConfig;

/// Contains the GL display, the current context and the loaded function pointers
pub struct RenderContext {
    pub gl: Arc<glow::Context>,
    pub gl_context: PossiblyCurrentContext,
}

/// Index of the config with the most samples not above `requested`.
/// Falls back to the fewest samples when every config asks for more.
pub fn preferred_config(samples: &[u8], requested: u8) -> Option<usize> {
    let fitting = samples
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count <= requested)
        .max_by_key(|&(_, &count)| count);
    fitting
        .or_else(|| samples.iter().enumerate().min_by_key(|&(_, &count)| count))
        .map(|(index, _)| index)
}

impl RenderContext {
    /// Creates the window together with a framebuffer config matching `config`
    pub fn create_window(
        event_loop: &ActiveEventLoop,
        config: &RenderConfig,
    ) -> Result<(Arc<Window>, Config)> {
        let window_attributes = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let mut template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(24)
            .with_stencil_size(8);
        if config.samples > 0 {
            template = template.with_multisampling(config.samples);
        }

        let requested_samples = config.samples;
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, template, |configs| {
                let mut configs = configs.collect::<Vec<_>>();
                let samples = configs.iter().map(|c| c.num_samples()).collect::<Vec<_>>();
                // The picker cannot return an error, an empty set leaves nothing to hand back
                let index = preferred_config(&samples, requested_samples)
                    .expect("glutin offered no framebuffer configs");
                configs.swap_remove(index)
            })
            .map_err(|e| eyre!("Failed to create window and GL config: {e}"))?;

        let window = window.ok_or_eyre("Display builder did not create a window")?;
        Ok((Arc::new(window), gl_config))
    }

    /// Creates a GL 3.3 core context, falling back to GLES 3.0, and makes it current on a new window surface
    pub fn new(
        window: &Window,
        gl_config: &Config,
    ) -> Result<(Self, Surface<WindowSurface>)> {
        let raw_window_handle = window.window_handle()?.as_raw();
        let gl_display = gl_config.display();

        let not_current = Self::create_context(gl_config, raw_window_handle)?;

        let size = window.inner_size();
        let surface_attributes = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(size.width.max(1)).ok_or_eyre("Zero window width")?,
            NonZeroU32::new(size.height.max(1)).ok_or_eyre("Zero window height")?,
        );
        let surface = unsafe {
            gl_display.create_window_surface(gl_config, &surface_attributes)?
        };
        let gl_context = not_current.make_current(&surface)?;

        let gl = unsafe {
            glow::Context::from_loader_function(|s| match CString::new(s) {
                Ok(s) => gl_display.get_proc_address(&s),
                Err(_) => std::ptr::null(),
            })
        };

        unsafe {
            log::info!(
                "GL context created: {} ({}), {} samples",
                gl.get_parameter_string(glow::VERSION),
                gl.get_parameter_string(glow::RENDERER),
                gl_config.num_samples(),
            );
        }

        Ok((
            Self {
                gl: Arc::new(gl),
                gl_context,
            },
            surface,
        ))
    }

    fn create_context(
        gl_config: &Config,
        raw_window_handle: raw_window_handle::RawWindowHandle,
    ) -> Result<NotCurrentContext> {
        let gl_display = gl_config.display();
        let core_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));
        let gles_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::Gles(Some(Version::new(3, 0))))
            .build(Some(raw_window_handle));

        unsafe {
            gl_display
                .create_context(gl_config, &core_attributes)
                .or_else(|e| {
                    log::warn!("OpenGL 3.3 core unavailable ({e}), trying GLES 3.0");
                    gl_display.create_context(gl_config, &gles_attributes)
                })
                .map_err(|e| eyre!("Failed to create GL context: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_samples_within_the_request_win() {
        assert_eq!(preferred_config(&[0, 2, 4, 8], 4), Some(2));
        assert_eq!(preferred_config(&[4, 0, 2], 8), Some(0));
    }

    #[test]
    fn multisampled_config_listed_first_is_skipped_without_msaa() {
        assert_eq!(preferred_config(&[4, 0], 0), Some(1));
    }

    #[test]
    fn fewest_samples_when_nothing_fits() {
        assert_eq!(preferred_config(&[8, 4, 16], 2), Some(1));
        assert_eq!(preferred_config(&[], 4), None);
    }
}
