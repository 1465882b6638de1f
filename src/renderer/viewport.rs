use std::num::NonZeroU32;
use std::sync::Arc;
use color_eyre::Result;
use glow::HasContext;
use glutin::context::PossiblyCurrentContext;
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Target of the renderer, the window and the GL surface presented to it
pub struct RenderViewport {
    pub window: Arc<Window>,
    pub surface: Surface<WindowSurface>,
    size: PhysicalSize<u32>,
    minimized: bool,
}

/// Non-zero surface extent for a window size, `None` while the window is minimized
pub fn surface_extent(size: PhysicalSize<u32>) -> Option<(NonZeroU32, NonZeroU32)> {
    Some((NonZeroU32::new(size.width)?, NonZeroU32::new(size.height)?))
}

impl RenderViewport {
    pub fn new(window: Arc<Window>, surface: Surface<WindowSurface>) -> Self {
        let size = window.inner_size();
        Self {
            window,
            surface,
            size,
            minimized: surface_extent(size).is_none(),
        }
    }

    /// Matches the surface and the GL viewport to the window's current size.
    /// Returns the new size, or `None` when the window is minimized.
    pub fn resize(
        &mut self,
        gl: &glow::Context,
        gl_context: &PossiblyCurrentContext,
    ) -> Option<PhysicalSize<u32>> {
        let size = self.window.inner_size();
        let Some((width, height)) = surface_extent(size) else {
            log::warn!("Ignoring resize to {}x{}", size.width, size.height);
            self.minimized = true;
            return None;
        };
        self.minimized = false;

        self.surface.resize(gl_context, width, height);
        unsafe {
            gl.viewport(0, 0, size.width as i32, size.height as i32);
        }
        self.size = size;
        Some(size)
    }

    pub fn set_vsync(&self, gl_context: &PossiblyCurrentContext, vsync: bool) {
        let interval = if vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = self.surface.set_swap_interval(gl_context, interval) {
            log::warn!("Failed to set vsync to {vsync}: {e}");
        }
    }

    pub fn swap_buffers(&self, gl_context: &PossiblyCurrentContext) -> Result<()> {
        self.surface.swap_buffers(gl_context)?;
        Ok(())
    }

    /// True while the window has a zero sized client area and nothing should be drawn
    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn get_size(&self) -> PhysicalSize<u32> {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_windows_have_no_extent() {
        assert!(surface_extent(PhysicalSize::new(0, 0)).is_none());
        assert!(surface_extent(PhysicalSize::new(800, 0)).is_none());
        assert!(surface_extent(PhysicalSize::new(0, 600)).is_none());
    }

    #[test]
    fn extent_keeps_the_window_size() {
        let (width, height) = surface_extent(PhysicalSize::new(1280, 720)).unwrap();
        assert_eq!((width.get(), height.get()), (1280, 720));
    }
}
