use color_eyre::Result;
use glam::Vec3;
use crate::demos::{clear, Demo, FrameContext};

/// Opens the window and, when a colour is set, clears it every frame
pub struct HelloWindow {
    clear_color: Option<Vec3>,
}

impl HelloWindow {
    pub fn new(clear_color: Option<Vec3>) -> Self {
        Self {
            clear_color,
        }
    }
}

impl Demo for HelloWindow {
    fn render(&mut self, frame: &FrameContext) -> Result<()> {
        if let Some(color) = self.clear_color {
            clear(frame.gl, color, glow::COLOR_BUFFER_BIT);
        }
        Ok(())
    }
}
