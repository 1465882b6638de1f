use std::path::{Path, PathBuf};

/// Contains configuration options for the renderer like the resolution, vsync, and where assets are read from
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Requested MSAA sample count for the default framebuffer, 0 disables multisampling
    pub samples: u8,
    pub assets_dir: PathBuf,
    pub shaders_dir: PathBuf,
}

impl RenderConfig {
    /// Path of a texture, model or HDR map relative to the assets directory
    pub fn asset(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.assets_dir.join(relative)
    }

    /// Directory holding the GLSL sources of one tutorial chapter
    pub fn shaders(&self, chapter: &str) -> PathBuf {
        self.shaders_dir.join(chapter)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: "LearnOpenGL".to_string(),
            width: 800,
            height: 600,
            vsync: true,
            samples: 0,
            assets_dir: PathBuf::from("resources"),
            shaders_dir: PathBuf::from("shaders"),
        }
    }
}
