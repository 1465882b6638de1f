use std::path::PathBuf;
use clap::{Parser, ValueEnum};
use crate::demos::DemoKind;
use crate::renderer::config::RenderConfig;

/// Runs one of the LearnOpenGL demos
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct AppArgs {
    /// Demo to run
    #[arg(value_enum, required_unless_present = "list")]
    pub demo: Option<DemoKind>,

    /// Window width, defaults to the demo's own size
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height, defaults to the demo's own size
    #[arg(long)]
    pub height: Option<u32>,

    /// Present without waiting for vertical sync
    #[arg(long)]
    pub no_vsync: bool,

    /// MSAA samples of the default framebuffer
    #[arg(long, default_value_t = 0)]
    pub samples: u8,

    /// Directory holding textures, models and HDR maps
    #[arg(long, default_value = "resources")]
    pub assets: PathBuf,

    /// Directory holding the GLSL sources, one sub-directory per chapter
    #[arg(long, default_value = "shaders")]
    pub shaders: PathBuf,

    /// List the available demos and exit
    #[arg(long)]
    pub list: bool,
}

impl AppArgs {
    pub fn render_config(&self, demo: DemoKind) -> RenderConfig {
        let (default_width, default_height) = demo.default_window_size();
        let name = demo
            .to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_else(|| format!("{demo:?}"));

        RenderConfig {
            title: format!("LearnOpenGL - {name}"),
            width: self.width.unwrap_or(default_width),
            height: self.height.unwrap_or(default_height),
            vsync: !self.no_vsync,
            samples: self.samples,
            assets_dir: self.assets.clone(),
            shaders_dir: self.shaders.clone(),
        }
    }
}

/// One line per demo for `--list`
pub fn demo_listing() -> Vec<String> {
    DemoKind::value_variants()
        .iter()
        .filter_map(|kind| {
            kind.to_possible_value()
                .map(|value| format!("{:<28} {}", value.get_name(), kind.description()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_defaults_fill_the_config() {
        let args = AppArgs::try_parse_from(["learnopengl", "bloom"]).unwrap();
        assert_eq!(args.demo, Some(DemoKind::Bloom));

        let config = args.render_config(DemoKind::Bloom);
        assert_eq!((config.width, config.height), (1280, 720));
        assert!(config.vsync);
        assert_eq!(config.samples, 0);
        assert_eq!(config.title, "LearnOpenGL - bloom");
        assert_eq!(config.assets_dir, PathBuf::from("resources"));
    }

    #[test]
    fn flags_override_defaults() {
        let args = AppArgs::try_parse_from([
            "learnopengl",
            "colors",
            "--width",
            "1024",
            "--no-vsync",
            "--samples",
            "4",
            "--shaders",
            "/tmp/glsl",
        ])
        .unwrap();

        let config = args.render_config(DemoKind::Colors);
        assert_eq!((config.width, config.height), (1024, 600));
        assert!(!config.vsync);
        assert_eq!(config.samples, 4);
        assert_eq!(config.shaders(""), PathBuf::from("/tmp/glsl"));
    }

    #[test]
    fn demo_is_required_unless_listing() {
        assert!(AppArgs::try_parse_from(["learnopengl"]).is_err());
        assert!(AppArgs::try_parse_from(["learnopengl", "not-a-demo"]).is_err());
        let args = AppArgs::try_parse_from(["learnopengl", "--list"]).unwrap();
        assert!(args.list);
        assert_eq!(args.demo, None);
    }

    #[test]
    fn listing_covers_every_demo() {
        let listing = demo_listing();
        assert_eq!(listing.len(), 26);
        assert!(listing[0].starts_with("hello-window "));
    }
}
