mod colors;
mod light_casters;
mod multiple_lights;

pub use colors::Colors;
pub use light_casters::LightCasters;
pub use multiple_lights::MultipleLights;

const CHAPTER: &str = "lighting";
