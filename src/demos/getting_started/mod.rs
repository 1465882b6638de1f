mod coordinate_systems;
mod hello_triangle;
mod hello_window;
mod shader_class;
mod transformations;

pub use coordinate_systems::{CameraDemo, CoordinateSystems};
pub use hello_triangle::{HelloTriangle, HelloTriangleTwoPrograms};
pub use hello_window::HelloWindow;
pub use shader_class::ShaderClass;
pub use transformations::Transformations;

const CHAPTER: &str = "getting_started";
