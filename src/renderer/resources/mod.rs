/// "Resources" refers to GL objects created on the shared context.
/// Each one owns its GL handle and releases it when dropped.

pub mod buffer;
pub mod framebuffer;
pub mod mesh;
pub mod model;
pub mod shader;
pub mod texture;
pub mod vertex;
