//! Thin wrappers over SDL2 and OpenGL: the window and context, shader compilation, and the
//! [`GlDevice`] that implements the core crate's GPU trait.

pub mod app;
pub mod device;
pub mod shader;

pub use app::*;
pub use device::*;
pub use shader::*;
