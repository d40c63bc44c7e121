//! The core of the teapot demo. This crate holds everything that does not need a live window:
//! mesh loading, scene configuration, the per-frame transform state, the GPU binding logic and
//! the frame driver. All GPU access goes through the [`gpu::GraphicsDevice`] trait so the client
//! can plug in an OpenGL context while tests plug in a recorder.

pub mod binder;
pub mod config;
pub mod error;
pub mod frame;
pub mod gpu;
pub mod mesh;
pub mod scene;
pub mod texture;
pub mod timer;

pub use error::{BindError, ConfigError, Error, MeshError, TextureError};
