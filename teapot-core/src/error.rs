//! Error types for everything that can go wrong while setting up a scene.
//!
//! Nothing here is recoverable: every error is surfaced once at start-up and ends the process.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating mesh geometry.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("failed to load OBJ file '{path}': {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to parse OBJ data: {0}")]
    Parse(#[from] tobj::LoadError),

    #[error("mesh has no normals (model '{0}')")]
    MissingNormals(String),

    #[error("mesh arrays differ in length: {positions} positions, {normals} normals, {uvs} uvs")]
    LengthMismatch {
        positions: usize,
        normals: usize,
        uvs: usize,
    },

    #[error("vertex count {0} is not a whole number of triangles")]
    NotTriangles(usize),

    #[error("mesh contains no vertices")]
    Empty,
}

/// Errors raised while decoding a texture image.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to load texture '{path}': {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create GPU texture: {0}")]
    Upload(String),
}

/// Errors raised while wiring meshes and uniforms to a shader program.
#[derive(Error, Debug)]
pub enum BindError {
    #[error("shader program has no active attribute named '{0}'")]
    MissingAttribute(&'static str),

    #[error("shader program has no active uniform named '{0}'")]
    MissingUniform(&'static str),

    #[error("textured mesh has no texture coordinates")]
    MissingTexCoords,

    #[error("scene has {instances} mesh instances but {meshes} bound meshes")]
    MeshCount { instances: usize, meshes: usize },

    #[error("GPU allocation failed: {0}")]
    Device(String),
}

/// Errors raised while reading a scene description.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read scene file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scene must contain at least one mesh")]
    NoMeshes,

    #[error("invalid window size {width}x{height}")]
    WindowSize { width: u32, height: u32 },

    #[error("tick interval must be greater than zero")]
    ZeroTick,
}

/// Top-level error for scene start-up.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
