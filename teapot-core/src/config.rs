//! Scene descriptions.
//!
//! A scene is described in JSON. Every field except `meshes` may be omitted, in which case the
//! defaults below are used. Vectors are written as `[x, y, z]` arrays.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;

use crate::error::ConfigError;

/// Which pair of shader sources the scene is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderKind {
    Phong,
    PhongTextured,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub center: [f32; 3],
    pub up: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [2.0, 2.0, 7.0],
            center: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [4.0, 4.0, 4.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub power: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            ambient: [0.2, 0.2, 0.1],
            diffuse: [0.5, 0.5, 0.3],
            specular: [0.7, 0.7, 0.7],
            power: 1024.0,
        }
    }
}

/// One mesh instance in the scene.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeshConfig {
    /// Path to the OBJ file, relative to the asset root.
    pub obj: PathBuf,
    /// Path to the texture image, relative to the asset root.
    #[serde(default)]
    pub texture: Option<PathBuf>,
    /// Translation re-applied every tick after rotation.
    #[serde(default)]
    pub offset: Option<[f32; 3]>,
    #[serde(default)]
    pub material: MaterialConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Interval between two redraws, in milliseconds.
    pub tick_ms: u64,
    /// Rotation speed around the vertical axis, in radians per second.
    pub angular_speed: f32,
    pub clear_color: [f32; 4],
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub light: LightConfig,
    pub shader: ShaderKind,
    pub meshes: Vec<MeshConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            title: "Hello OpenGL".to_string(),
            width: 800,
            height: 600,
            tick_ms: 10,
            angular_speed: 1.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            light: LightConfig::default(),
            shader: ShaderKind::Phong,
            meshes: Vec::new(),
        }
    }
}

impl SceneConfig {
    /// Parses and validates a scene description.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a scene description from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&s)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.meshes.is_empty() {
            return Err(ConfigError::NoMeshes);
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::WindowSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }

    /// Aspect ratio of the window.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Returns `true` if any mesh is textured.
    pub fn textured(&self) -> bool {
        self.meshes.iter().any(|m| m.texture.is_some())
    }
}

impl MeshConfig {
    /// Creates an untextured mesh entry with the default material.
    pub fn new(obj: impl Into<PathBuf>) -> Self {
        Self {
            obj: obj.into(),
            texture: None,
            offset: None,
            material: MaterialConfig::default(),
        }
    }

    pub fn offset(&self) -> Option<Vec3> {
        self.offset.map(Vec3::from)
    }
}
