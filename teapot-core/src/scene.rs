//! CPU-side scene state.
//!
//! [`SceneState`] owns the camera, the projection, the light and one [`MeshInstance`] per mesh.
//! Only the model matrices change after initialization.

use std::time::Duration;

use glam::{Mat4, Vec3};

use crate::config::{MaterialConfig, SceneConfig};

/// Phong material constants for one mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub power: f32,
}

impl From<&MaterialConfig> for Material {
    fn from(config: &MaterialConfig) -> Self {
        Self {
            ambient: Vec3::from(config.ambient),
            diffuse: Vec3::from(config.diffuse),
            specular: Vec3::from(config.specular),
            power: config.power,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::from(&MaterialConfig::default())
    }
}

/// A single point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
}

/// Per-mesh transform and material.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshInstance {
    pub material: Material,
    rotation: Mat4,
    offset: Option<Vec3>,
    model: Mat4,
}

impl MeshInstance {
    pub fn new(material: Material, offset: Option<Vec3>) -> Self {
        let mut instance = Self {
            material,
            rotation: Mat4::IDENTITY,
            offset,
            model: Mat4::IDENTITY,
        };
        instance.rebuild_model();
        instance
    }

    /// The mesh-to-world transform.
    pub fn model(&self) -> Mat4 {
        self.model
    }

    /// The accumulated rotation, without any offset.
    pub fn rotation(&self) -> Mat4 {
        self.rotation
    }

    /// World-space position of the mesh origin.
    pub fn world_position(&self) -> Vec3 {
        self.model.transform_point3(Vec3::ZERO)
    }

    /// Rotates relative to the previous rotation, then re-derives the translation from identity.
    fn rotate(&mut self, angle: f32) {
        self.rotation *= Mat4::from_rotation_y(angle);
        self.rebuild_model();
    }

    fn rebuild_model(&mut self) {
        self.model = match self.offset {
            Some(offset) => Mat4::from_translation(offset) * self.rotation,
            None => self.rotation,
        };
    }
}

/// All transform, light and material data for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    view: Mat4,
    projection: Mat4,
    pub light: Light,
    pub clear_color: [f32; 4],
    angular_speed: f32,
    instances: Vec<MeshInstance>,
}

impl SceneState {
    /// Builds the initial state: camera, projection, identity model matrices and the fixed
    /// material and light constants.
    pub fn initialize(config: &SceneConfig) -> Self {
        let camera = &config.camera;
        let view = Mat4::look_at_rh(
            Vec3::from(camera.eye),
            Vec3::from(camera.center),
            Vec3::from(camera.up),
        );
        let projection = Mat4::perspective_rh_gl(
            config.projection.fov_degrees.to_radians(),
            config.aspect(),
            config.projection.near,
            config.projection.far,
        );
        let instances = config
            .meshes
            .iter()
            .map(|mesh| MeshInstance::new(Material::from(&mesh.material), mesh.offset()))
            .collect();

        Self {
            view,
            projection,
            light: Light {
                position: Vec3::from(config.light.position),
            },
            clear_color: config.clear_color,
            angular_speed: config.angular_speed,
            instances,
        }
    }

    /// Advances every mesh by `angular_speed * dt` radians around the vertical axis.
    pub fn advance(&mut self, dt: Duration) {
        let angle = self.angular_speed * dt.as_secs_f32();
        for instance in &mut self.instances {
            instance.rotate(angle);
        }
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn instances(&self) -> &[MeshInstance] {
        &self.instances
    }

    /// The combined view-model transform for the mesh at `index`.
    pub fn model_view(&self, index: usize) -> Option<Mat4> {
        self.instances.get(index).map(|i| self.view * i.model())
    }
}
