//! The per-frame redraw cycle.
//!
//! [`FrameDriver`] owns the [`SceneState`] together with the GPU handles produced by the binder.
//! Every tick advances the model matrices and redraws every mesh with its cached uniforms.

use std::time::Duration;

use crate::{
    binder::{MeshBinding, UniformSlots},
    error::BindError,
    gpu::{GraphicsDevice, Uniform},
    scene::SceneState,
};

/// Texture unit the mesh textures are bound to.
pub const TEXTURE_UNIT: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Idle,
    Rendering,
}

/// GPU handles for one mesh instance, in the same order as [`SceneState::instances`].
pub struct MeshResources<D: GraphicsDevice + ?Sized> {
    pub binding: MeshBinding<D>,
    pub texture: Option<D::Texture>,
}

/// Drives the redraw cycle over an explicit scene.
pub struct FrameDriver<D: GraphicsDevice + ?Sized> {
    scene: SceneState,
    program: D::Program,
    slots: UniformSlots<D::UniformLocation>,
    meshes: Vec<MeshResources<D>>,
    state: FrameState,
    frames: u64,
}

impl<D: GraphicsDevice + ?Sized> FrameDriver<D> {
    /// Creates a driver. `meshes` must line up with the scene's mesh instances.
    pub fn new(
        scene: SceneState,
        program: D::Program,
        slots: UniformSlots<D::UniformLocation>,
        meshes: Vec<MeshResources<D>>,
    ) -> Result<Self, BindError> {
        if scene.instances().len() != meshes.len() {
            return Err(BindError::MeshCount {
                instances: scene.instances().len(),
                meshes: meshes.len(),
            });
        }
        Ok(Self {
            scene,
            program,
            slots,
            meshes,
            state: FrameState::Idle,
            frames: 0,
        })
    }

    /// Advances the scene by `dt` and draws one frame. The caller presents the frame.
    pub fn tick(&mut self, device: &mut D, dt: Duration) {
        self.scene.advance(dt);
        self.render_frame(device);
    }

    /// Clears the target and draws every mesh with its current transform.
    pub fn render_frame(&mut self, device: &mut D) {
        self.state = FrameState::Rendering;

        device.clear(self.scene.clear_color);
        device.use_program(self.program);

        let projection = self.scene.projection();
        let view = self.scene.view();
        let light = self.scene.light.position;

        for (instance, mesh) in self.scene.instances().iter().zip(&self.meshes) {
            let mv = view * instance.model();
            let material = &instance.material;

            upload(device, &self.slots.mv, mv);
            upload(device, &self.slots.projection, projection);
            upload(device, &self.slots.light_pos, light);
            upload(device, &self.slots.mat_ambient, material.ambient);
            upload(device, &self.slots.mat_diffuse, material.diffuse);
            upload(device, &self.slots.mat_specular, material.specular);
            upload(device, &self.slots.mat_power, material.power);

            if let Some(texture) = mesh.texture {
                if let Some(sampler) = &self.slots.texture {
                    upload(device, sampler, TEXTURE_UNIT as i32);
                }
                device.bind_texture(TEXTURE_UNIT, Some(texture));
            }

            device.bind_vertex_array(Some(mesh.binding.vao));
            device.draw_triangles(mesh.binding.vertex_count);
            device.bind_vertex_array(None);

            if mesh.texture.is_some() {
                device.bind_texture(TEXTURE_UNIT, None);
            }
        }

        self.frames += 1;
        self.state = FrameState::Idle;
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

fn upload<D: GraphicsDevice + ?Sized, T: Uniform>(device: &mut D, location: &D::UniformLocation, value: T) {
    value.set_uniform(device, location);
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec2, Vec3};

    use super::*;
    use crate::{
        binder::{self, UniformSlots, VertexLayout},
        config::{MeshConfig, SceneConfig},
        gpu::recording::{Call, RecordingDevice, UniformValue},
        mesh::MeshData,
    };

    const TICK: Duration = Duration::from_millis(10);

    fn triangle() -> MeshData {
        MeshData::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![Vec3::Z; 3],
            vec![Vec2::ZERO, Vec2::X, Vec2::Y],
        )
        .unwrap()
    }

    fn driver(
        device: &mut RecordingDevice,
        meshes: Vec<(MeshConfig, MeshData, bool)>,
    ) -> FrameDriver<RecordingDevice> {
        let config = SceneConfig {
            meshes: meshes.iter().map(|(c, _, _)| c.clone()).collect(),
            ..Default::default()
        };
        let scene = SceneState::initialize(&config);
        let slots = UniformSlots::resolve(&*device, 0).unwrap();
        let resources = meshes
            .iter()
            .map(|(_, mesh, textured)| {
                let layout = if *textured {
                    VertexLayout::Textured
                } else {
                    VertexLayout::Lit
                };
                let binding = binder::bind(&mut *device, mesh, 0, layout).unwrap();
                let texture = textured.then(|| device.create_texture(1, 1, &[255; 4]).unwrap());
                MeshResources { binding, texture }
            })
            .collect();
        device.calls.clear();
        FrameDriver::new(scene, 0, slots, resources).unwrap()
    }

    #[test]
    fn test_single_triangle_frame() {
        let mut device = RecordingDevice::new();
        let mut driver = driver(
            &mut device,
            vec![(MeshConfig::new("triangle.obj"), triangle(), false)],
        );
        let vao = driver.meshes[0].binding.vao;

        driver.render_frame(&mut device);

        assert_eq!(device.draws(), vec![(Some(vao), 3)]);
        assert_eq!(
            device.uniform_values("mv"),
            vec![UniformValue::Mat4(driver.scene().view() * Mat4::IDENTITY)]
        );
        assert_eq!(
            device.uniform_values("projection"),
            vec![UniformValue::Mat4(driver.scene().projection())]
        );
        assert_eq!(
            device.uniform_values("light_pos"),
            vec![UniformValue::Vec3(Vec3::splat(4.0))]
        );
        assert_eq!(
            device.uniform_values("mat_power"),
            vec![UniformValue::F32(1024.0)]
        );
        assert_eq!(device.calls.first(), Some(&Call::Clear));
        assert_eq!(device.calls[1], Call::UseProgram(0));
        assert_eq!(device.calls.last(), Some(&Call::BindVertexArray(None)));
        assert_eq!(driver.frames(), 1);
        assert_eq!(driver.state(), FrameState::Idle);
    }

    #[test]
    fn test_tick_advances_before_drawing() {
        let mut device = RecordingDevice::new();
        let mut driver = driver(
            &mut device,
            vec![(MeshConfig::new("triangle.obj"), triangle(), false)],
        );

        driver.tick(&mut device, TICK);
        driver.tick(&mut device, TICK);

        let view = driver.scene().view();
        let mvs = device.uniform_values("mv");
        assert_eq!(mvs.len(), 2);
        let UniformValue::Mat4(second) = mvs[1] else {
            panic!("mv is not a matrix");
        };
        assert!(second.abs_diff_eq(view * Mat4::from_rotation_y(0.02), 1e-5));

        // The projection sent every frame is the same.
        let projections = device.uniform_values("projection");
        assert_eq!(projections[0], projections[1]);
        assert_eq!(driver.frames(), 2);
    }

    #[test]
    fn test_two_meshes_draw_in_order_with_textures() {
        let mut device = RecordingDevice::new();
        let mut torus = MeshConfig::new("torus.obj");
        torus.offset = Some([2.0, 0.0, 0.0]);
        let mut driver = driver(
            &mut device,
            vec![
                (MeshConfig::new("teapot.obj"), triangle(), false),
                (torus, triangle(), true),
            ],
        );
        let first = driver.meshes[0].binding.vao;
        let second = driver.meshes[1].binding.vao;
        let texture = driver.meshes[1].texture;

        for _ in 0..100 {
            driver.tick(&mut device, TICK);
        }

        let draws = device.draws();
        assert_eq!(draws.len(), 200);
        assert_eq!(draws[0], (Some(first), 3));
        assert_eq!(draws[1], (Some(second), 3));

        // Only the textured mesh binds its texture, and unbinds it afterwards.
        let binds: Vec<_> = device
            .calls
            .iter()
            .filter(|c| matches!(c, Call::BindTexture { .. }))
            .take(2)
            .cloned()
            .collect();
        assert_eq!(
            binds,
            vec![
                Call::BindTexture {
                    unit: TEXTURE_UNIT,
                    texture
                },
                Call::BindTexture {
                    unit: TEXTURE_UNIT,
                    texture: None
                },
            ]
        );

        let world = driver.scene().instances()[1].world_position();
        assert!(world.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn test_sampler_set_when_present() {
        let mut device = RecordingDevice::with_program(
            &["position", "normal", "uv"],
            &[
                "mv",
                "projection",
                "light_pos",
                "mat_ambient",
                "mat_diffuse",
                "mat_specular",
                "mat_power",
                "tex",
            ],
        );
        let mut driver = driver(
            &mut device,
            vec![(MeshConfig::new("teapot.obj"), triangle(), true)],
        );

        driver.render_frame(&mut device);
        assert_eq!(
            device.uniform_values("tex"),
            vec![UniformValue::I32(TEXTURE_UNIT as i32)]
        );
    }

    #[test]
    fn test_mesh_count_must_match_scene() {
        let mut device = RecordingDevice::new();
        let config = SceneConfig {
            meshes: vec![MeshConfig::new("teapot.obj"), MeshConfig::new("torus.obj")],
            ..Default::default()
        };
        let scene = SceneState::initialize(&config);
        let slots = UniformSlots::resolve(&device, 0).unwrap();
        let binding = binder::bind(&mut device, &triangle(), 0, VertexLayout::Lit).unwrap();
        let meshes = vec![MeshResources {
            binding,
            texture: None,
        }];

        let result = FrameDriver::new(scene, 0, slots, meshes);
        assert!(matches!(
            result,
            Err(BindError::MeshCount {
                instances: 2,
                meshes: 1
            })
        ));
    }
}
