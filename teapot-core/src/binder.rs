//! One-time upload of meshes and textures, and wiring of shader inputs.
//!
//! [`bind`] turns a [`MeshData`] into a [`MeshBinding`]: one vertex array with one buffer per
//! attribute. [`UniformSlots`] resolves the uniform locations once so that the frame driver can
//! reuse them every frame.

use crate::{
    error::{BindError, TextureError},
    gpu::GraphicsDevice,
    mesh::MeshData,
    texture::TextureImage,
};

pub const ATTRIB_POSITION: &str = "position";
pub const ATTRIB_NORMAL: &str = "normal";
pub const ATTRIB_UV: &str = "uv";

/// Which attributes a mesh is uploaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexLayout {
    /// `position` and `normal`.
    Lit,
    /// `position`, `normal` and `uv`.
    Textured,
}

/// GPU-side handles for one mesh.
#[derive(Debug)]
pub struct MeshBinding<D: GraphicsDevice + ?Sized> {
    pub vao: D::VertexArray,
    pub buffers: Vec<D::Buffer>,
    pub vertex_count: usize,
}

/// Uniform locations queried once at start-up.
#[derive(Debug, Clone)]
pub struct UniformSlots<L> {
    pub mv: L,
    pub projection: L,
    pub light_pos: L,
    pub mat_ambient: L,
    pub mat_diffuse: L,
    pub mat_specular: L,
    pub mat_power: L,
    /// The texture sampler. Optional because GLSL defaults samplers to unit 0.
    pub texture: Option<L>,
}

impl<L> UniformSlots<L> {
    /// Looks up every uniform the Phong shaders use. A missing name is an error.
    pub fn resolve<D>(device: &D, program: D::Program) -> Result<Self, BindError>
    where
        D: GraphicsDevice<UniformLocation = L> + ?Sized,
    {
        let lookup = |name: &'static str| {
            device
                .uniform_location(program, name)
                .ok_or(BindError::MissingUniform(name))
        };

        Ok(Self {
            mv: lookup("mv")?,
            projection: lookup("projection")?,
            light_pos: lookup("light_pos")?,
            mat_ambient: lookup("mat_ambient")?,
            mat_diffuse: lookup("mat_diffuse")?,
            mat_specular: lookup("mat_specular")?,
            mat_power: lookup("mat_power")?,
            texture: device.uniform_location(program, "tex"),
        })
    }
}

/// Uploads `mesh` and attaches its buffers to the program's `position`, `normal` and, for the
/// textured layout, `uv` attributes. Texture coordinates are ignored by the lit layout.
pub fn bind<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    mesh: &MeshData,
    program: D::Program,
    layout: VertexLayout,
) -> Result<MeshBinding<D>, BindError> {
    let position = attrib(device, program, ATTRIB_POSITION)?;
    let normal = attrib(device, program, ATTRIB_NORMAL)?;
    let uv = match layout {
        VertexLayout::Lit => None,
        VertexLayout::Textured if !mesh.has_uvs() => return Err(BindError::MissingTexCoords),
        VertexLayout::Textured => Some(attrib(device, program, ATTRIB_UV)?),
    };

    let vao = device.create_vertex_array().map_err(BindError::Device)?;
    let mut buffers = Vec::with_capacity(3);

    let vbo = upload(device, bytemuck::cast_slice(mesh.positions()))?;
    device.attach_attribute(vao, vbo, position, 3);
    buffers.push(vbo);

    let vbo = upload(device, bytemuck::cast_slice(mesh.normals()))?;
    device.attach_attribute(vao, vbo, normal, 3);
    buffers.push(vbo);

    if let Some(uv) = uv {
        let vbo = upload(device, bytemuck::cast_slice(mesh.uvs()))?;
        device.attach_attribute(vao, vbo, uv, 2);
        buffers.push(vbo);
    }

    log::debug!(
        "Bound mesh: {:?} with {} buffers, {} vertices",
        vao,
        buffers.len(),
        mesh.vertex_count()
    );

    Ok(MeshBinding {
        vao,
        buffers,
        vertex_count: mesh.vertex_count(),
    })
}

/// Creates a GPU texture from a decoded image.
pub fn upload_texture<D: GraphicsDevice + ?Sized>(
    device: &mut D,
    image: &TextureImage,
) -> Result<D::Texture, TextureError> {
    device
        .create_texture(image.width(), image.height(), image.pixels())
        .map_err(TextureError::Upload)
}

fn attrib<D: GraphicsDevice + ?Sized>(
    device: &D,
    program: D::Program,
    name: &'static str,
) -> Result<u32, BindError> {
    device
        .attrib_location(program, name)
        .ok_or(BindError::MissingAttribute(name))
}

fn upload<D: GraphicsDevice + ?Sized>(device: &mut D, data: &[f32]) -> Result<D::Buffer, BindError> {
    device.create_vertex_buffer(data).map_err(BindError::Device)
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::gpu::recording::{ALL_UNIFORMS, Call, RecordingDevice};

    fn triangle(uvs: bool) -> MeshData {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let normals = vec![Vec3::Z; 3];
        let uvs = if uvs {
            vec![Vec2::ZERO, Vec2::X, Vec2::Y]
        } else {
            vec![]
        };
        MeshData::new(positions, normals, uvs).unwrap()
    }

    #[test]
    fn test_bind_untextured_mesh() {
        let mut device = RecordingDevice::new();
        let binding = bind(&mut device, &triangle(false), 0, VertexLayout::Lit).unwrap();

        assert_eq!(binding.vertex_count, 3);
        assert_eq!(binding.buffers.len(), 2);

        let attributes = &device.vertex_arrays[&binding.vao];
        assert_eq!(
            attributes,
            &vec![(0, binding.buffers[0], 3), (1, binding.buffers[1], 3)]
        );
        assert_eq!(
            device.buffers[&binding.buffers[0]],
            vec![0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
        assert_eq!(device.buffers[&binding.buffers[1]], [0.0f32, 0.0, 1.0].repeat(3));
    }

    #[test]
    fn test_bind_textured_mesh() {
        let mut device = RecordingDevice::new();
        let binding = bind(&mut device, &triangle(true), 0, VertexLayout::Textured).unwrap();

        assert_eq!(binding.buffers.len(), 3);
        let attributes = &device.vertex_arrays[&binding.vao];
        assert_eq!(attributes[2], (2, binding.buffers[2], 2));
        assert_eq!(
            device.buffers[&binding.buffers[2]],
            vec![0.0f32, 0.0, 1.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_lit_layout_skips_uvs() {
        let mut device = RecordingDevice::with_program(&["position", "normal"], &ALL_UNIFORMS);
        let binding = bind(&mut device, &triangle(true), 0, VertexLayout::Lit).unwrap();
        assert_eq!(binding.buffers.len(), 2);
        assert_eq!(device.vertex_arrays[&binding.vao].len(), 2);
    }

    #[test]
    fn test_textured_layout_needs_uvs() {
        let mut device = RecordingDevice::new();
        let err = bind(&mut device, &triangle(false), 0, VertexLayout::Textured).unwrap_err();
        assert!(matches!(err, BindError::MissingTexCoords));
    }

    #[test]
    fn test_binding_twice_keeps_meshes_isolated() {
        let mut device = RecordingDevice::new();
        let first = bind(&mut device, &triangle(false), 0, VertexLayout::Lit).unwrap();
        let first_state = device.vertex_arrays[&first.vao].clone();

        let second = bind(&mut device, &triangle(true), 0, VertexLayout::Textured).unwrap();
        let third = bind(&mut device, &triangle(false), 0, VertexLayout::Lit).unwrap();

        assert_ne!(first.vao, second.vao);
        assert_ne!(second.vao, third.vao);
        assert_eq!(device.vertex_arrays[&first.vao], first_state);
        assert!(
            device.vertex_arrays[&second.vao]
                .iter()
                .all(|(_, buffer, _)| !first.buffers.contains(buffer))
        );
        assert_eq!(
            device
                .calls
                .iter()
                .filter(|c| matches!(c, Call::CreateVertexArray(_)))
                .count(),
            3
        );
    }

    #[test]
    fn test_missing_attribute() {
        let mut device = RecordingDevice::with_program(&["position", "normal"], &ALL_UNIFORMS);
        assert!(bind(&mut device, &triangle(false), 0, VertexLayout::Lit).is_ok());

        let err = bind(&mut device, &triangle(true), 0, VertexLayout::Textured).unwrap_err();
        assert!(matches!(err, BindError::MissingAttribute("uv")));

        let mut device = RecordingDevice::with_program(&["normal"], &ALL_UNIFORMS);
        let err = bind(&mut device, &triangle(false), 0, VertexLayout::Lit).unwrap_err();
        assert!(matches!(err, BindError::MissingAttribute("position")));
        // Nothing is allocated when the lookup fails.
        assert!(device.calls.is_empty());
    }

    #[test]
    fn test_resolve_uniforms() {
        let device = RecordingDevice::new();
        let slots = UniformSlots::resolve(&device, 0).unwrap();
        assert_eq!(slots.mv, "mv");
        assert_eq!(slots.mat_power, "mat_power");
        assert_eq!(slots.texture, None);

        let device = RecordingDevice::with_program(
            &["position", "normal"],
            &["mv", "projection", "light_pos", "mat_ambient", "mat_diffuse", "mat_specular"],
        );
        let err = UniformSlots::resolve(&device, 0).unwrap_err();
        assert!(matches!(err, BindError::MissingUniform("mat_power")));
    }

    #[test]
    fn test_upload_texture() {
        let mut device = RecordingDevice::new();
        let image = image::DynamicImage::new_rgba8(4, 2);
        let texture = upload_texture(&mut device, &TextureImage::from_image(&image)).unwrap();
        assert_eq!(
            device.calls.last(),
            Some(&Call::CreateTexture {
                id: texture,
                width: 4,
                height: 2
            })
        );
    }
}
