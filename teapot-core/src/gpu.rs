//! The GPU seam.
//!
//! This module defines the [`GraphicsDevice`] trait, the small set of graphics calls the binder
//! and frame driver need, and the [`Uniform`] trait for uploading shader constants.

use glam::{Mat4, Vec3};

/// Primitive operations on a graphics context.
///
/// Handles are owned by the device implementation. None of the methods validate state; callers
/// are expected to bind before they draw.
pub trait GraphicsDevice {
    type Program: Copy;
    type VertexArray: Copy + PartialEq + std::fmt::Debug;
    type Buffer: Copy + std::fmt::Debug;
    type Texture: Copy + std::fmt::Debug;
    type UniformLocation: Clone + std::fmt::Debug;

    /// Looks up an active vertex attribute slot by name.
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;

    /// Looks up an active uniform by name.
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;

    fn create_vertex_array(&mut self) -> Result<Self::VertexArray, String>;

    /// Allocates a static vertex buffer and fills it with `data`.
    fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<Self::Buffer, String>;

    /// Records in `vao` that attribute `location` reads tightly packed records of `components`
    /// floats from `buffer`, and enables the attribute.
    fn attach_attribute(
        &mut self,
        vao: Self::VertexArray,
        buffer: Self::Buffer,
        location: u32,
        components: i32,
    );

    /// Creates a 2D RGBA8 texture.
    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<Self::Texture, String>;

    fn clear(&mut self, color: [f32; 4]);

    fn use_program(&mut self, program: Self::Program);

    fn bind_vertex_array(&mut self, vao: Option<Self::VertexArray>);

    fn bind_texture(&mut self, unit: u32, texture: Option<Self::Texture>);

    /// Draws `count` vertices from the bound vertex array as a triangle list.
    fn draw_triangles(&mut self, count: usize);

    fn set_uniform_f32(&mut self, location: &Self::UniformLocation, value: f32);

    fn set_uniform_i32(&mut self, location: &Self::UniformLocation, value: i32);

    fn set_uniform_vec3(&mut self, location: &Self::UniformLocation, value: Vec3);

    fn set_uniform_mat4(&mut self, location: &Self::UniformLocation, value: &Mat4);
}

/// Represents a value that can be uploaded to a uniform slot.
pub trait Uniform {
    /// Uploads the value to `location` on the currently used program.
    fn set_uniform<D: GraphicsDevice + ?Sized>(&self, device: &mut D, location: &D::UniformLocation);
}

impl Uniform for f32 {
    fn set_uniform<D: GraphicsDevice + ?Sized>(&self, device: &mut D, location: &D::UniformLocation) {
        device.set_uniform_f32(location, *self);
    }
}

impl Uniform for i32 {
    fn set_uniform<D: GraphicsDevice + ?Sized>(&self, device: &mut D, location: &D::UniformLocation) {
        device.set_uniform_i32(location, *self);
    }
}

impl Uniform for Vec3 {
    fn set_uniform<D: GraphicsDevice + ?Sized>(&self, device: &mut D, location: &D::UniformLocation) {
        device.set_uniform_vec3(location, *self);
    }
}

impl Uniform for Mat4 {
    fn set_uniform<D: GraphicsDevice + ?Sized>(&self, device: &mut D, location: &D::UniformLocation) {
        device.set_uniform_mat4(location, self);
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform<D: GraphicsDevice + ?Sized>(&self, device: &mut D, location: &D::UniformLocation) {
        (*self).set_uniform(device, location);
    }
}
