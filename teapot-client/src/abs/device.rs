//! [`GraphicsDevice`] implementation over a `glow` context.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use glow::HasContext;
use teapot_core::gpu::GraphicsDevice;

/// An OpenGL context viewed through the core crate's GPU trait.
pub struct GlDevice {
    gl: Arc<glow::Context>,
}

impl GlDevice {
    pub fn new(gl: &Arc<glow::Context>) -> Self {
        Self { gl: Arc::clone(gl) }
    }

    /// Fixed pipeline state used by every frame: depth testing on, culling off.
    pub fn init_state(&self) {
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.disable(glow::CULL_FACE);
        }
    }

    pub fn viewport(&self, width: i32, height: i32) {
        unsafe {
            self.gl.viewport(0, 0, width, height);
        }
    }
}

impl GraphicsDevice for GlDevice {
    type Program = glow::Program;
    type VertexArray = glow::VertexArray;
    type Buffer = glow::Buffer;
    type Texture = glow::Texture;
    type UniformLocation = glow::UniformLocation;

    fn attrib_location(&self, program: glow::Program, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(&self, program: glow::Program, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn create_vertex_array(&mut self) -> Result<glow::VertexArray, String> {
        unsafe { self.gl.create_vertex_array() }
    }

    fn create_vertex_buffer(&mut self, data: &[f32]) -> Result<glow::Buffer, String> {
        unsafe {
            let vbo = self.gl.create_buffer()?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(vbo)
        }
    }

    fn attach_attribute(
        &mut self,
        vao: glow::VertexArray,
        buffer: glow::Buffer,
        location: u32,
        components: i32,
    ) {
        unsafe {
            self.gl.bind_vertex_array(Some(vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl
                .vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, 0, 0);
            self.gl.enable_vertex_attrib_array(location);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            self.gl.bind_vertex_array(None);
        }
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<glow::Texture, String> {
        unsafe {
            let texture = self.gl.create_texture()?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(rgba)),
            );
            self.gl.generate_mipmap(glow::TEXTURE_2D);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            self.gl.bind_texture(glow::TEXTURE_2D, None);
            Ok(texture)
        }
    }

    fn clear(&mut self, color: [f32; 4]) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn use_program(&mut self, program: glow::Program) {
        unsafe {
            self.gl.use_program(Some(program));
        }
    }

    fn bind_vertex_array(&mut self, vao: Option<glow::VertexArray>) {
        unsafe {
            self.gl.bind_vertex_array(vao);
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: Option<glow::Texture>) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, texture);
        }
    }

    fn draw_triangles(&mut self, count: usize) {
        unsafe {
            self.gl.draw_arrays(glow::TRIANGLES, 0, count as i32);
        }
    }

    fn set_uniform_f32(&mut self, location: &glow::UniformLocation, value: f32) {
        unsafe {
            self.gl.uniform_1_f32(Some(location), value);
        }
    }

    fn set_uniform_i32(&mut self, location: &glow::UniformLocation, value: i32) {
        unsafe {
            self.gl.uniform_1_i32(Some(location), value);
        }
    }

    fn set_uniform_vec3(&mut self, location: &glow::UniformLocation, value: Vec3) {
        unsafe {
            self.gl
                .uniform_3_f32(Some(location), value.x, value.y, value.z);
        }
    }

    fn set_uniform_mat4(&mut self, location: &glow::UniformLocation, value: &Mat4) {
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(location), false, &value.to_cols_array());
        }
    }
}
