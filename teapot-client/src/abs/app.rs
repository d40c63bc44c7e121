//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

use anyhow::anyhow;

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a fixed-size window with a double-buffered OpenGL 3.3 core context and a depth
    /// buffer.
    pub fn new(title: &str, width: u32, height: u32) -> anyhow::Result<Self> {
        let sdl = sdl2::init().map_err(|e| anyhow!("failed to initialize SDL2: {e}"))?;
        let video_subsystem = sdl
            .video()
            .map_err(|e| anyhow!("failed to initialize video subsystem: {e}"))?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_double_buffer(true);
        gl_attr.set_depth_size(24);

        let window = video_subsystem
            .window(title, width, height)
            .opengl()
            .position_centered()
            .build()?;
        let gl_context = window
            .gl_create_context()
            .map_err(|e| anyhow!("failed to create OpenGL context: {e}"))?;
        window
            .gl_make_current(&gl_context)
            .map_err(|e| anyhow!("failed to make OpenGL context current: {e}"))?;

        // The fixed timer paces the redraws, not the display.
        if let Err(e) = video_subsystem.gl_set_swap_interval(sdl2::video::SwapInterval::Immediate) {
            log::warn!("Could not disable vsync: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl
            .event_pump()
            .map_err(|e| anyhow!("failed to create event pump: {e}"))?;
        let gl = Arc::new(gl);

        log::info!("Created {width}x{height} window '{title}'");

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl,
            event_pump,
        })
    }
}
