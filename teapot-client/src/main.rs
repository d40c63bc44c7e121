use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    time::{Duration, Instant},
};

use anyhow::{Context, anyhow};
use sdl2::{event::Event, keyboard::Keycode};
use teapot_core::{
    binder::{self, UniformSlots, VertexLayout},
    config::{SceneConfig, ShaderKind},
    frame::{FrameDriver, MeshResources},
    mesh::MeshData,
    scene::SceneState,
    texture::TextureImage,
    timer::FixedTimer,
};

use crate::abs::*;

mod abs;
mod logging;

const SINGLE_SCENE_JSON: &str = include_str!("scenes/single.json");
const TEXTURED_SCENE_JSON: &str = include_str!("scenes/textured.json");

const ASSET_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

macro_rules! shader_sources {
    ($name:literal) => {
        (
            include_str!(concat!("shaders/", $name, "/vert.glsl")),
            include_str!(concat!("shaders/", $name, "/frag.glsl")),
        )
    };
}

/// Returns the `(vertex, fragment)` sources for a shader kind.
fn shader_sources(kind: ShaderKind) -> (&'static str, &'static str) {
    match kind {
        ShaderKind::Phong => shader_sources!("phong"),
        ShaderKind::PhongTextured => shader_sources!("phong_textured"),
    }
}

/// Picks the scene from the first argument: `single` (default), `textured`, or a JSON file path.
fn scene_config(arg: Option<&str>) -> anyhow::Result<SceneConfig> {
    let config = match arg {
        None | Some("single") => SceneConfig::from_json(SINGLE_SCENE_JSON)?,
        Some("textured") => SceneConfig::from_json(TEXTURED_SCENE_JSON)?,
        Some(path) => SceneConfig::load(path)?,
    };
    Ok(config)
}

fn asset_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new(ASSET_DIR).join(path)
    }
}

fn main() -> ExitCode {
    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let arg = std::env::args().nth(1);
    let config = scene_config(arg.as_deref()).context("failed to load scene description")?;
    log::info!(
        "Scene '{}': {} meshes, {:?} shader",
        config.title,
        config.meshes.len(),
        config.shader
    );

    let mut app = App::new(&config.title, config.width, config.height)?;
    let mut device = GlDevice::new(&app.gl);
    device.init_state();
    device.viewport(config.width as i32, config.height as i32);

    let (vert, frag) = shader_sources(config.shader);
    let program = ShaderProgram::from_sources(&app.gl, vert, frag)
        .map_err(|log| anyhow!("failed to build {:?} shader program: {log}", config.shader))?;
    let slots = UniformSlots::resolve(&device, program.id())?;

    let mut meshes = Vec::with_capacity(config.meshes.len());
    for mesh_config in &config.meshes {
        let path = asset_path(&mesh_config.obj);
        let mesh = MeshData::load_obj(&path)?;
        let layout = match mesh_config.texture {
            Some(_) => VertexLayout::Textured,
            None => VertexLayout::Lit,
        };
        let binding = binder::bind(&mut device, &mesh, program.id(), layout)
            .with_context(|| format!("failed to bind {}", path.display()))?;
        log::info!("Loaded {} ({} vertices)", path.display(), mesh.vertex_count());

        let texture = match &mesh_config.texture {
            Some(texture_path) => {
                let image = TextureImage::load(asset_path(texture_path))?;
                Some(binder::upload_texture(&mut device, &image)?)
            }
            None => None,
        };

        meshes.push(MeshResources { binding, texture });
    }

    let scene = SceneState::initialize(&config);
    let mut driver = FrameDriver::new(scene, program.id(), slots, meshes)?;

    let interval = Duration::from_millis(config.tick_ms);
    let mut timer = FixedTimer::new(interval, Instant::now());

    driver.render_frame(&mut device);
    app.window.gl_swap_window();

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                _ => {}
            }
        }

        let now = Instant::now();
        if timer.poll(now) {
            driver.tick(&mut device, interval);
            app.window.gl_swap_window();
        } else {
            std::thread::sleep(timer.remaining(now));
        }
    }

    log::info!("Exiting after {} frames", driver.frames());
    Ok(())
}
