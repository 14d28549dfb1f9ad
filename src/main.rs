use std::path::PathBuf;
use std::process::ExitCode;

use meshview::abs::{App, GlDevice, WindowOptions};
use meshview::config::ViewerConfig;
use meshview::controls::{ControlAction, ViewControls};
use meshview::logging::{LoggingConfig, init_logging};
use meshview::renderer::{FixedState, SceneRenderer};
use meshview::{Result, scene};

fn main() -> ExitCode {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    let config = match ViewerConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("meshview: {err}");
            return ExitCode::FAILURE;
        }
    };

    let logging = LoggingConfig {
        level: config.level_filter().unwrap_or(log::LevelFilter::Info),
        file: config.log_file.clone(),
    };
    if let Err(err) = init_logging(&logging) {
        eprintln!("meshview: {err}");
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_fatal() => {
            log::error!("Setup failed, nothing was rendered: {err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ViewerConfig) -> Result<()> {
    let mut app = App::new(&WindowOptions {
        title: config.title.clone(),
        width: config.width,
        height: config.height,
        fullscreen: config.fullscreen,
        vsync: config.vsync,
        gl_debug: config.gl_debug,
    })?;

    let objects = scene::build_objects(&config.objects)?;
    let shaders = config.shader_sources()?;

    let mut renderer = SceneRenderer::new(GlDevice::new(&app.gl));
    renderer.initialize(&shaders, objects, FixedState::new(config.clear_color))?;

    let (width, height) = app.drawable_size();
    renderer.on_resize(width, height)?;

    let mut controls = ViewControls::new(config);
    renderer.set_scale(controls.scale())?;

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                sdl2::event::Event::Quit { .. } => break 'running,
                sdl2::event::Event::Window {
                    win_event: sdl2::event::WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (width, height) = app.window.drawable_size();
                    renderer.on_resize(width, height)?;
                }
                sdl2::event::Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => match controls.handle_key(keycode) {
                    Some(ControlAction::Rotate(rotation)) => {
                        renderer.set_rotation(rotation.x, rotation.y, rotation.z)?
                    }
                    Some(ControlAction::Scale(scale)) => renderer.set_scale(scale)?,
                    Some(ControlAction::Reset) => {
                        let rotation = controls.rotation();
                        renderer.set_rotation(rotation.x, rotation.y, rotation.z)?;
                        renderer.set_scale(controls.scale())?;
                    }
                    Some(ControlAction::Quit) => break 'running,
                    None => {}
                },
                _ => {}
            }
        }

        renderer.render_frame()?;
        app.window.gl_swap_window();
    }

    renderer.shutdown()
}
