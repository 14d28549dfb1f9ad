//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! and OpenGL context necessary for creating a windowed application.

use std::sync::Arc;

use glow::HasContext;

use crate::error::{Result, ViewerError};

/// Window and context options.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
    /// Requests a debug context and forwards driver messages to the logger.
    pub gl_debug: bool,
}

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
    /// Creates a new [`App`] instance from the given options.
    /// The width and height options are ignored if `fullscreen` is set to `true`.
    pub fn new(options: &WindowOptions) -> Result<Self> {
        let sdl = sdl2::init().map_err(ViewerError::Window)?;
        let video_subsystem = sdl.video().map_err(ViewerError::Window)?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);
        if options.gl_debug {
            gl_attr.set_context_flags().debug().set();
        }

        let (width, height) = if options.fullscreen {
            let display_mode = video_subsystem
                .current_display_mode(0)
                .map_err(ViewerError::Window)?;
            (display_mode.w as u32, display_mode.h as u32)
        } else {
            (options.width, options.height)
        };
        let mut window = video_subsystem
            .window(&options.title, width, height)
            .opengl()
            .resizable()
            .build()
            .map_err(|e| ViewerError::Window(e.to_string()))?;
        window
            .set_fullscreen(if options.fullscreen {
                sdl2::video::FullscreenType::Desktop
            } else {
                sdl2::video::FullscreenType::Off
            })
            .map_err(ViewerError::Window)?;
        let gl_context = window.gl_create_context().map_err(ViewerError::Window)?;
        window
            .gl_make_current(&gl_context)
            .map_err(ViewerError::Window)?;

        let swap_interval = if options.vsync {
            sdl2::video::SwapInterval::VSync
        } else {
            sdl2::video::SwapInterval::Immediate
        };
        if let Err(err) = video_subsystem.gl_set_swap_interval(swap_interval) {
            log::warn!("Could not set swap interval: {err}");
        }

        let mut gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };

        let version = unsafe { gl.get_parameter_string(glow::VERSION) };
        log::info!("Using OpenGL {version}");

        if options.gl_debug {
            attach_debug_logger(&mut gl);
        }

        let event_pump = sdl.event_pump().map_err(ViewerError::Window)?;
        let gl = Arc::new(gl);

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl,
            event_pump,
        })
    }

    /// Size of the drawable area in pixels.
    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }
}

/// Forwards KHR_debug messages to the logger, mapped by severity.
fn attach_debug_logger(gl: &mut glow::Context) {
    if !gl.supports_debug() {
        log::warn!("OpenGL debug output is not supported by this context");
        return;
    }

    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(|source, kind, id, severity, message| {
            let level = match severity {
                glow::DEBUG_SEVERITY_HIGH => log::Level::Error,
                glow::DEBUG_SEVERITY_MEDIUM => log::Level::Warn,
                glow::DEBUG_SEVERITY_LOW => log::Level::Info,
                _ => log::Level::Debug,
            };
            log::log!(
                target: "meshview::gl",
                level,
                "[source {source:#x}, type {kind:#x}, id {id}] {message}"
            );
        });
    }
    log::info!("OpenGL debug logging initialized");
}
