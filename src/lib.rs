//! A small OpenGL viewer that draws a few colored meshes with a shared rotation and scale.
//!
//! [`renderer::SceneRenderer`] holds the scene logic and talks to the GPU through the
//! [`renderer::RenderDevice`] trait. [`abs`] contains the OpenGL implementation of that trait
//! together with the SDL2 window.

pub mod abs;
pub mod config;
pub mod controls;
pub mod error;
pub mod logging;
pub mod obj;
pub mod projection;
pub mod renderer;
pub mod scene;
pub mod transform;
pub mod vertex;

pub use error::{Result, ViewerError};
