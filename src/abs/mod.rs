//! This module contains the OpenGL side of the viewer,
//! including application setup, shader management, vertex buffers and the GL render device.

pub mod app;
pub mod device;
pub mod mesh;
pub mod shader;

pub use app::*;
pub use device::*;
pub use mesh::*;
pub use shader::*;
