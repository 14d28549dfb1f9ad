//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! Uniform locations and attribute slots are resolved once when the program is linked, so a
//! shader that does not match the [`UniformSlot`] and [`AttributeSlot`] tables is rejected up
//! front instead of silently drawing nothing.

use std::sync::Arc;

use glam::Mat4;
use glow::HasContext;

use crate::error::{Result, ShaderStage, ViewerError};
use crate::renderer::{AttributeSlot, UniformSlot};

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<glow::Context>, stage: ShaderStage, source: &str) -> Result<Self> {
        let shader_type = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };

        unsafe {
            let shader = gl
                .create_shader(shader_type)
                .map_err(|log| ViewerError::ShaderCompile { stage, log })?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(ViewerError::ShaderCompile { stage, log });
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Represents a value that can be written to a uniform location.
pub trait Uniform {
    /// Sets the value of the uniform at the given location of the bound program.
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(location), false, &self.to_cols_array());
        }
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// Represents an OpenGL shader program composed of a vertex and a fragment shader.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
    uniforms: Vec<glow::UniformLocation>,
}

impl ShaderProgram {
    /// Links a new shader program from the given shaders.
    ///
    /// Every [`AttributeSlot`] is bound to its fixed location before linking; afterwards every
    /// attribute and [`UniformSlot`] must be active in the program.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self> {
        unsafe {
            let program = gl.create_program().map_err(ViewerError::ShaderLink)?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }
            for slot in AttributeSlot::ALL {
                gl.bind_attrib_location(program, slot.location(), slot.name());
            }

            gl.link_program(program);

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(ViewerError::ShaderLink(log));
            }

            match Self::resolve_interface(gl, program) {
                Ok(uniforms) => Ok(Self {
                    gl: Arc::clone(gl),
                    id: program,
                    uniforms,
                }),
                Err(err) => {
                    gl.delete_program(program);
                    Err(err)
                }
            }
        }
    }

    /// Compiles both stages and links them.
    pub fn from_sources(gl: &Arc<glow::Context>, vertex: &str, fragment: &str) -> Result<Self> {
        let vert = Shader::new(gl, ShaderStage::Vertex, vertex)?;
        let frag = Shader::new(gl, ShaderStage::Fragment, fragment)?;
        Self::new(gl, &[&vert, &frag])
    }

    fn resolve_interface(
        gl: &glow::Context,
        program: glow::Program,
    ) -> Result<Vec<glow::UniformLocation>> {
        for slot in AttributeSlot::ALL {
            match unsafe { gl.get_attrib_location(program, slot.name()) } {
                Some(location) if location == slot.location() => {}
                _ => return Err(ViewerError::MissingAttribute(slot.name())),
            }
        }

        UniformSlot::ALL
            .iter()
            .map(|slot| {
                unsafe { gl.get_uniform_location(program, slot.name()) }
                    .ok_or(ViewerError::MissingUniform(slot.name()))
            })
            .collect()
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Sets a uniform variable in the shader program. The program must be bound.
    pub fn set_uniform<T: Uniform>(&self, slot: UniformSlot, value: T) {
        value.set_uniform(&self.gl, &self.uniforms[slot.index()]);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}
