//! OpenGL implementation of [`RenderDevice`].

use std::sync::Arc;

use glam::Mat4;
use glow::HasContext;

use crate::abs::mesh::draw_count;
use crate::abs::{ShaderProgram, VertexBuffer};
use crate::error::Result;
use crate::renderer::{DepthFunc, FixedState, RenderDevice, ShaderSources, UniformSlot};
use crate::vertex::Vertex;

/// Issues renderer commands on an OpenGL context.
pub struct GlDevice {
    gl: Arc<glow::Context>,
}

impl GlDevice {
    pub fn new(gl: &Arc<glow::Context>) -> Self {
        Self { gl: Arc::clone(gl) }
    }
}

impl RenderDevice for GlDevice {
    type Buffer = VertexBuffer;
    type Program = ShaderProgram;

    fn create_program(&mut self, sources: &ShaderSources) -> Result<ShaderProgram> {
        ShaderProgram::from_sources(&self.gl, &sources.vertex, &sources.fragment)
    }

    fn create_vertex_buffer(&mut self, vertices: &[Vertex]) -> Result<VertexBuffer> {
        VertexBuffer::new(&self.gl, vertices)
    }

    fn apply_fixed_state(&mut self, state: &FixedState) {
        unsafe {
            if state.depth_test {
                self.gl.enable(glow::DEPTH_TEST);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }

            if state.cull_back_faces {
                self.gl.enable(glow::CULL_FACE);
                self.gl.cull_face(glow::BACK);
                self.gl.front_face(glow::CCW);
            } else {
                self.gl.disable(glow::CULL_FACE);
            }

            self.gl.depth_func(match state.depth_func {
                DepthFunc::Less => glow::LESS,
                DepthFunc::LessEqual => glow::LEQUAL,
            });

            let [r, g, b, a] = state.clear_color;
            self.gl.clear_color(r, g, b, a);
        }
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
    }

    fn clear(&mut self) {
        unsafe {
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn bind_program(&mut self, program: &ShaderProgram) {
        program.use_program();
    }

    fn set_uniform(&mut self, program: &ShaderProgram, slot: UniformSlot, value: &Mat4) {
        program.set_uniform(slot, value);
    }

    fn bind_vertex_buffer(&mut self, buffer: &VertexBuffer) {
        buffer.bind();
    }

    fn draw_triangles(&mut self, vertex_count: usize) {
        match draw_count(vertex_count) {
            Ok(count) => unsafe {
                self.gl.draw_arrays(glow::TRIANGLES, 0, count);
            },
            Err(err) => log::error!("Skipping draw: {err}"),
        }
    }

    fn unbind_program(&mut self) {
        unsafe {
            self.gl.bind_vertex_array(None);
            self.gl.use_program(None);
        }
    }

    fn release_vertex_buffer(&mut self, buffer: VertexBuffer) {
        log::trace!("Releasing buffer with {} vertices", buffer.vertex_count());
        drop(buffer);
    }

    fn release_program(&mut self, program: ShaderProgram) {
        drop(program);
    }
}
