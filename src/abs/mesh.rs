//! Mesh management module.
//!
//! This module defines the [`VertexBuffer`] struct holding one uploaded vertex list on the GPU
//! side, together with the vertex array object describing its layout.

use std::sync::Arc;

use glow::HasContext;

use crate::error::{Result, ViewerError};
use crate::renderer::AttributeSlot;
use crate::vertex::{self, Vertex};

/// Sets up the vertex attribute pointers for [`Vertex`] on the bound vertex array.
fn vertex_attribs(gl: &glow::Context) {
    let stride = Vertex::STRIDE as i32;

    for slot in AttributeSlot::ALL {
        unsafe {
            gl.enable_vertex_attrib_array(slot.location());
            gl.vertex_attrib_pointer_f32(
                slot.location(),
                slot.components(),
                glow::FLOAT,
                false,
                stride,
                slot.offset() as i32,
            );
        }
    }
}

/// Converts a vertex count to the signed count `glDrawArrays` takes.
pub(crate) fn draw_count(vertex_count: usize) -> Result<i32> {
    i32::try_from(vertex_count).map_err(|_| {
        ViewerError::BufferAllocation(format!(
            "{vertex_count} vertices exceed the drawable maximum of {}",
            i32::MAX
        ))
    })
}

/// Represents a non-indexed vertex list stored on the GPU side.
pub struct VertexBuffer {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: usize,
}

impl VertexBuffer {
    /// Uploads the given vertices into a new buffer.
    pub fn new(gl: &Arc<glow::Context>, vertices: &[Vertex]) -> Result<Self> {
        draw_count(vertices.len())?;

        unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(ViewerError::BufferAllocation)?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(err) => {
                    gl.delete_vertex_array(vao);
                    return Err(ViewerError::BufferAllocation(err));
                }
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                vertex::as_bytes(vertices),
                glow::STATIC_DRAW,
            );

            vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            if gl.get_error() == glow::OUT_OF_MEMORY {
                gl.delete_buffer(vbo);
                gl.delete_vertex_array(vao);
                return Err(ViewerError::BufferAllocation(format!(
                    "out of memory uploading {} vertices",
                    vertices.len()
                )));
            }

            Ok(Self {
                gl: Arc::clone(gl),
                vao,
                vbo,
                vertex_count: vertices.len(),
            })
        }
    }

    /// Binds the vertex array for drawing.
    pub fn bind(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
        }
    }

    // Returns the amount of vertices stored in the buffer
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_count_rejects_oversized_lists() {
        assert_eq!(draw_count(0).unwrap(), 0);
        assert_eq!(draw_count(18).unwrap(), 18);
        assert_eq!(draw_count(i32::MAX as usize).unwrap(), i32::MAX);
        assert!(matches!(
            draw_count(i32::MAX as usize + 1),
            Err(ViewerError::BufferAllocation(_))
        ));
    }
}
