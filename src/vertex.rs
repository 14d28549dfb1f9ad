//! Interleaved position + color vertices.
//!
//! This module defines the [`Vertex`] record uploaded to the GPU and the functions that turn
//! raw mesh positions into vertex lists. Loaded meshes carry no colors, so their colors are
//! derived from the absolute position of each vertex.

use glam::Vec3;

/// A single vertex as laid out in a vertex buffer.
///
/// `position` is read by attribute slot 0 and `color` by slot 1. Both are three floats, so a
/// vertex occupies 24 bytes with the color at offset 12.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    /// Byte distance between two consecutive vertices.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
    /// Byte offset of the position attribute.
    pub const POSITION_OFFSET: usize = 0;
    /// Byte offset of the color attribute.
    pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 3]>();

    /// Creates a vertex with an explicit color.
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    /// Creates a vertex whose color is `clamp(abs(position), 0, 1)`.
    pub fn from_position(position: Vec3) -> Self {
        let color = position.abs().clamp(Vec3::ZERO, Vec3::ONE);
        Self::new(position, color)
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn color(&self) -> Vec3 {
        Vec3::from_array(self.color)
    }
}

/// Pairs positions with explicit colors, keeping input order.
///
/// The output has one vertex per pair; if the slices differ in length the surplus is dropped
/// and a warning is logged.
pub fn build_colored(positions: &[Vec3], colors: &[Vec3]) -> Vec<Vertex> {
    if positions.len() != colors.len() {
        log::warn!(
            "position/color count mismatch ({} positions, {} colors), truncating",
            positions.len(),
            colors.len()
        );
    }

    positions
        .iter()
        .zip(colors)
        .map(|(&position, &color)| Vertex::new(position, color))
        .collect()
}

/// Builds vertices for an uncolored mesh, deriving each color from its position.
pub fn build_from_positions(positions: &[Vec3]) -> Vec<Vertex> {
    positions.iter().copied().map(Vertex::from_position).collect()
}

/// Views a vertex slice as raw bytes for upload.
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    // Vertex is repr(C) and made only of f32s, so it has no padding.
    unsafe {
        std::slice::from_raw_parts(
            vertices.as_ptr() as *const u8,
            vertices.len() * Vertex::STRIDE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(Vertex::STRIDE, 24);
        assert_eq!(Vertex::COLOR_OFFSET, 12);
        let vertices = [Vertex::new(Vec3::ZERO, Vec3::ONE); 2];
        assert_eq!(as_bytes(&vertices).len(), 48);
    }

    #[test]
    fn test_derived_color_is_abs_clamped() {
        let vertex = Vertex::from_position(Vec3::new(0.6, -2.0, 0.3));
        assert_eq!(vertex.position(), Vec3::new(0.6, -2.0, 0.3));
        assert!(vertex.color().abs_diff_eq(Vec3::new(0.6, 1.0, 0.3), 1e-6));
    }

    #[test]
    fn test_colored_triangle_keeps_order() {
        let positions = [
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ];
        let colors = [Vec3::X, Vec3::Z, Vec3::Y];
        let vertices = build_colored(&positions, &colors);

        assert_eq!(vertices.len(), 3);
        for (i, vertex) in vertices.iter().enumerate() {
            assert_eq!(vertex.position(), positions[i]);
            assert_eq!(vertex.color(), colors[i]);
        }
    }

    #[test]
    fn test_mismatched_colors_truncate() {
        let positions = [Vec3::ZERO, Vec3::ONE];
        let vertices = build_colored(&positions, &[Vec3::X]);
        assert_eq!(vertices.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_from_positions(&[]).is_empty());
        assert!(build_colored(&[], &[]).is_empty());
    }
}
