//! Built-in meshes and scene assembly.
//!
//! All meshes are triangle lists wound counter-clockwise when seen from outside, so they
//! survive back-face culling.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::config::{MeshKind, ObjectConfig};
use crate::error::Result;
use crate::obj;
use crate::renderer::RenderableDesc;
use crate::vertex::{self, Vertex};

const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const GREEN: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const BLUE: Vec3 = Vec3::new(0.0, 0.0, 1.0);
const YELLOW: Vec3 = Vec3::new(1.0, 1.0, 0.0);
const PINK: Vec3 = Vec3::new(1.0, 0.0, 1.0);

/// A flat triangle in the XY plane with red, blue and green corners.
pub fn triangle() -> Vec<Vertex> {
    // Winding flipped from the usual red, green, blue order so the face is counter-clockwise
    // and survives back-face culling.
    vertex::build_colored(
        &[
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ],
        &[RED, BLUE, GREEN],
    )
}

/// A square pyramid with its apex on -Z, 18 vertices.
pub fn pyramid() -> Vec<Vertex> {
    let base_tl = Vertex::new(Vec3::new(-1.0, 1.0, 1.0), RED);
    let base_bl = Vertex::new(Vec3::new(-1.0, -1.0, 1.0), BLUE);
    let base_br = Vertex::new(Vec3::new(1.0, -1.0, 1.0), YELLOW);
    let base_tr = Vertex::new(Vec3::new(1.0, 1.0, 1.0), GREEN);
    let apex = Vertex::new(Vec3::new(0.0, 0.0, -1.0), PINK);

    vec![
        apex, base_tl, base_tr, //
        apex, base_tr, base_br, //
        apex, base_bl, base_tl, //
        apex, base_br, base_bl, //
        base_bl, base_br, base_tl, //
        base_br, base_tr, base_tl,
    ]
}

/// Positions of a (p, q) torus knot swept by a circular tube.
///
/// `segments` samples along the curve and `sides` around the tube; values below 3 produce an
/// empty mesh.
pub fn torus_knot_positions(
    p: u32,
    q: u32,
    segments: usize,
    sides: usize,
    radius: f32,
    tube_radius: f32,
) -> Vec<Vec3> {
    if segments < 3 || sides < 3 {
        return Vec::new();
    }

    let curve = |t: f32| {
        let r = radius * (2.0 + (q as f32 * t).cos()) / 3.0;
        Vec3::new(
            r * (p as f32 * t).cos(),
            r * (p as f32 * t).sin(),
            radius * (q as f32 * t).sin() / 3.0,
        )
    };

    let rings: Vec<Vec<Vec3>> = (0..segments)
        .map(|i| {
            let t = i as f32 / segments as f32 * TAU;
            let next_t = (i as f32 + 0.5) / segments as f32 * TAU;
            let center = curve(t);
            let ahead = curve(next_t);

            let tangent = (ahead - center).normalize();
            let binormal = tangent.cross(ahead + center).normalize();
            let normal = binormal.cross(tangent);

            (0..sides)
                .map(|j| {
                    let angle = j as f32 / sides as f32 * TAU;
                    center + tube_radius * (angle.cos() * normal + angle.sin() * binormal)
                })
                .collect()
        })
        .collect();

    let mut positions = Vec::with_capacity(segments * sides * 6);
    for i in 0..segments {
        let ring = &rings[i];
        let next_ring = &rings[(i + 1) % segments];
        for j in 0..sides {
            let k = (j + 1) % sides;
            let (a, b, c, d) = (ring[j], ring[k], next_ring[j], next_ring[k]);
            positions.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    positions
}

/// The generated knot used when no mesh file is configured.
pub fn knot() -> Vec<Vertex> {
    vertex::build_from_positions(&torus_knot_positions(2, 3, 128, 12, 1.5, 0.2))
}

/// Builds the vertex lists for every configured object, in order.
pub fn build_objects(objects: &[ObjectConfig]) -> Result<Vec<RenderableDesc>> {
    objects
        .iter()
        .enumerate()
        .map(|(index, object)| -> Result<RenderableDesc> {
            let (name, vertices) = match object.kind {
                MeshKind::Triangle => ("triangle", triangle()),
                MeshKind::Pyramid => ("pyramid", pyramid()),
                MeshKind::Knot => match &object.path {
                    Some(path) => (
                        "knot",
                        vertex::build_from_positions(&obj::load_positions(path)?),
                    ),
                    None => ("knot", knot()),
                },
            };
            Ok(RenderableDesc::new(
                format!("{name}#{index}"),
                vertices,
                object.placement(),
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Signed volume of a closed triangle list; positive when faces point outwards.
    fn signed_volume(positions: &[Vec3]) -> f32 {
        positions
            .chunks_exact(3)
            .map(|t| t[0].dot(t[1].cross(t[2])) / 6.0)
            .sum()
    }

    #[test]
    fn test_triangle_faces_viewer() {
        let vertices = triangle();
        assert_eq!(vertices.len(), 3);
        let [a, b, c] = [vertices[0].position(), vertices[1].position(), vertices[2].position()];
        assert!((b - a).cross(c - a).z > 0.0);
    }

    #[test]
    fn test_pyramid_is_closed_and_outward() {
        let positions: Vec<Vec3> = pyramid().iter().map(Vertex::position).collect();
        assert_eq!(positions.len(), 18);
        assert!(signed_volume(&positions) > 0.0);
    }

    #[test]
    fn test_knot_is_outward_and_colored() {
        let positions = torus_knot_positions(2, 3, 64, 8, 1.5, 0.2);
        assert_eq!(positions.len(), 64 * 8 * 6);
        assert!(signed_volume(&positions) > 0.0);

        for vertex in knot() {
            let color = vertex.color();
            assert!(color.cmpge(Vec3::ZERO).all() && color.cmple(Vec3::ONE).all());
        }
    }

    #[test]
    fn test_degenerate_knot_is_empty() {
        assert!(torus_knot_positions(2, 3, 2, 8, 1.0, 0.1).is_empty());
    }

    #[test]
    fn test_build_objects_keeps_order() {
        let objects = vec![
            ObjectConfig::new(MeshKind::Knot, [2.0, 0.0, -6.0]),
            ObjectConfig::new(MeshKind::Triangle, [0.0, 0.0, -4.0]),
        ];
        let descs = build_objects(&objects).unwrap();

        assert_eq!(descs[0].name, "knot#0");
        assert_eq!(descs[1].name, "triangle#1");
        assert_eq!(descs[1].vertices.len(), 3);
        assert_eq!(descs[0].placement, Vec3::new(2.0, 0.0, -6.0));
    }

    #[test]
    fn test_missing_knot_file_is_reported() {
        let mut knot = ObjectConfig::new(MeshKind::Knot, [0.0; 3]);
        knot.path = Some("/nonexistent/knot.obj".into());
        assert!(build_objects(&[knot]).is_err());
    }
}
