//! Wavefront OBJ position reader.
//!
//! Only what the viewer draws is read: `v` records and `f` records. Faces are fan-triangulated
//! and flattened into a triangle list of positions, in face order. Texture coordinates,
//! normals, groups and materials are ignored.

use std::path::Path;

use glam::Vec3;

use crate::error::{Result, ViewerError};

/// Reads the triangle-list positions of an OBJ file.
pub fn load_positions(path: &Path) -> Result<Vec<Vec3>> {
    let source = std::fs::read_to_string(path).map_err(|e| ViewerError::MeshLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let positions = parse_positions(&source).map_err(|reason| ViewerError::MeshLoad {
        path: path.to_path_buf(),
        reason,
    })?;

    log::info!(
        "Loaded {} ({} triangles)",
        path.display(),
        positions.len() / 3
    );
    Ok(positions)
}

/// Parses OBJ text into triangle-list positions.
pub fn parse_positions(source: &str) -> Result<Vec<Vec3>, String> {
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();

    for (number, line) in source.lines().enumerate() {
        let line_number = number + 1;
        let line = match line.split_once('#') {
            Some((content, _comment)) => content,
            None => line,
        };
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coords = [0.0f32; 3];
                for coord in &mut coords {
                    let token = tokens
                        .next()
                        .ok_or_else(|| format!("line {line_number}: vertex needs 3 coordinates"))?;
                    *coord = token
                        .parse()
                        .map_err(|_| format!("line {line_number}: invalid coordinate '{token}'"))?;
                }
                vertices.push(Vec3::from_array(coords));
            }
            Some("f") => {
                let indices = tokens
                    .map(|token| resolve_index(token, vertices.len(), line_number))
                    .collect::<Result<Vec<_>, _>>()?;

                if indices.len() < 3 {
                    return Err(format!(
                        "line {line_number}: face needs at least 3 vertices, got {}",
                        indices.len()
                    ));
                }

                for i in 1..indices.len() - 1 {
                    triangles.push(vertices[indices[0]]);
                    triangles.push(vertices[indices[i]]);
                    triangles.push(vertices[indices[i + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(triangles)
}

/// Turns a face token (`7`, `7/2`, `7//3`, `-1/2/3`) into a zero-based vertex index.
fn resolve_index(token: &str, vertex_count: usize, line_number: usize) -> Result<usize, String> {
    let raw = token.split('/').next().unwrap_or_default();
    let index: i64 = raw
        .parse()
        .map_err(|_| format!("line {line_number}: invalid face index '{token}'"))?;

    let resolved = match index {
        0 => None,
        i if i > 0 => Some(i - 1),
        i => Some(vertex_count as i64 + i),
    };

    match resolved {
        Some(i) if i >= 0 && (i as usize) < vertex_count => Ok(i as usize),
        _ => Err(format!(
            "line {line_number}: face index {index} out of range ({vertex_count} vertices)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle() {
        let source = "\
# a single triangle
v -1.0 0.0 0.0
v 0.0 -1.0 0.0
v 1.0 0.0 0.0
f 1 2 3
";
        let positions = parse_positions(source).unwrap();
        assert_eq!(
            positions,
            vec![
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let source = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3//1 4
";
        let positions = parse_positions(source).unwrap();
        assert_eq!(positions.len(), 6);
        assert_eq!(positions[0], Vec3::ZERO);
        assert_eq!(positions[3], Vec3::ZERO);
        assert_eq!(positions[4], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(positions[5], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_negative_indices() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let positions = parse_positions(source).unwrap();
        assert_eq!(positions[2], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_errors() {
        assert!(parse_positions("v 0 0\n").is_err());
        assert!(parse_positions("v 0 zero 0\n").is_err());
        assert!(parse_positions("v 0 0 0\nv 1 0 0\nf 1 2\n").is_err());
        assert!(parse_positions("v 0 0 0\nf 1 2 3\n").is_err());
        assert!(parse_positions("v 0 0 0\nf 0 1 1\n").is_err());
    }

    #[test]
    fn test_empty_source() {
        assert!(parse_positions("").unwrap().is_empty());
        assert!(parse_positions("o knot\ng group\nusemtl none\n").unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = load_positions(Path::new("/nonexistent/knot.obj")).unwrap_err();
        assert!(matches!(err, ViewerError::MeshLoad { .. }));
        assert!(!err.is_fatal());
    }
}
