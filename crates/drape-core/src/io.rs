//! Wavefront OBJ loading and saving.
//!
//! The body-model service delivers meshes as binary 3D assets; this module
//! covers the OBJ interchange path used by the CLI and tests. Positions and
//! normals are read, faces are fan-triangulated, and vertex order is
//! preserved on save.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use tracing::info;

use crate::error::{FitError, FitResult};
use crate::types::{Mesh, Vertex};

/// Load a mesh from a file, dispatching on extension. Only `.obj` is
/// supported; anything else is an `UnsupportedFormat` error.
pub fn load_mesh(path: &Path) -> FitResult<Mesh> {
    match extension_of(path).as_deref() {
        Some("obj") => load_obj(path),
        other => Err(FitError::UnsupportedFormat {
            extension: other.map(str::to_string),
        }),
    }
}

/// Save a mesh to a file, dispatching on extension.
pub fn save_mesh(mesh: &Mesh, path: &Path) -> FitResult<()> {
    match extension_of(path).as_deref() {
        Some("obj") => save_obj(mesh, path),
        other => Err(FitError::UnsupportedFormat {
            extension: other.map(str::to_string),
        }),
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Load a Wavefront OBJ mesh.
///
/// Handles `v`, `vn`, and `f` records; `f` entries may be `v`, `v/vt`,
/// `v//vn`, or `v/vt/vn`. Polygons are fan-triangulated. Normal indices
/// are resolved per vertex; the last one seen for a vertex wins.
pub fn load_obj(path: &Path) -> FitResult<Mesh> {
    let content =
        fs::read_to_string(path).map_err(|e| FitError::io_read(path.to_path_buf(), e))?;

    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut normals: Vec<Vector3<f64>> = Vec::new();
    let mut vertex_normals: Vec<Option<u32>> = Vec::new();
    let mut faces: Vec<[u32; 3]> = Vec::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        let tag = parts.next().unwrap_or("");

        match tag {
            "v" => {
                let p = parse_triple(&mut parts).ok_or_else(|| {
                    FitError::parse_error(path, format!("bad vertex at line {}", line_no + 1))
                })?;
                positions.push(Point3::new(p[0], p[1], p[2]));
                vertex_normals.push(None);
            }
            "vn" => {
                let n = parse_triple(&mut parts).ok_or_else(|| {
                    FitError::parse_error(path, format!("bad normal at line {}", line_no + 1))
                })?;
                normals.push(Vector3::new(n[0], n[1], n[2]));
            }
            "f" => {
                let mut indices: Vec<(u32, Option<u32>)> = Vec::new();
                for entry in parts {
                    let (vi, ni) = parse_face_entry(entry, positions.len(), normals.len())
                        .ok_or_else(|| {
                            FitError::parse_error(
                                path,
                                format!("bad face entry {:?} at line {}", entry, line_no + 1),
                            )
                        })?;
                    indices.push((vi, ni));
                }
                if indices.len() < 3 {
                    return Err(FitError::parse_error(
                        path,
                        format!("face with fewer than 3 vertices at line {}", line_no + 1),
                    ));
                }
                for (vi, ni) in &indices {
                    if let Some(ni) = ni {
                        vertex_normals[*vi as usize] = Some(*ni);
                    }
                }
                // Fan triangulation
                for i in 1..indices.len() - 1 {
                    faces.push([indices[0].0, indices[i].0, indices[i + 1].0]);
                }
            }
            // Groups, materials, and texture coordinates are ignored
            _ => {}
        }
    }

    let mut mesh = Mesh::with_capacity(positions.len(), faces.len());
    for (i, position) in positions.into_iter().enumerate() {
        let normal = vertex_normals[i].map(|ni| normals[ni as usize]);
        mesh.vertices.push(Vertex { position, normal });
    }
    mesh.faces = faces;

    info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Loaded OBJ mesh"
    );

    Ok(mesh)
}

fn parse_triple<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Option<[f64; 3]> {
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let z = parts.next()?.parse().ok()?;
    Some([x, y, z])
}

/// Parse one face entry into 0-based (vertex, normal) indices.
fn parse_face_entry(
    entry: &str,
    vertex_count: usize,
    normal_count: usize,
) -> Option<(u32, Option<u32>)> {
    let mut fields = entry.split('/');

    let vi: i64 = fields.next()?.parse().ok()?;
    let vi = resolve_index(vi, vertex_count)?;

    let _vt = fields.next(); // texture coordinate, ignored
    let ni = match fields.next() {
        Some("") | None => None,
        Some(raw) => {
            let ni: i64 = raw.parse().ok()?;
            Some(resolve_index(ni, normal_count)?)
        }
    };

    Some((vi, ni))
}

/// OBJ indices are 1-based; negative indices count from the end.
fn resolve_index(raw: i64, count: usize) -> Option<u32> {
    let idx = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        count as i64 + raw
    } else {
        return None;
    };
    if (0..count as i64).contains(&idx) {
        Some(idx as u32)
    } else {
        None
    }
}

/// Save a mesh as Wavefront OBJ, preserving vertex order.
pub fn save_obj(mesh: &Mesh, path: &Path) -> FitResult<()> {
    let mut out = String::with_capacity(mesh.vertex_count() * 32);
    out.push_str("# drape garment mesh\n");

    for v in &mesh.vertices {
        out.push_str(&format!(
            "v {} {} {}\n",
            v.position.x, v.position.y, v.position.z
        ));
    }

    let has_normals = mesh.has_normals();
    if has_normals {
        for v in &mesh.vertices {
            let n = v.normal.expect("has_normals checked");
            out.push_str(&format!("vn {} {} {}\n", n.x, n.y, n.z));
        }
    }

    for face in &mesh.faces {
        if has_normals {
            out.push_str(&format!(
                "f {0}//{0} {1}//{1} {2}//{2}\n",
                face[0] + 1,
                face[1] + 1,
                face[2] + 1
            ));
        } else {
            out.push_str(&format!(
                "f {} {} {}\n",
                face[0] + 1,
                face[1] + 1,
                face[2] + 1
            ));
        }
    }

    let mut file =
        fs::File::create(path).map_err(|e| FitError::io_write(path.to_path_buf(), e))?;
    file.write_all(out.as_bytes())
        .map_err(|e| FitError::io_write(path.to_path_buf(), e))?;

    info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "Saved OBJ mesh"
    );

    Ok(())
}
