//! Torso region selection on a body mesh.
//!
//! Classifies body vertices into the garment's coverage band, cuts out the
//! neck opening and the area below the sleeve line, and compacts the kept
//! triangles into a fresh submesh. The input body mesh is never mutated;
//! every call produces an independent allocation.

use nalgebra::Point3;
use tracing::debug;

use crate::error::{FitError, FitResult};
use crate::types::{Mesh, Vertex};

/// Bounding-box-derived frame of the body mesh.
///
/// Every pipeline stage divides by the height and width stored here, so
/// constructing the frame is the single degenerate-geometry checkpoint.
#[derive(Debug, Clone, Copy)]
pub struct BodyFrame {
    /// Lowest body point (ground contact) in meters.
    pub min_y: f64,
    /// Vertical extent in meters.
    pub height: f64,
    /// Horizontal x extent in meters.
    pub width: f64,
    /// X of the vertical body axis.
    pub axis_x: f64,
    /// Z of the vertical body axis.
    pub axis_z: f64,
}

/// Extents below this are treated as degenerate.
const MIN_EXTENT: f64 = 1e-6;

/// Height fraction of the shoulder line.
pub const SHOULDER_FRACTION: f64 = 0.82;

impl BodyFrame {
    /// Derive the frame from a body mesh's bounding box.
    ///
    /// Fails with `DegenerateGeometry` when the vertical or horizontal
    /// extent is zero or near-zero, or not finite. This guarantees no
    /// NaN/Infinity can propagate into later stages.
    pub fn from_mesh(mesh: &Mesh) -> FitResult<Self> {
        let (min, max) = mesh
            .bounds()
            .ok_or_else(|| FitError::invalid_mesh("body_frame", "mesh has no vertices"))?;

        let height = max.y - min.y;
        let width = max.x - min.x;

        if !height.is_finite() || height < MIN_EXTENT {
            return Err(FitError::degenerate_geometry("height", height));
        }
        if !width.is_finite() || width < MIN_EXTENT {
            return Err(FitError::degenerate_geometry("width", width));
        }

        Ok(Self {
            min_y: min.y,
            height,
            width,
            axis_x: (min.x + max.x) * 0.5,
            axis_z: (min.z + max.z) * 0.5,
        })
    }

    /// Normalized height of a world y coordinate: 0 at the feet, 1 at the
    /// top of the head.
    #[inline]
    pub fn normalized_height(&self, y: f64) -> f64 {
        (y - self.min_y) / self.height
    }

    /// World y of the shoulder line.
    #[inline]
    pub fn shoulder_y(&self) -> f64 {
        self.min_y + SHOULDER_FRACTION * self.height
    }

    /// Horizontal distance from the vertical body axis.
    #[inline]
    pub fn distance_from_axis(&self, p: &Point3<f64>) -> f64 {
        let dx = p.x - self.axis_x;
        let dz = p.z - self.axis_z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Radial position in [0, 1]: 0 on the axis, 1 at (or beyond) the
    /// body's half width.
    #[inline]
    pub fn radial_position(&self, p: &Point3<f64>) -> f64 {
        (self.distance_from_axis(p) / (self.width * 0.5)).min(1.0)
    }
}

/// Vertical torso band covered by a garment, as body height fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorsoBand {
    pub bottom_t: f64,
    pub top_t: f64,
}

/// Garment silhouettes with preset torso bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GarmentKind {
    /// Standard tee: hem at mid-hip.
    #[default]
    TShirt,
    /// Longer top: hem below the hip.
    LongTop,
    /// Jacket: slightly higher collar coverage.
    Jacket,
}

impl GarmentKind {
    /// The torso band this garment covers.
    pub fn band(&self) -> TorsoBand {
        match self {
            GarmentKind::TShirt => TorsoBand {
                bottom_t: 0.50,
                top_t: 0.85,
            },
            GarmentKind::LongTop => TorsoBand {
                bottom_t: 0.42,
                top_t: 0.85,
            },
            GarmentKind::Jacket => TorsoBand {
                bottom_t: 0.46,
                top_t: 0.88,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GarmentKind::TShirt => "t-shirt",
            GarmentKind::LongTop => "long top",
            GarmentKind::Jacket => "jacket",
        }
    }
}

/// Parameters for torso region selection.
#[derive(Debug, Clone, Copy)]
pub struct RegionParams {
    pub band: TorsoBand,
    /// Garment sleeve length in meters, for the sleeve cutoff. None keeps
    /// all arm vertices inside the band.
    pub sleeve_length: Option<f64>,
}

impl Default for RegionParams {
    fn default() -> Self {
        Self {
            band: GarmentKind::TShirt.band(),
            sleeve_length: None,
        }
    }
}

impl RegionParams {
    /// Params for a garment kind with an optional sleeve length (meters).
    pub fn for_garment(kind: GarmentKind, sleeve_length: Option<f64>) -> Self {
        Self {
            band: kind.band(),
            sleeve_length,
        }
    }
}

// Neck cut-out: above this normalized height and within this horizontal
// radius of the body axis.
const NECK_T: f64 = 0.92;
const NECK_RADIUS: f64 = 0.08;

// Sleeve cutoff band and the x fraction beyond which a vertex counts as arm.
const SLEEVE_BAND_BOTTOM_T: f64 = 0.70;
const SLEEVE_BAND_TOP_T: f64 = 0.90;
const ARM_X_FRACTION: f64 = 0.15;

/// A compacted submesh selected from the body, with the mapping back to
/// body vertex indices.
#[derive(Debug, Clone)]
pub struct GarmentRegion {
    /// Freshly allocated submesh with dense 0-based indices.
    pub mesh: Mesh,
    /// For each submesh vertex, the body vertex it came from.
    pub source_vertices: Vec<u32>,
}

/// Whether a body vertex belongs to the garment's torso region.
fn keep_vertex(p: &Point3<f64>, frame: &BodyFrame, params: &RegionParams) -> bool {
    let t = frame.normalized_height(p.y);

    if t < params.band.bottom_t || t > params.band.top_t {
        return false;
    }

    // Neck cut-out
    if t >= NECK_T && frame.distance_from_axis(p) < NECK_RADIUS {
        return false;
    }

    // Sleeve cutoff: arm vertices below the sleeve end
    if let Some(sleeve_length) = params.sleeve_length {
        let on_arm = (p.x - frame.axis_x).abs() > ARM_X_FRACTION * frame.width;
        if (SLEEVE_BAND_BOTTOM_T..=SLEEVE_BAND_TOP_T).contains(&t)
            && on_arm
            && p.y < frame.shoulder_y() - sleeve_length
        {
            return false;
        }
    }

    true
}

/// Select the torso region of the body mesh.
///
/// A triangle survives only if all three of its vertices are kept. Kept
/// vertex indices are compacted into a dense range; the old-to-new mapping
/// is retained in the returned `GarmentRegion` for the duration of the
/// call. Fails with `InvalidMesh` when the body mesh has no triangle index
/// and with `EmptyRegion` when nothing is kept.
pub fn select_torso_region(
    body: &Mesh,
    frame: &BodyFrame,
    params: &RegionParams,
) -> FitResult<GarmentRegion> {
    if body.faces.is_empty() {
        return Err(FitError::invalid_mesh(
            "region_selection",
            "body mesh has no triangle index",
        ));
    }

    let kept: Vec<bool> = body
        .vertices
        .iter()
        .map(|v| keep_vertex(&v.position, frame, params))
        .collect();

    // Compact kept vertices into dense indices
    let mut old_to_new: Vec<Option<u32>> = vec![None; body.vertices.len()];
    let mut mesh = Mesh::new();
    let mut source_vertices = Vec::new();

    for (face_index, face) in body.faces.iter().enumerate() {
        for &v in face {
            if v as usize >= body.vertices.len() {
                return Err(FitError::invalid_vertex_index(
                    face_index,
                    v,
                    body.vertices.len(),
                ));
            }
        }

        if !face.iter().all(|&v| kept[v as usize]) {
            continue;
        }

        let mut new_face = [0u32; 3];
        for (slot, &old) in new_face.iter_mut().zip(face.iter()) {
            let new = match old_to_new[old as usize] {
                Some(idx) => idx,
                None => {
                    let idx = mesh.vertices.len() as u32;
                    mesh.vertices.push(Vertex {
                        position: body.vertices[old as usize].position,
                        normal: body.vertices[old as usize].normal,
                    });
                    old_to_new[old as usize] = Some(idx);
                    source_vertices.push(old);
                    idx
                }
            };
            *slot = new;
        }
        mesh.faces.push(new_face);
    }

    if mesh.is_empty() {
        return Err(FitError::empty_region(format!(
            "torso band [{:.2}, {:.2}] kept no triangles",
            params.band.bottom_t, params.band.top_t
        )));
    }

    debug!(
        kept_vertices = mesh.vertex_count(),
        kept_faces = mesh.face_count(),
        body_vertices = body.vertex_count(),
        "Selected torso region"
    );

    Ok(GarmentRegion {
        mesh,
        source_vertices,
    })
}
