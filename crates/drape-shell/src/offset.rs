//! Fabric offset: inflate the garment region outward along vertex normals.
//!
//! Each vertex is displaced by an ease value blended across the torso
//! height, clamped into a clearance window, and shaped by a boxiness rule
//! for loose garments. A garment nominally smaller than the body is assumed
//! to stretch to a minimal-clearance fit rather than penetrate; that clamp
//! is intentional (see the crate docs on the tight/loose asymmetry).

use tracing::debug;

use drape_core::{BodyFrame, Ease, Mesh, OperationTimer, TorsoBand};

/// Per-region ease in meters, the unit the mesh lives in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EaseProfile {
    pub chest_m: f64,
    pub waist_m: f64,
    pub shoulder_m: f64,
}

impl EaseProfile {
    /// Convert centimeter ease values to meters.
    pub fn from_ease(ease: &Ease) -> Self {
        Self {
            chest_m: ease.chest_cm / 100.0,
            waist_m: ease.waist_cm / 100.0,
            shoulder_m: ease.shoulder_cm / 100.0,
        }
    }
}

/// Clearance and shaping parameters for the offset calculator.
#[derive(Debug, Clone, Copy)]
pub struct OffsetParams {
    /// Minimum garment-to-body clearance in meters.
    pub min_clearance: f64,
    /// Maximum garment-to-body clearance in meters.
    pub max_clearance: f64,
    /// Offsets above this are in the loose regime and get boxiness shaping.
    pub loose_threshold: f64,
}

impl Default for OffsetParams {
    fn default() -> Self {
        Self {
            min_clearance: 0.003,
            max_clearance: 0.05,
            loose_threshold: 0.01,
        }
    }
}

// Blend breakpoints over the torso-local height u: waist at the hem,
// chest at mid-torso, shoulder at the top.
const CHEST_U: f64 = 0.5;
const SHOULDER_U: f64 = 0.8;

/// Blended ease (meters) at torso-local height `u` (0 = hem, 1 = shoulder).
pub fn blended_offset(u: f64, ease: &EaseProfile) -> f64 {
    if u > SHOULDER_U {
        ease.shoulder_m
    } else if u > CHEST_U {
        let s = (u - CHEST_U) / (SHOULDER_U - CHEST_U);
        ease.chest_m + s * (ease.shoulder_m - ease.chest_m)
    } else {
        let s = u / CHEST_U;
        ease.waist_m + s * (ease.chest_m - ease.waist_m)
    }
}

/// Clamp a blended offset into the clearance window.
///
/// Negative offsets collapse to the minimum clearance: the garment is
/// assumed to stretch over the body, never to penetrate it.
fn clamp_offset(offset: f64, params: &OffsetParams) -> f64 {
    if offset < 0.0 {
        params.min_clearance
    } else {
        offset.clamp(params.min_clearance, params.max_clearance)
    }
}

/// Inflate the garment mesh outward along its vertex normals.
///
/// `band` is the torso band the region was selected with; it defines the
/// torso-local height used for blending. Normals are computed if missing
/// and recomputed after displacement so the next pass sees the inflated
/// surface.
pub fn apply_fabric_offset(
    garment: &mut Mesh,
    frame: &BodyFrame,
    band: &TorsoBand,
    ease: &EaseProfile,
    params: &OffsetParams,
) {
    let _timer = OperationTimer::with_context(
        "fabric_offset",
        garment.vertex_count(),
        garment.face_count(),
    );

    if !garment.has_normals() {
        garment.compute_normals();
    }

    let bottom_y = frame.min_y + band.bottom_t * frame.height;
    let top_y = frame.min_y + band.top_t * frame.height;
    let band_height = top_y - bottom_y;

    let torso_half_width = frame.width * 0.5;
    let mut boxiness_shaped = 0usize;

    for vertex in &mut garment.vertices {
        let Some(normal) = vertex.normal else { continue };

        let u = (vertex.position.y - bottom_y) / band_height;
        let blended = blended_offset(u, ease);
        let mut offset = clamp_offset(blended, params);

        if offset > params.loose_threshold {
            // Loose garments hang straighter: flatten toward the silhouette
            // by reducing inflation near the body's central axis.
            let radial = (frame.distance_from_axis(&vertex.position) / torso_half_width).min(1.0);
            offset = (offset * (0.6 + 0.4 * radial)).max(params.min_clearance);
            boxiness_shaped += 1;
        }

        vertex.position += normal * offset;
    }

    garment.compute_normals();

    debug!(
        vertices = garment.vertex_count(),
        boxiness_shaped,
        "Applied fabric offset"
    );
}
