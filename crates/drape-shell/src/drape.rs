//! Draping effects: stretch zones, fabric weight, seam tension, wrinkles.
//!
//! Four displacement passes applied in order after the fabric offset.
//! Every pass recomputes vertex normals before the next so each sees the
//! surface left by its predecessor. All passes are deterministic; the
//! wrinkle pattern is a fixed spatial function, not noise.

use nalgebra::Vector3;
use rayon::prelude::*;
use tracing::debug;

use drape_core::{BodyFrame, Mesh, OperationTimer};

use crate::raycast::NearestSurface;

/// Fabric weight classes with their drop factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FabricWeight {
    Light,
    #[default]
    Medium,
    Heavy,
}

impl FabricWeight {
    /// Vertical drop factor in meters at the hem.
    pub fn factor(&self) -> f64 {
        match self {
            FabricWeight::Light => 0.008,
            FabricWeight::Medium => 0.015,
            FabricWeight::Heavy => 0.025,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FabricWeight::Light => "light",
            FabricWeight::Medium => "medium",
            FabricWeight::Heavy => "heavy",
        }
    }
}

/// Parameters for the draping passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrapeParams {
    pub weight: FabricWeight,
}

// Stretch zones: clearance below this pulls the garment against the body.
const STRETCH_TRIGGER: f64 = 0.02;
const STRETCH_FACTOR_TORSO: f64 = 0.7;
const STRETCH_FACTOR_SHOULDER: f64 = 0.5;
const SHOULDER_STRETCH_T: f64 = 0.85;

// Seam tension constants.
const SHOULDER_SEAM_RADIUS: f64 = 0.05;
const SHOULDER_SEAM_SCALE: f64 = 0.95;
const SIDE_SEAM_TOLERANCE_RAD: f64 = 0.3;
const SIDE_SEAM_PULL: f64 = 0.003;

// Wrinkle constants.
const WRINKLE_NEAR: f64 = 0.03;
const WRINKLE_FAR: f64 = 0.06;
const WRINKLE_AMPLITUDE: f64 = 0.004;

// Raycasts are bounded by the garment's practical clearance range.
const MAX_RAY_DISTANCE: f64 = 1.0;

/// Inward clearance per vertex: distance along the negated normal to the
/// body surface. Computed in parallel, collected in vertex order.
fn inward_clearances(garment: &Mesh, body: &dyn NearestSurface) -> Vec<Option<f64>> {
    garment
        .vertices
        .par_iter()
        .map(|vertex| {
            let normal = vertex.normal?;
            body.cast_ray(&vertex.position, &(-normal), MAX_RAY_DISTANCE)
                .map(|hit| hit.distance)
        })
        .collect()
}

/// Pass 1: pull vertices in stretch zones toward the body.
///
/// Where the measured clearance is below the trigger the fabric is under
/// tension; the vertex moves toward the body by `d * (1 - stretch_factor)`,
/// keeping `stretch_factor` of its gap.
pub fn apply_stretch_zones(garment: &mut Mesh, body: &dyn NearestSurface, frame: &BodyFrame) {
    let _timer = OperationTimer::new("stretch_zones");

    if !garment.has_normals() {
        garment.compute_normals();
    }

    let clearances = inward_clearances(garment, body);
    let mut pulled = 0usize;

    for (vertex, clearance) in garment.vertices.iter_mut().zip(clearances) {
        let Some(d) = clearance else { continue };
        if d >= STRETCH_TRIGGER {
            continue;
        }
        let Some(normal) = vertex.normal else { continue };

        let t = frame.normalized_height(vertex.position.y);
        let stretch_factor = if t >= SHOULDER_STRETCH_T {
            STRETCH_FACTOR_SHOULDER
        } else {
            STRETCH_FACTOR_TORSO
        };

        vertex.position -= normal * (d * (1.0 - stretch_factor));
        pulled += 1;
    }

    garment.compute_normals();
    debug!(pulled, "Applied stretch zones");
}

/// Pass 2: drop vertices under the fabric's weight.
///
/// The drop grows toward the hem and away from the body axis, where the
/// fabric hangs free.
pub fn apply_fabric_weight(garment: &mut Mesh, frame: &BodyFrame, weight: FabricWeight) {
    let _timer = OperationTimer::new("fabric_weight");

    let factor = weight.factor();
    for vertex in &mut garment.vertices {
        let t = frame.normalized_height(vertex.position.y);
        let dist = frame.distance_from_axis(&vertex.position);
        vertex.position.y -= factor * (1.0 - t) * (1.0 + 0.3 * dist);
    }

    garment.compute_normals();
    debug!(weight = weight.as_str(), "Applied fabric weight");
}

/// Pass 3: gather fabric at the shoulder and side seams.
///
/// Vertices near the shoulder line scale toward the axis in the horizontal
/// plane; vertices near the +-90 degree side azimuth get a fixed inward
/// pull.
pub fn apply_seam_tension(garment: &mut Mesh, frame: &BodyFrame) {
    let _timer = OperationTimer::new("seam_tension");

    let shoulder_y = frame.shoulder_y();
    let mut shoulder_gathered = 0usize;
    let mut side_gathered = 0usize;

    for vertex in &mut garment.vertices {
        let p = &mut vertex.position;

        if (p.y - shoulder_y).abs() < SHOULDER_SEAM_RADIUS {
            p.x = frame.axis_x + (p.x - frame.axis_x) * SHOULDER_SEAM_SCALE;
            p.z = frame.axis_z + (p.z - frame.axis_z) * SHOULDER_SEAM_SCALE;
            shoulder_gathered += 1;
        }

        let dx = p.x - frame.axis_x;
        let dz = p.z - frame.axis_z;
        let dist = (dx * dx + dz * dz).sqrt();
        if dist > SIDE_SEAM_PULL {
            let azimuth = dz.atan2(dx);
            let from_side = (azimuth.abs() - std::f64::consts::FRAC_PI_2).abs();
            if from_side < SIDE_SEAM_TOLERANCE_RAD {
                let pull = SIDE_SEAM_PULL / dist;
                p.x -= dx * pull;
                p.z -= dz * pull;
                side_gathered += 1;
            }
        }
    }

    garment.compute_normals();
    debug!(shoulder_gathered, side_gathered, "Applied seam tension");
}

/// Wrinkle intensity from body clearance: tight fabric wrinkles, fabric
/// hanging free does not.
fn wrinkle_factor(clearance: f64) -> f64 {
    if clearance < WRINKLE_NEAR {
        1.0
    } else if clearance < WRINKLE_FAR {
        0.5
    } else {
        0.0
    }
}

/// Pass 4: perturb vertices with a procedural wrinkle pattern.
///
/// The displacement runs along the in-surface horizontal tangent
/// (perpendicular to the normal), with a fixed high-frequency spatial
/// pattern scaled by the wrinkle factor.
pub fn apply_wrinkles(garment: &mut Mesh, body: &dyn NearestSurface) {
    let _timer = OperationTimer::new("wrinkles");

    if !garment.has_normals() {
        garment.compute_normals();
    }

    let clearances = inward_clearances(garment, body);
    let mut wrinkled = 0usize;

    for (vertex, clearance) in garment.vertices.iter_mut().zip(clearances) {
        let Some(d) = clearance else { continue };
        let factor = wrinkle_factor(d);
        if factor == 0.0 {
            continue;
        }
        let Some(normal) = vertex.normal else { continue };

        // Horizontal tangent perpendicular to the normal
        let tangent = Vector3::new(-normal.z, 0.0, normal.x);
        let len = tangent.norm();
        if len < 1e-12 {
            continue;
        }
        let tangent = tangent / len;

        let p = &vertex.position;
        let magnitude = (40.0 * p.x + 30.0 * p.z).sin()
            * (35.0 * p.y).cos()
            * (60.0 * p.x).sin()
            * WRINKLE_AMPLITUDE
            * factor;

        vertex.position += tangent * magnitude;
        wrinkled += 1;
    }

    garment.compute_normals();
    debug!(wrinkled, "Applied wrinkles");
}

/// Run all four draping passes in order.
pub fn drape_garment(
    garment: &mut Mesh,
    body: &dyn NearestSurface,
    frame: &BodyFrame,
    params: &DrapeParams,
) {
    apply_stretch_zones(garment, body, frame);
    apply_fabric_weight(garment, frame, params.weight);
    apply_seam_tension(garment, frame);
    apply_wrinkles(garment, body);
}
