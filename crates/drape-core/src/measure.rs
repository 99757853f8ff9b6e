//! Measurement records and anthropometric extraction from body meshes.
//!
//! Measurement records use centimeters and serialize with camelCase field
//! names to match the body-model service and size-chart resources. Meshes
//! are in meters; extraction converts internally.
//!
//! Circumferences are estimated from horizontal slices of the body mesh:
//! the slice vertices are projected to the XZ plane and the perimeter of
//! their convex hull is taken as the circumference.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FitError, FitResult};
use crate::types::Mesh;

/// Anthropometric body measurements in centimeters.
///
/// All fields are optional at the record level; fit analysis requires chest
/// and falls back to heuristic estimates for waist and shoulder width.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BodyMeasurements {
    pub height: Option<f64>,
    pub chest: Option<f64>,
    pub waist: Option<f64>,
    pub hips: Option<f64>,
    pub shoulder_width: Option<f64>,
    pub torso_length: Option<f64>,
    pub arm_length: Option<f64>,
    pub inseam: Option<f64>,
    pub neck_circumference: Option<f64>,
}

/// Garment measurements in centimeters, from a size chart.
///
/// Chest and length are always present in a chart entry; the remaining
/// fields may be absent and are estimated heuristically when needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarmentMeasurements {
    pub chest: f64,
    pub length: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoulder_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleeve_length: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neck_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armhole_depth: Option<f64>,
}

/// A measurement outside its plausible anthropometric range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeViolation {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl std::fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} = {:.1} cm outside [{:.0}, {:.0}]",
            self.field, self.value, self.min, self.max
        )
    }
}

/// Plausible ranges (cm) per measurement field.
const MEASUREMENT_RANGES: [(&str, f64, f64); 8] = [
    ("height", 140.0, 210.0),
    ("chest", 70.0, 140.0),
    ("waist", 60.0, 130.0),
    ("hips", 70.0, 140.0),
    ("shoulderWidth", 30.0, 60.0),
    ("armLength", 50.0, 90.0),
    ("inseam", 60.0, 100.0),
    ("neckCircumference", 30.0, 50.0),
];

/// Check all present fields against their plausible ranges.
///
/// Returns one violation per out-of-range field; an empty vector means the
/// record is valid.
pub fn validate_measurements(m: &BodyMeasurements) -> Vec<RangeViolation> {
    let fields = [
        ("height", m.height),
        ("chest", m.chest),
        ("waist", m.waist),
        ("hips", m.hips),
        ("shoulderWidth", m.shoulder_width),
        ("armLength", m.arm_length),
        ("inseam", m.inseam),
        ("neckCircumference", m.neck_circumference),
    ];

    let mut violations = Vec::new();
    for (name, value) in fields {
        let Some(value) = value else { continue };
        if let Some(&(field, min, max)) = MEASUREMENT_RANGES.iter().find(|(f, _, _)| *f == name) {
            if !(min..=max).contains(&value) {
                violations.push(RangeViolation {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }
    }
    violations
}

// Height fractions and slice half-widths (cm) for each landmark.
const CHEST_FRACTION: f64 = 0.75;
const WAIST_FRACTION: f64 = 0.60;
const HIP_FRACTION: f64 = 0.52;
const SHOULDER_FRACTION: f64 = 0.82;
const NECK_FRACTION: f64 = 0.88;
const CIRCUMFERENCE_SLICE_CM: f64 = 5.0;
const SHOULDER_SLICE_CM: f64 = 3.0;
const NECK_SLICE_CM: f64 = 2.0;

/// Extract anthropometric measurements from a body mesh.
///
/// The mesh must be y-up in meters. Circumferences are taken from
/// horizontal slices at fixed height fractions; arm length and inseam are
/// proportional estimates. Fails with `DegenerateGeometry` when the mesh
/// has no usable vertical extent.
pub fn measure_body(mesh: &Mesh) -> FitResult<BodyMeasurements> {
    let (min, max) = mesh
        .bounds()
        .ok_or_else(|| FitError::invalid_mesh("measure", "mesh has no vertices"))?;

    let height_cm = (max.y - min.y) * 100.0;
    if !height_cm.is_finite() || height_cm < 1.0 {
        return Err(FitError::degenerate_geometry("height", height_cm / 100.0));
    }

    // Work in cm from here on
    let min_y_cm = min.y * 100.0;
    let positions: Vec<Point3<f64>> = mesh
        .vertices
        .iter()
        .map(|v| v.position * 100.0)
        .collect();

    let chest = slice_circumference(
        &positions,
        min_y_cm + height_cm * CHEST_FRACTION,
        CIRCUMFERENCE_SLICE_CM,
    )
    .unwrap_or(95.0);
    let waist = slice_circumference(
        &positions,
        min_y_cm + height_cm * WAIST_FRACTION,
        CIRCUMFERENCE_SLICE_CM,
    )
    .unwrap_or(80.0);
    let hips = slice_circumference(
        &positions,
        min_y_cm + height_cm * HIP_FRACTION,
        CIRCUMFERENCE_SLICE_CM,
    )
    .unwrap_or(95.0);

    let shoulder_width = slice_width(
        &positions,
        min_y_cm + height_cm * SHOULDER_FRACTION,
        SHOULDER_SLICE_CM,
    )
    .unwrap_or(45.0);

    let neck_circumference = slice_circumference(
        &positions,
        min_y_cm + height_cm * NECK_FRACTION,
        NECK_SLICE_CM,
    )
    .map(|c| c * 0.5)
    .unwrap_or(38.0);

    debug!(
        height = format!("{:.1}", height_cm),
        chest = format!("{:.1}", chest),
        waist = format!("{:.1}", waist),
        "Extracted body measurements"
    );

    Ok(BodyMeasurements {
        height: Some(height_cm),
        chest: Some(chest),
        waist: Some(waist),
        hips: Some(hips),
        shoulder_width: Some(shoulder_width),
        torso_length: None,
        arm_length: Some(height_cm * 0.38),
        inseam: Some(height_cm * 0.45),
        neck_circumference: Some(neck_circumference),
    })
}

/// Circumference of the horizontal slice at `y_cm`, or None if the slice
/// holds fewer than three vertices.
fn slice_circumference(positions: &[Point3<f64>], y_cm: f64, half_width_cm: f64) -> Option<f64> {
    let slice: Vec<(f64, f64)> = positions
        .iter()
        .filter(|p| (p.y - y_cm).abs() < half_width_cm)
        .map(|p| (p.x, p.z))
        .collect();

    if slice.len() < 3 {
        return None;
    }
    let perimeter = convex_hull_perimeter(&slice);
    if perimeter > 0.0 { Some(perimeter) } else { None }
}

/// X-extent of the horizontal slice at `y_cm`.
fn slice_width(positions: &[Point3<f64>], y_cm: f64, half_width_cm: f64) -> Option<f64> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut count = 0usize;

    for p in positions {
        if (p.y - y_cm).abs() < half_width_cm {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            count += 1;
        }
    }

    if count == 0 { None } else { Some(max_x - min_x) }
}

/// Perimeter of the 2D convex hull (Andrew's monotone chain).
fn convex_hull_perimeter(points: &[(f64, f64)]) -> f64 {
    let mut pts: Vec<(f64, f64)> = points.to_vec();
    pts.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    });
    pts.dedup();

    if pts.len() < 3 {
        return 0.0;
    }

    let cross = |o: (f64, f64), a: (f64, f64), b: (f64, f64)| {
        (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
    };

    let mut lower: Vec<(f64, f64)> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<(f64, f64)> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    // Endpoints of each chain are shared
    lower.pop();
    upper.pop();
    let hull: Vec<(f64, f64)> = lower.into_iter().chain(upper).collect();

    let mut perimeter = 0.0;
    for i in 0..hull.len() {
        let (x0, z0) = hull[i];
        let (x1, z1) = hull[(i + 1) % hull.len()];
        perimeter += ((x1 - x0).powi(2) + (z1 - z0).powi(2)).sqrt();
    }
    perimeter
}
