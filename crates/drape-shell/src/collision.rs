//! Collision resolution: enforce a minimum garment-to-body clearance.
//!
//! Per vertex, the clearance is measured along the negated normal; any
//! vertex closer than the minimum is pushed back out along its normal with
//! a small elastic overshoot. A ray that misses the body means no
//! correction is required, never an error.

use rayon::prelude::*;
use tracing::debug;

use drape_core::{Mesh, OperationTimer};

use crate::raycast::NearestSurface;

/// Parameters for collision resolution.
#[derive(Debug, Clone, Copy)]
pub struct CollisionParams {
    /// Minimum garment-to-body clearance in meters.
    pub min_clearance: f64,
    /// Push-out multiplier; slightly above 1 so corrected vertices settle
    /// clear of the threshold instead of exactly on it.
    pub overshoot: f64,
    /// Maximum inward ray distance in meters.
    pub max_ray_distance: f64,
}

impl Default for CollisionParams {
    fn default() -> Self {
        Self {
            min_clearance: 0.015,
            overshoot: 1.2,
            max_ray_distance: 1.0,
        }
    }
}

/// Statistics from one collision resolution pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionResult {
    /// Vertices with a normal that were checked.
    pub vertices_checked: usize,
    /// Vertices pushed outward.
    pub vertices_corrected: usize,
    /// Largest push applied, in meters.
    pub max_push: f64,
}

/// Push garment vertices out to the minimum clearance.
///
/// The correction for a vertex at clearance `d` below the minimum is
/// `(min_clearance - d) * overshoot` along its normal.
pub fn resolve_collisions(
    garment: &mut Mesh,
    body: &dyn NearestSurface,
    params: &CollisionParams,
) -> CollisionResult {
    let _timer = OperationTimer::with_context(
        "collision_resolution",
        garment.vertex_count(),
        garment.face_count(),
    );

    if !garment.has_normals() {
        garment.compute_normals();
    }

    // Measure clearances in parallel, collected in vertex order
    let pushes: Vec<Option<f64>> = garment
        .vertices
        .par_iter()
        .map(|vertex| {
            let normal = vertex.normal?;
            let hit = body.cast_ray(&vertex.position, &(-normal), params.max_ray_distance)?;
            if hit.distance < params.min_clearance {
                Some((params.min_clearance - hit.distance) * params.overshoot)
            } else {
                None
            }
        })
        .collect();

    let mut result = CollisionResult::default();

    for (vertex, push) in garment.vertices.iter_mut().zip(pushes) {
        if vertex.normal.is_some() {
            result.vertices_checked += 1;
        }
        let Some(push) = push else { continue };
        let normal = vertex.normal.expect("push implies normal");
        vertex.position += normal * push;
        result.vertices_corrected += 1;
        result.max_push = result.max_push.max(push);
    }

    garment.compute_normals();

    debug!(
        checked = result.vertices_checked,
        corrected = result.vertices_corrected,
        max_push = format!("{:.4}", result.max_push),
        "Resolved collisions"
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raycast::RayHit;
    use drape_core::Vertex;
    use nalgebra::{Point3, Vector3};

    struct FixedClearance(Option<f64>);

    impl NearestSurface for FixedClearance {
        fn cast_ray(
            &self,
            _origin: &Point3<f64>,
            _direction: &Vector3<f64>,
            max_distance: f64,
        ) -> Option<RayHit> {
            match self.0 {
                Some(d) if d <= max_distance => Some(RayHit { distance: d, face: 0 }),
                _ => None,
            }
        }
    }

    fn patch() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::with_normal(
            Point3::new(0.2, 1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ));
        mesh.vertices.push(Vertex::with_normal(
            Point3::new(0.2, 1.01, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        ));
        mesh.vertices.push(Vertex::with_normal(
            Point3::new(0.2, 1.0, 0.01),
            Vector3::new(1.0, 0.0, 0.0),
        ));
        mesh.faces.push([0, 2, 1]);
        mesh
    }

    #[test]
    fn test_push_out_exact_amount() {
        // Clearance 0.001 against a 0.015 minimum: push is
        // (0.015 - 0.001) * 1.2 = 0.0168 along the normal
        let body = FixedClearance(Some(0.001));
        let mut garment = patch();
        let before = garment.vertices[0].position.x;

        let result = resolve_collisions(&mut garment, &body, &CollisionParams::default());

        let pushed = garment.vertices[0].position.x - before;
        assert!((pushed - 0.0168).abs() < 1e-9, "pushed {}", pushed);
        assert_eq!(result.vertices_corrected, 3);
        assert!((result.max_push - 0.0168).abs() < 1e-9);
    }

    #[test]
    fn test_clear_vertices_untouched() {
        let body = FixedClearance(Some(0.02));
        let mut garment = patch();
        let before = garment.vertices[0].position;

        let result = resolve_collisions(&mut garment, &body, &CollisionParams::default());

        assert_eq!(result.vertices_corrected, 0);
        assert!((garment.vertices[0].position - before).norm() < 1e-12);
    }

    #[test]
    fn test_miss_is_not_an_error() {
        let body = FixedClearance(None);
        let mut garment = patch();
        let before = garment.vertices[0].position;

        let result = resolve_collisions(&mut garment, &body, &CollisionParams::default());

        assert_eq!(result.vertices_checked, 3);
        assert_eq!(result.vertices_corrected, 0);
        assert!((garment.vertices[0].position - before).norm() < 1e-12);
    }

    #[test]
    fn test_exactly_at_clearance_untouched() {
        let body = FixedClearance(Some(0.015));
        let mut garment = patch();
        let before = garment.vertices[0].position;

        let result = resolve_collisions(&mut garment, &body, &CollisionParams::default());

        assert_eq!(result.vertices_corrected, 0);
        assert!((garment.vertices[0].position - before).norm() < 1e-12);
    }
}
