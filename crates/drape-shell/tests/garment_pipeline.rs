//! End-to-end tests for the garment fitting pipeline.
//!
//! These run the full stage chain (region selection, fabric offset,
//! draping, collision resolution, smoothing) against a synthetic
//! cylindrical body and check the pipeline invariants: minimum clearance,
//! input immutability, and determinism.

use drape_core::{BodyMeasurements, FitStatus, GarmentKind, GarmentMeasurements, Mesh, Vertex};
use drape_shell::{FabricWeight, GarmentBuilder, NearestSurface, TriangleBvh, fit_garment};

/// A closed-sided cylinder stand-in for a body: radius in meters, y from 0
/// to `height`.
fn make_cylinder_body(radius: f64, height: f64, segments: usize, rings: usize) -> Mesh {
    let mut mesh = Mesh::new();
    for ring in 0..rings {
        let y = height * ring as f64 / (rings - 1) as f64;
        for s in 0..segments {
            let angle = std::f64::consts::TAU * s as f64 / segments as f64;
            mesh.vertices.push(Vertex::from_coords(
                radius * angle.cos(),
                y,
                radius * angle.sin(),
            ));
        }
    }
    for ring in 0..rings - 1 {
        for s in 0..segments {
            let a = (ring * segments + s) as u32;
            let b = (ring * segments + (s + 1) % segments) as u32;
            let c = ((ring + 1) * segments + s) as u32;
            let d = ((ring + 1) * segments + (s + 1) % segments) as u32;
            // Outward winding: +y is up, normals point away from the axis
            mesh.faces.push([a, b, d]);
            mesh.faces.push([a, d, c]);
        }
    }
    mesh.compute_normals();
    mesh
}

fn body_measurements() -> BodyMeasurements {
    BodyMeasurements {
        chest: Some(95.0),
        waist: Some(80.0),
        shoulder_width: Some(45.0),
        ..Default::default()
    }
}

fn garment_measurements() -> GarmentMeasurements {
    GarmentMeasurements {
        chest: 102.0,
        length: 70.0,
        waist: Some(94.0),
        shoulder_width: Some(46.0),
        sleeve_length: None,
        neck_width: None,
        armhole_depth: None,
    }
}

/// Like `garment_measurements` but with enough shoulder ease that the
/// shoulder-seam gather cannot press the shell against the body; used for
/// the clearance-sensitive assertions.
fn roomy_garment_measurements() -> GarmentMeasurements {
    GarmentMeasurements {
        shoulder_width: Some(48.0),
        ..garment_measurements()
    }
}

#[test]
fn pipeline_produces_nonempty_garment() {
    let body = make_cylinder_body(0.15, 1.7, 32, 35);
    let result = GarmentBuilder::new(&body, body_measurements(), garment_measurements())
        .build()
        .unwrap();

    assert!(!result.mesh.is_empty());
    assert!(result.mesh.has_normals());
    assert_eq!(result.mesh.vertex_count(), result.region_vertices);
    // The t-shirt band [0.50, 0.85] of a 35-ring cylinder keeps the rings
    // at y in [0.85, 1.445]: 12 full rings of 32 vertices (11 if the hem
    // ring rounds just outside the band boundary)
    assert!(result.mesh.vertex_count() >= 11 * 32);
    assert!(result.mesh.vertex_count() <= 12 * 32);
}

#[test]
fn pipeline_output_is_finite() {
    let body = make_cylinder_body(0.15, 1.7, 32, 35);
    let result = GarmentBuilder::new(&body, body_measurements(), garment_measurements())
        .fabric_weight(FabricWeight::Heavy)
        .build()
        .unwrap();

    for v in &result.mesh.vertices {
        assert!(v.position.x.is_finite());
        assert!(v.position.y.is_finite());
        assert!(v.position.z.is_finite());
        let n = v.normal.unwrap();
        assert!((n.norm() - 1.0).abs() < 1e-6);
    }
}

#[test]
fn collision_invariant_holds_on_finished_garment() {
    let body = make_cylinder_body(0.15, 1.7, 32, 35);
    let result = GarmentBuilder::new(&body, body_measurements(), roomy_garment_measurements())
        .build()
        .unwrap();

    let bvh = TriangleBvh::from_mesh(&body);
    let min_clearance = 0.015;
    let tolerance = 0.002;

    for v in &result.mesh.vertices {
        let normal = v.normal.unwrap();
        if let Some(hit) = bvh.cast_ray(&v.position, &(-normal), 1.0) {
            assert!(
                hit.distance >= min_clearance - tolerance,
                "vertex at {:?} has clearance {}",
                v.position,
                hit.distance
            );
        }
    }
}

#[test]
fn garment_sits_outside_the_body() {
    let body = make_cylinder_body(0.15, 1.7, 32, 35);
    let result = GarmentBuilder::new(&body, body_measurements(), roomy_garment_measurements())
        .build()
        .unwrap();

    for v in &result.mesh.vertices {
        let radial = (v.position.x * v.position.x + v.position.z * v.position.z).sqrt();
        assert!(
            radial > 0.15,
            "vertex at {:?} penetrates the body radius",
            v.position
        );
    }
}

#[test]
fn body_mesh_is_never_mutated() {
    let body = make_cylinder_body(0.15, 1.7, 32, 35);
    let before: Vec<_> = body.vertices.iter().map(|v| v.position).collect();
    let faces_before = body.faces.clone();

    let _ = GarmentBuilder::new(&body, body_measurements(), garment_measurements())
        .build()
        .unwrap();

    let after: Vec<_> = body.vertices.iter().map(|v| v.position).collect();
    assert_eq!(before, after);
    assert_eq!(faces_before, body.faces);
}

#[test]
fn fit_garment_matches_builder_defaults() {
    let body = make_cylinder_body(0.15, 1.7, 32, 35);

    let via_fn = fit_garment(&body, &body_measurements(), &garment_measurements()).unwrap();
    let via_builder = GarmentBuilder::new(&body, body_measurements(), garment_measurements())
        .build()
        .unwrap();

    assert_eq!(via_fn.mesh.vertex_count(), via_builder.mesh.vertex_count());
    for (a, b) in via_fn.mesh.vertices.iter().zip(via_builder.mesh.vertices.iter()) {
        assert_eq!(a.position, b.position);
    }
}

#[test]
fn pipeline_is_deterministic() {
    let body = make_cylinder_body(0.15, 1.7, 32, 35);

    let a = GarmentBuilder::new(&body, body_measurements(), garment_measurements())
        .build()
        .unwrap();
    let b = GarmentBuilder::new(&body, body_measurements(), garment_measurements())
        .build()
        .unwrap();

    assert_eq!(a.mesh.vertex_count(), b.mesh.vertex_count());
    for (va, vb) in a.mesh.vertices.iter().zip(b.mesh.vertices.iter()) {
        assert_eq!(va.position, vb.position);
    }
}

#[test]
fn report_matches_measurement_scenario() {
    let body = make_cylinder_body(0.15, 1.7, 32, 35);
    let result = GarmentBuilder::new(&body, body_measurements(), garment_measurements())
        .build()
        .unwrap();

    // body {chest 95, waist 80, shoulder 45} x garment {102, 94, 46}:
    // chest perfect, waist loose, shoulder perfect, overall loose
    assert_eq!(result.report.overall, FitStatus::Loose);
    assert_eq!(result.report.chest.status, FitStatus::Perfect);
    assert_eq!(result.report.waist.unwrap().status, FitStatus::Loose);
}

#[test]
fn tight_garment_hugs_without_deep_penetration() {
    // Garment smaller than the body: negative ease everywhere. The offset
    // stage clamps the inflation to the minimum clearance (the garment is
    // assumed to stretch, not penetrate) and collision resolution pushes
    // the stretch-flattened fabric back out.
    let body = make_cylinder_body(0.15, 1.7, 32, 35);
    let tight = GarmentMeasurements {
        chest: 92.0,
        length: 70.0,
        waist: Some(77.0),
        shoulder_width: Some(44.0),
        sleeve_length: None,
        neck_width: None,
        armhole_depth: None,
    };

    let result = GarmentBuilder::new(&body, body_measurements(), tight)
        .build()
        .unwrap();

    // The stretch-zone pass pulled the clamped offset in, so collision
    // resolution had work to do
    assert!(result.collision.vertices_corrected > 0);

    // The finished shell hugs the body. Seam gathering presses a
    // minimal-clearance shell slightly inside the 0.15 m cylinder near the
    // shoulder and side seams; the intrusion is bounded by the seam scale
    // and pull, never deep penetration
    for v in &result.mesh.vertices {
        let radial = (v.position.x * v.position.x + v.position.z * v.position.z).sqrt();
        assert!(
            radial > 0.139,
            "vertex at {:?} penetrates deep into the body",
            v.position
        );
        assert!(v.position.x.is_finite() && v.position.y.is_finite());
    }
}

#[test]
fn sleeve_length_trims_the_arm_band() {
    // A wide body with vertices far from the axis in the sleeve band; a
    // short sleeve must exclude them
    let body = make_cylinder_body(0.15, 1.7, 32, 35);

    let with_sleeve = GarmentMeasurements {
        sleeve_length: Some(1.0), // 1 cm: ends just below the shoulder
        ..garment_measurements()
    };

    let trimmed = GarmentBuilder::new(&body, body_measurements(), with_sleeve)
        .build()
        .unwrap();
    let untrimmed = GarmentBuilder::new(&body, body_measurements(), garment_measurements())
        .build()
        .unwrap();

    // The cylinder keeps all its vertices within 0.15 of the axis and the
    // arm threshold is 0.15 * width = 0.045, so arm vertices exist; with a
    // 1 cm sleeve some band vertices fall below the sleeve line
    assert!(trimmed.region_vertices <= untrimmed.region_vertices);
}

#[test]
fn long_top_covers_more_than_tshirt() {
    let body = make_cylinder_body(0.15, 1.7, 32, 35);

    let tee = GarmentBuilder::new(&body, body_measurements(), garment_measurements())
        .garment_kind(GarmentKind::TShirt)
        .build()
        .unwrap();
    let long = GarmentBuilder::new(&body, body_measurements(), garment_measurements())
        .garment_kind(GarmentKind::LongTop)
        .build()
        .unwrap();

    assert!(long.region_vertices > tee.region_vertices);
}

#[test]
fn heavier_fabric_drops_lower() {
    let body = make_cylinder_body(0.15, 1.7, 32, 35);

    let light = GarmentBuilder::new(&body, body_measurements(), garment_measurements())
        .fabric_weight(FabricWeight::Light)
        .build()
        .unwrap();
    let heavy = GarmentBuilder::new(&body, body_measurements(), garment_measurements())
        .fabric_weight(FabricWeight::Heavy)
        .build()
        .unwrap();

    let min_y = |m: &Mesh| {
        m.vertices
            .iter()
            .map(|v| v.position.y)
            .fold(f64::INFINITY, f64::min)
    };

    assert!(min_y(&heavy.mesh) < min_y(&light.mesh));
}
