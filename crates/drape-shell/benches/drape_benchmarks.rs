//! Benchmarks for the garment fitting pipeline.
//!
//! Run with: cargo bench -p drape-shell
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p drape-shell -- --save-baseline main
//! 2. After changes: cargo bench -p drape-shell -- --baseline main

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use drape_core::{BodyMeasurements, GarmentMeasurements, Mesh, Vertex};
use drape_shell::{GarmentBuilder, TriangleBvh};
use nalgebra::{Point3, Vector3};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Cylindrical body stand-in: radius 0.15 m, height 1.7 m.
fn create_body(segments: usize, rings: usize) -> Mesh {
    let mut mesh = Mesh::new();
    for ring in 0..rings {
        let y = 1.7 * ring as f64 / (rings - 1) as f64;
        for s in 0..segments {
            let angle = std::f64::consts::TAU * s as f64 / segments as f64;
            mesh.vertices
                .push(Vertex::from_coords(0.15 * angle.cos(), y, 0.15 * angle.sin()));
        }
    }
    for ring in 0..rings - 1 {
        for s in 0..segments {
            let a = (ring * segments + s) as u32;
            let b = (ring * segments + (s + 1) % segments) as u32;
            let c = ((ring + 1) * segments + s) as u32;
            let d = ((ring + 1) * segments + (s + 1) % segments) as u32;
            mesh.faces.push([a, b, d]);
            mesh.faces.push([a, d, c]);
        }
    }
    mesh.compute_normals();
    mesh
}

fn measurements() -> (BodyMeasurements, GarmentMeasurements) {
    let body = BodyMeasurements {
        chest: Some(95.0),
        waist: Some(80.0),
        shoulder_width: Some(45.0),
        ..Default::default()
    };
    let garment = GarmentMeasurements {
        chest: 102.0,
        length: 70.0,
        waist: Some(94.0),
        shoulder_width: Some(46.0),
        sleeve_length: None,
        neck_width: None,
        armhole_depth: None,
    };
    (body, garment)
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("garment_fit");

    for &(segments, rings) in &[(24usize, 30usize), (48, 60), (96, 120)] {
        let body = create_body(segments, rings);
        let (bm, gm) = measurements();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", segments, rings)),
            &body,
            |b, body| {
                b.iter(|| {
                    let result = GarmentBuilder::new(body, bm.clone(), gm.clone())
                        .build()
                        .unwrap();
                    black_box(result.mesh.vertex_count())
                })
            },
        );
    }

    group.finish();
}

fn bench_bvh_build(c: &mut Criterion) {
    let body = create_body(48, 60);
    c.bench_function("bvh_build_48x60", |b| {
        b.iter(|| black_box(TriangleBvh::from_mesh(&body).triangle_count()))
    });
}

fn bench_raycast(c: &mut Criterion) {
    let body = create_body(48, 60);
    let bvh = TriangleBvh::from_mesh(&body);
    let origin = Point3::new(0.2, 0.85, 0.0);
    let direction = Vector3::new(-1.0, 0.0, 0.0);

    c.bench_function("inward_raycast", |b| {
        b.iter(|| black_box(bvh.cast_ray(&origin, &direction, 1.0)))
    });
}

criterion_group!(benches, bench_full_pipeline, bench_bvh_build, bench_raycast);
criterion_main!(benches);
