//! Laplacian mesh smoothing over the vertex adjacency graph.
//!
//! Removes the high-frequency artifacts left by the displacement passes.
//! Every iteration snapshots all positions first and updates from the
//! snapshot, so the relaxation is simultaneous rather than sequential.

use nalgebra::{Point3, Vector3};
use tracing::debug;

use drape_core::{Mesh, MeshAdjacency, OperationTimer};

/// Parameters for Laplacian smoothing.
#[derive(Debug, Clone, Copy)]
pub struct SmoothParams {
    /// Number of relaxation passes.
    pub iterations: usize,
    /// Blend factor toward the neighbor centroid, in (0, 1].
    pub lambda: f64,
}

impl Default for SmoothParams {
    fn default() -> Self {
        Self {
            iterations: 2,
            lambda: 0.5,
        }
    }
}

/// Relax each vertex toward the centroid of its neighbors.
///
/// Vertices with no neighbors are unchanged. With zero iterations the mesh
/// is untouched. Normals are recomputed once after all iterations.
pub fn laplacian_smooth(garment: &mut Mesh, adjacency: &MeshAdjacency, params: &SmoothParams) {
    let _timer = OperationTimer::with_context(
        "laplacian_smooth",
        garment.vertex_count(),
        garment.face_count(),
    );

    if params.iterations == 0 {
        return;
    }

    for _ in 0..params.iterations {
        // Simultaneous update: all reads go to the snapshot
        let snapshot: Vec<Point3<f64>> = garment.vertices.iter().map(|v| v.position).collect();

        for (vi, vertex) in garment.vertices.iter_mut().enumerate() {
            let neighbors = adjacency.neighbors(vi as u32);
            if neighbors.is_empty() {
                continue;
            }

            let mut centroid = Vector3::zeros();
            for &ni in neighbors {
                centroid += snapshot[ni as usize].coords;
            }
            centroid /= neighbors.len() as f64;

            let current = snapshot[vi].coords;
            vertex.position = Point3::from(current + (centroid - current) * params.lambda);
        }
    }

    garment.compute_normals();

    debug!(
        iterations = params.iterations,
        lambda = params.lambda,
        "Smoothed garment mesh"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use drape_core::Vertex;

    /// A center vertex surrounded by a triangle fan of three neighbors.
    fn make_fan() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.5, 0.0)); // center, lifted
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(-0.5, 0.0, 0.87));
        mesh.vertices.push(Vertex::from_coords(-0.5, 0.0, -0.87));
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([0, 2, 3]);
        mesh.faces.push([0, 3, 1]);
        mesh
    }

    #[test]
    fn test_zero_iterations_leaves_positions_unchanged() {
        let mut mesh = make_fan();
        let before: Vec<_> = mesh.vertices.iter().map(|v| v.position).collect();
        let adj = MeshAdjacency::build(&mesh).unwrap();

        laplacian_smooth(
            &mut mesh,
            &adj,
            &SmoothParams {
                iterations: 0,
                lambda: 0.5,
            },
        );

        for (v, b) in mesh.vertices.iter().zip(&before) {
            assert!((v.position - b).norm() < 1e-15);
        }
    }

    #[test]
    fn test_lambda_one_lands_on_neighbor_centroid() {
        let mut mesh = make_fan();
        let adj = MeshAdjacency::build(&mesh).unwrap();

        // Expected centroid of the center's neighbors before smoothing
        let expected = (mesh.vertices[1].position.coords
            + mesh.vertices[2].position.coords
            + mesh.vertices[3].position.coords)
            / 3.0;

        laplacian_smooth(
            &mut mesh,
            &adj,
            &SmoothParams {
                iterations: 1,
                lambda: 1.0,
            },
        );

        // One pass with lambda = 1 moves the vertex exactly to the
        // centroid, no overshoot
        let got = mesh.vertices[0].position.coords;
        assert!((got - expected).norm() < 1e-12);
    }

    #[test]
    fn test_half_lambda_moves_halfway() {
        let mut mesh = make_fan();
        let adj = MeshAdjacency::build(&mesh).unwrap();
        let start = mesh.vertices[0].position.coords;
        let centroid = (mesh.vertices[1].position.coords
            + mesh.vertices[2].position.coords
            + mesh.vertices[3].position.coords)
            / 3.0;

        laplacian_smooth(
            &mut mesh,
            &adj,
            &SmoothParams {
                iterations: 1,
                lambda: 0.5,
            },
        );

        let expected = start + (centroid - start) * 0.5;
        assert!((mesh.vertices[0].position.coords - expected).norm() < 1e-12);
    }

    #[test]
    fn test_update_is_simultaneous_not_sequential() {
        // Two adjacent vertices on a shared edge: each must see the other's
        // snapshot position, not the freshly smoothed one
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        let adj = MeshAdjacency::build(&mesh).unwrap();

        let snapshot: Vec<_> = mesh.vertices.iter().map(|v| v.position.coords).collect();

        laplacian_smooth(
            &mut mesh,
            &adj,
            &SmoothParams {
                iterations: 1,
                lambda: 1.0,
            },
        );

        // Every vertex lands on the centroid of the other two snapshot
        // positions
        for vi in 0..3 {
            let others: Vec<_> = (0..3).filter(|&i| i != vi).collect();
            let expected = (snapshot[others[0]] + snapshot[others[1]]) / 2.0;
            assert!(
                (mesh.vertices[vi].position.coords - expected).norm() < 1e-12,
                "vertex {} not at snapshot centroid",
                vi
            );
        }
    }

    #[test]
    fn test_isolated_vertex_unchanged() {
        let mut mesh = make_fan();
        mesh.vertices.push(Vertex::from_coords(9.0, 9.0, 9.0));
        let adj = MeshAdjacency::build(&mesh).unwrap();

        laplacian_smooth(&mut mesh, &adj, &SmoothParams::default());

        let p = mesh.vertices[4].position;
        assert!((p.x - 9.0).abs() < 1e-15);
        assert!((p.y - 9.0).abs() < 1e-15);
        assert!((p.z - 9.0).abs() < 1e-15);
    }

    #[test]
    fn test_normals_present_after_smoothing() {
        let mut mesh = make_fan();
        let adj = MeshAdjacency::build(&mesh).unwrap();

        laplacian_smooth(&mut mesh, &adj, &SmoothParams::default());

        for v in &mesh.vertices {
            assert!(v.normal.is_some());
        }
    }
}
