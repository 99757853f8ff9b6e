//! Vertex adjacency graph derived from triangle indices.
//!
//! The graph is index-based: a flat array of neighbor sets indexed by vertex,
//! not a linked structure. It is rebuilt per invocation from the face list
//! and never persisted between fitting calls.

use hashbrown::HashSet;

use crate::error::{FitError, FitResult};
use crate::types::Mesh;

/// Vertex-to-neighbor adjacency for an indexed triangle mesh.
///
/// Triangle (a, b, c) contributes the symmetric edges a-b, b-c, c-a.
#[derive(Debug, Clone)]
pub struct MeshAdjacency {
    neighbors: Vec<HashSet<u32>>,
}

impl MeshAdjacency {
    /// Build the adjacency graph from a mesh's triangle index.
    ///
    /// Fails with `InvalidMesh` if the mesh has no faces, and with
    /// `InvalidVertexIndex` if any face references a vertex out of range.
    pub fn build(mesh: &Mesh) -> FitResult<Self> {
        if mesh.faces.is_empty() {
            return Err(FitError::invalid_mesh(
                "adjacency",
                "mesh has no triangle index",
            ));
        }

        let vertex_count = mesh.vertices.len();
        let mut neighbors: Vec<HashSet<u32>> = vec![HashSet::new(); vertex_count];

        for (face_index, face) in mesh.faces.iter().enumerate() {
            for &v in face {
                if v as usize >= vertex_count {
                    return Err(FitError::invalid_vertex_index(face_index, v, vertex_count));
                }
            }

            let [a, b, c] = *face;
            neighbors[a as usize].insert(b);
            neighbors[a as usize].insert(c);
            neighbors[b as usize].insert(a);
            neighbors[b as usize].insert(c);
            neighbors[c as usize].insert(a);
            neighbors[c as usize].insert(b);
        }

        Ok(Self { neighbors })
    }

    /// Number of vertices the graph was built for.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Neighbors of the given vertex.
    #[inline]
    pub fn neighbors(&self, vertex: u32) -> &HashSet<u32> {
        &self.neighbors[vertex as usize]
    }

    /// Number of neighbors of the given vertex.
    #[inline]
    pub fn degree(&self, vertex: u32) -> usize {
        self.neighbors[vertex as usize].len()
    }
}
