//! Nearest-surface-along-ray queries against the body mesh.
//!
//! The per-vertex inward raycast is the dominant cost of the pipeline, so
//! the query capability is a narrow trait: draping and collision code only
//! see [`NearestSurface`], and a different spatial index can be substituted
//! without touching them. The in-crate implementation is a median-split
//! BVH over the body triangles with Moller-Trumbore intersection tests.
//!
//! A ray that hits nothing is a normal outcome, never an error.

use nalgebra::{Point3, Vector3};

use drape_core::{Mesh, Triangle};

/// The nearest intersection along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the intersection point.
    pub distance: f64,
    /// Index of the hit triangle in the queried mesh.
    pub face: usize,
}

/// Nearest-surface query along a ray.
///
/// Implementations must be deterministic: the same ray against the same
/// surface always returns the same hit. `Sync` is required because the
/// pipeline fans the per-vertex raycasts out across threads.
pub trait NearestSurface: Sync {
    /// Cast a ray and return the nearest hit within `max_distance`, or
    /// None when the ray escapes the surface.
    fn cast_ray(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        max_distance: f64,
    ) -> Option<RayHit>;
}

const RAY_EPSILON: f64 = 1e-9;

/// Axis-aligned bounding box for the BVH.
#[derive(Debug, Clone, Copy)]
struct Aabb {
    min: Point3<f64>,
    max: Point3<f64>,
}

impl Aabb {
    fn from_triangle(tri: &Triangle) -> Self {
        let min = Point3::new(
            tri.v0.x.min(tri.v1.x).min(tri.v2.x),
            tri.v0.y.min(tri.v1.y).min(tri.v2.y),
            tri.v0.z.min(tri.v1.z).min(tri.v2.z),
        );
        let max = Point3::new(
            tri.v0.x.max(tri.v1.x).max(tri.v2.x),
            tri.v0.y.max(tri.v1.y).max(tri.v2.y),
            tri.v0.z.max(tri.v1.z).max(tri.v2.z),
        );
        Self { min, max }
    }

    /// Expand by epsilon for numerical robustness.
    fn expand(&self, epsilon: f64) -> Self {
        Self {
            min: Point3::new(
                self.min.x - epsilon,
                self.min.y - epsilon,
                self.min.z - epsilon,
            ),
            max: Point3::new(
                self.max.x + epsilon,
                self.max.y + epsilon,
                self.max.z + epsilon,
            ),
        }
    }

    fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Ray-AABB slab test. Returns (t_near, t_far) or None.
    fn ray_intersect(&self, origin: &Point3<f64>, dir_inv: &Vector3<f64>) -> Option<(f64, f64)> {
        let t1 = (self.min.x - origin.x) * dir_inv.x;
        let t2 = (self.max.x - origin.x) * dir_inv.x;
        let t3 = (self.min.y - origin.y) * dir_inv.y;
        let t4 = (self.max.y - origin.y) * dir_inv.y;
        let t5 = (self.min.z - origin.z) * dir_inv.z;
        let t6 = (self.max.z - origin.z) * dir_inv.z;

        let t_min = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let t_max = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        if t_max >= t_min && t_max >= 0.0 {
            Some((t_min.max(0.0), t_max))
        } else {
            None
        }
    }
}

/// BVH node over body triangles.
#[derive(Debug)]
enum BvhNode {
    Leaf {
        aabb: Aabb,
        face_idx: usize,
    },
    Internal {
        aabb: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    /// Build by median split along the longest extent.
    fn build(triangles: &[Triangle], indices: &mut [usize]) -> Option<Self> {
        if indices.is_empty() {
            return None;
        }

        if indices.len() == 1 {
            let idx = indices[0];
            return Some(BvhNode::Leaf {
                aabb: Aabb::from_triangle(&triangles[idx]).expand(RAY_EPSILON),
                face_idx: idx,
            });
        }

        let mut combined = Aabb::from_triangle(&triangles[indices[0]]);
        for &idx in indices.iter().skip(1) {
            combined = combined.merge(&Aabb::from_triangle(&triangles[idx]));
        }
        let combined = combined.expand(RAY_EPSILON);

        let extent = combined.max - combined.min;
        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };

        indices.sort_by(|&a, &b| {
            let ca = triangles[a].centroid();
            let cb = triangles[b].centroid();
            let va = match axis {
                0 => ca.x,
                1 => ca.y,
                _ => ca.z,
            };
            let vb = match axis {
                0 => cb.x,
                1 => cb.y,
                _ => cb.z,
            };
            va.partial_cmp(&vb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = indices.len() / 2;
        let (left_indices, right_indices) = indices.split_at_mut(mid);

        let left = BvhNode::build(triangles, left_indices);
        let right = BvhNode::build(triangles, right_indices);

        match (left, right) {
            (Some(l), Some(r)) => Some(BvhNode::Internal {
                aabb: combined,
                left: Box::new(l),
                right: Box::new(r),
            }),
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (None, None) => None,
        }
    }

    fn aabb(&self) -> &Aabb {
        match self {
            BvhNode::Leaf { aabb, .. } => aabb,
            BvhNode::Internal { aabb, .. } => aabb,
        }
    }
}

/// Moller-Trumbore ray-triangle intersection.
/// Returns the distance t along the ray if intersection occurs.
fn ray_triangle_intersect(
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    tri: &Triangle,
) -> Option<f64> {
    let edge1 = tri.v1 - tri.v0;
    let edge2 = tri.v2 - tri.v0;

    let h = direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Ray is parallel to triangle
    if a.abs() < RAY_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - tri.v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * direction.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);

    if t > RAY_EPSILON { Some(t) } else { None }
}

fn trace_ray(
    node: &BvhNode,
    origin: &Point3<f64>,
    direction: &Vector3<f64>,
    dir_inv: &Vector3<f64>,
    triangles: &[Triangle],
    max_dist: f64,
) -> Option<(f64, usize)> {
    match node.aabb().ray_intersect(origin, dir_inv) {
        Some((t_near, _)) if t_near <= max_dist => {}
        _ => return None,
    }

    match node {
        BvhNode::Leaf { face_idx, .. } => {
            match ray_triangle_intersect(origin, direction, &triangles[*face_idx]) {
                Some(t) if t <= max_dist => Some((t, *face_idx)),
                _ => None,
            }
        }
        BvhNode::Internal { left, right, .. } => {
            let hit_left = trace_ray(left, origin, direction, dir_inv, triangles, max_dist);
            // Anything farther than the left hit cannot win
            let max_dist_right = hit_left.map(|(t, _)| t).unwrap_or(max_dist);
            let hit_right = trace_ray(right, origin, direction, dir_inv, triangles, max_dist_right);

            match (hit_left, hit_right) {
                (Some((t1, f1)), Some((t2, f2))) => {
                    if t1 <= t2 {
                        Some((t1, f1))
                    } else {
                        Some((t2, f2))
                    }
                }
                (Some(h), None) | (None, Some(h)) => Some(h),
                (None, None) => None,
            }
        }
    }
}

/// BVH-accelerated nearest-surface queries over a triangle mesh.
#[derive(Debug)]
pub struct TriangleBvh {
    triangles: Vec<Triangle>,
    root: Option<BvhNode>,
}

impl TriangleBvh {
    /// Build a BVH over the mesh's triangles.
    ///
    /// An empty mesh produces a BVH that never reports hits.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let triangles: Vec<Triangle> = mesh.triangles().collect();
        let mut indices: Vec<usize> = (0..triangles.len()).collect();
        let root = BvhNode::build(&triangles, &mut indices);
        Self { triangles, root }
    }

    /// Number of triangles in the index.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

impl NearestSurface for TriangleBvh {
    fn cast_ray(
        &self,
        origin: &Point3<f64>,
        direction: &Vector3<f64>,
        max_distance: f64,
    ) -> Option<RayHit> {
        let root = self.root.as_ref()?;

        let dir_inv = Vector3::new(
            if direction.x.abs() > RAY_EPSILON {
                1.0 / direction.x
            } else {
                f64::MAX
            },
            if direction.y.abs() > RAY_EPSILON {
                1.0 / direction.y
            } else {
                f64::MAX
            },
            if direction.z.abs() > RAY_EPSILON {
                1.0 / direction.z
            } else {
                f64::MAX
            },
        );

        trace_ray(root, origin, direction, &dir_inv, &self.triangles, max_distance)
            .map(|(distance, face)| RayHit { distance, face })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drape_core::Vertex;

    fn make_cube(size: f64) -> Mesh {
        let mut mesh = Mesh::new();
        let s = size;
        let corners = [
            (0.0, 0.0, 0.0),
            (s, 0.0, 0.0),
            (s, s, 0.0),
            (0.0, s, 0.0),
            (0.0, 0.0, s),
            (s, 0.0, s),
            (s, s, s),
            (0.0, s, s),
        ];
        for (x, y, z) in corners {
            mesh.vertices.push(Vertex::from_coords(x, y, z));
        }
        mesh.faces.push([0, 2, 1]);
        mesh.faces.push([0, 3, 2]);
        mesh.faces.push([4, 5, 6]);
        mesh.faces.push([4, 6, 7]);
        mesh.faces.push([0, 1, 5]);
        mesh.faces.push([0, 5, 4]);
        mesh.faces.push([3, 7, 6]);
        mesh.faces.push([3, 6, 2]);
        mesh.faces.push([0, 4, 7]);
        mesh.faces.push([0, 7, 3]);
        mesh.faces.push([1, 2, 6]);
        mesh.faces.push([1, 6, 5]);
        mesh
    }

    #[test]
    fn test_ray_triangle_hit() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        );
        let origin = Point3::new(0.5, 0.5, 1.0);
        let direction = Vector3::new(0.0, 0.0, -1.0);

        let t = ray_triangle_intersect(&origin, &direction, &tri).unwrap();
        assert!((t - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_ray_triangle_miss() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        );
        let origin = Point3::new(5.0, 5.0, 1.0);
        let direction = Vector3::new(0.0, 0.0, -1.0);

        assert!(ray_triangle_intersect(&origin, &direction, &tri).is_none());
    }

    #[test]
    fn test_ray_triangle_parallel() {
        let tri = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        );
        let origin = Point3::new(0.0, 0.0, 1.0);
        let direction = Vector3::new(1.0, 0.0, 0.0);

        assert!(ray_triangle_intersect(&origin, &direction, &tri).is_none());
    }

    #[test]
    fn test_bvh_ray_from_outside_cube() {
        let bvh = TriangleBvh::from_mesh(&make_cube(1.0));
        // From outside the cube toward the x=0 face
        let origin = Point3::new(-1.0, 0.5, 0.5);
        let direction = Vector3::new(1.0, 0.0, 0.0);

        let hit = bvh.cast_ray(&origin, &direction, 10.0).unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_bvh_nearest_of_two_walls() {
        let bvh = TriangleBvh::from_mesh(&make_cube(1.0));
        // From just outside toward both x faces: the x=0 face is nearer
        let origin = Point3::new(-0.2, 0.5, 0.5);
        let direction = Vector3::new(1.0, 0.0, 0.0);

        let hit = bvh.cast_ray(&origin, &direction, 10.0).unwrap();
        assert!((hit.distance - 0.2).abs() < 1e-8);
    }

    #[test]
    fn test_bvh_respects_max_distance() {
        let bvh = TriangleBvh::from_mesh(&make_cube(1.0));
        let origin = Point3::new(-1.0, 0.5, 0.5);
        let direction = Vector3::new(1.0, 0.0, 0.0);

        assert!(bvh.cast_ray(&origin, &direction, 0.5).is_none());
    }

    #[test]
    fn test_bvh_miss_is_none() {
        let bvh = TriangleBvh::from_mesh(&make_cube(1.0));
        let origin = Point3::new(-1.0, 0.5, 0.5);
        let direction = Vector3::new(-1.0, 0.0, 0.0);

        assert!(bvh.cast_ray(&origin, &direction, 10.0).is_none());
    }

    #[test]
    fn test_empty_mesh_never_hits() {
        let bvh = TriangleBvh::from_mesh(&Mesh::new());
        let origin = Point3::new(0.0, 0.0, 0.0);
        let direction = Vector3::new(0.0, -1.0, 0.0);
        assert!(bvh.cast_ray(&origin, &direction, 10.0).is_none());
    }

    #[test]
    fn test_determinism() {
        let bvh = TriangleBvh::from_mesh(&make_cube(1.0));
        let origin = Point3::new(0.5, 0.5, 5.0);
        let direction = Vector3::new(0.0, 0.0, -1.0);

        let a = bvh.cast_ray(&origin, &direction, 100.0).unwrap();
        let b = bvh.cast_ray(&origin, &direction, 100.0).unwrap();
        assert_eq!(a, b);
    }
}
