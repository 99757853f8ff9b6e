//! Garment fitting primitives for virtual try-on.
//!
//! This crate provides the measurement-side half of the try-on pipeline:
//! the mesh data model, the vertex adjacency graph, torso region selection
//! on a body mesh, anthropometric extraction, fit analysis, and size
//! recommendation. The geometric draping pipeline that consumes these lives
//! in `drape-shell`.
//!
//! # Units and Coordinate System
//!
//! **Meshes are in meters, y-up, with y = 0 at the ground plane.**
//! Measurement records (body and garment) are in **centimeters**, matching
//! the body-model service and size-chart resources. Face winding is
//! counter-clockwise when viewed from outside, so vertex normals point
//! outward.
//!
//! # Quick Start
//!
//! ```no_run
//! use drape_core::{Mesh, analyze_fit, BodyMeasurements, GarmentMeasurements};
//!
//! let body = BodyMeasurements {
//!     chest: Some(95.0),
//!     waist: Some(80.0),
//!     shoulder_width: Some(45.0),
//!     ..Default::default()
//! };
//! let garment = GarmentMeasurements {
//!     chest: 102.0,
//!     length: 70.0,
//!     waist: Some(94.0),
//!     shoulder_width: Some(46.0),
//!     sleeve_length: None,
//!     neck_width: None,
//!     armhole_depth: None,
//! };
//!
//! let report = analyze_fit(&body, &garment).unwrap();
//! println!("{}: {}", report.overall, report.recommendation);
//! ```
//!
//! # Degraded-mode measurements
//!
//! Fit analysis requires the body chest measurement and fails without it.
//! Missing *optional* garment fields fall back to heuristic estimates
//! (waist ease = 0.75 x chest ease, shoulder ease = min(0.4 x chest ease,
//! 3 cm)). That fallback is deliberate degraded-mode behavior, not an
//! error.

mod error;
mod types;

pub mod adjacency;
pub mod fit;
pub mod io;
pub mod measure;
pub mod region;
pub mod sizing;
pub mod trace;

// Re-export core types at crate root
pub use error::{FitError, FitErrorCode, FitResult};
pub use types::{Mesh, Triangle, Vertex};

pub use adjacency::MeshAdjacency;
pub use fit::{Ease, FitMetric, FitReport, FitStatus, analyze_fit, classify_fit};
pub use io::{load_mesh, load_obj, save_mesh, save_obj};
pub use measure::{
    BodyMeasurements, GarmentMeasurements, RangeViolation, measure_body, validate_measurements,
};
pub use region::{
    BodyFrame, GarmentKind, GarmentRegion, RegionParams, TorsoBand, select_torso_region,
};
pub use sizing::{ScoredSize, SizeChart, SizeEntry, SizeRecommendation, recommend_size};
pub use trace::OperationTimer;

// Convenience methods on Mesh
impl Mesh {
    /// Load a mesh from a file, auto-detecting format from extension.
    pub fn load(path: impl AsRef<std::path::Path>) -> FitResult<Self> {
        io::load_mesh(path.as_ref())
    }

    /// Save the mesh to a file, auto-detecting format from extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> FitResult<()> {
        io::save_mesh(self, path.as_ref())
    }

    /// Build the vertex adjacency graph from this mesh's triangle index.
    pub fn adjacency(&self) -> FitResult<MeshAdjacency> {
        MeshAdjacency::build(self)
    }

    /// Extract anthropometric measurements from this body mesh.
    pub fn measure(&self) -> FitResult<BodyMeasurements> {
        measure::measure_body(self)
    }
}
