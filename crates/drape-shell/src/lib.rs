//! Garment shell generation over a body mesh.
//!
//! This crate is the geometry half of the virtual try-on pipeline: it takes
//! the torso submesh selected by `drape-core`, inflates it outward along
//! vertex normals by measurement-derived ease, drapes it with
//! physically-motivated displacement passes (stretch zones, fabric weight,
//! seam tension, wrinkles), resolves collisions against the body, and
//! relaxes the result with Laplacian smoothing.
//!
//! # Quick Start with GarmentBuilder
//!
//! ```no_run
//! use drape_core::{Mesh, BodyMeasurements, GarmentMeasurements};
//! use drape_shell::{FabricWeight, GarmentBuilder};
//!
//! let body = Mesh::load("body.obj").unwrap();
//!
//! let result = GarmentBuilder::new(
//!     &body,
//!     BodyMeasurements { chest: Some(95.0), ..Default::default() },
//!     GarmentMeasurements {
//!         chest: 102.0,
//!         length: 70.0,
//!         waist: None,
//!         shoulder_width: None,
//!         sleeve_length: None,
//!         neck_width: None,
//!         armhole_depth: None,
//!     },
//! )
//! .fabric_weight(FabricWeight::Light)
//! .build()
//! .unwrap();
//!
//! result.mesh.save("garment.obj").unwrap();
//! ```
//!
//! # Determinism and resource model
//!
//! All stages are synchronous, deterministic functions over explicitly
//! passed state. Each build owns a private garment mesh; the body mesh is
//! never mutated, so concurrent fits against the same body are safe. The
//! per-vertex inward raycast runs on a thread pool but results are
//! collected in vertex order, so output is identical run to run.
//!
//! # The tight/loose asymmetry
//!
//! Tight garments skip boxiness shaping, and negative ease is silently
//! clamped to the minimum clearance rather than flagged. Both behaviors are
//! load-bearing for visual output compatibility and must not be "fixed"
//! without a product decision.

mod builder;
mod error;
mod offset;

pub mod collision;
pub mod drape;
pub mod raycast;
pub mod smooth;

pub use error::{DrapeError, DrapeErrorCode, DrapeResult};

// Builder API (recommended)
pub use builder::{GarmentBuilder, GarmentFit, fit_garment};

// Fabric offset
pub use offset::{EaseProfile, OffsetParams, apply_fabric_offset, blended_offset};

// Draping passes
pub use drape::{
    DrapeParams, FabricWeight, apply_fabric_weight, apply_seam_tension, apply_stretch_zones,
    apply_wrinkles, drape_garment,
};

// Collision resolution
pub use collision::{CollisionParams, CollisionResult, resolve_collisions};

// Smoothing
pub use smooth::{SmoothParams, laplacian_smooth};

// Nearest-surface queries
pub use raycast::{NearestSurface, RayHit, TriangleBvh};
