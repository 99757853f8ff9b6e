//! Fluent builder for the full garment fitting pipeline.
//!
//! Chains the stages in the order the try-on experience needs them: region
//! selection, fabric offset, draping effects, collision resolution, and
//! smoothing, plus the measurement-side fit analysis that feeds ease values
//! into the offset stage.
//!
//! # Example
//!
//! ```no_run
//! use drape_core::{Mesh, BodyMeasurements, GarmentMeasurements};
//! use drape_shell::{FabricWeight, GarmentBuilder};
//!
//! let body = Mesh::load("body.obj").unwrap();
//! let measurements = BodyMeasurements {
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
//!     sleeve_length: Some(20.0),
//!     neck_width: None,
//!     armhole_depth: None,
//! };
//!
//! let result = GarmentBuilder::new(&body, measurements, garment)
//!     .fabric_weight(FabricWeight::Medium)
//!     .build()
//!     .unwrap();
//!
//! result.mesh.save("garment.obj").unwrap();
//! println!("{}", result.report.recommendation);
//! ```

use tracing::info;

use drape_core::{
    BodyFrame, BodyMeasurements, Ease, FitReport, GarmentKind, GarmentMeasurements, Mesh,
    MeshAdjacency, OperationTimer, RegionParams, fit, region,
};

use crate::collision::{CollisionParams, CollisionResult, resolve_collisions};
use crate::drape::{DrapeParams, FabricWeight, drape_garment};
use crate::error::{DrapeError, DrapeResult};
use crate::offset::{EaseProfile, OffsetParams, apply_fabric_offset};
use crate::raycast::TriangleBvh;
use crate::smooth::{SmoothParams, laplacian_smooth};

/// Result of a full fitting run: the draped garment mesh plus the fit
/// report and per-stage statistics.
#[derive(Debug)]
pub struct GarmentFit {
    /// The draped garment shell, in the body mesh's coordinate space.
    pub mesh: Mesh,
    /// Measurement-side fit analysis.
    pub report: FitReport,
    /// Collision resolution statistics.
    pub collision: CollisionResult,
    /// Number of body vertices kept by region selection.
    pub region_vertices: usize,
}

/// Fluent builder for garment fitting.
///
/// The body mesh is borrowed and never mutated; every build produces a
/// freshly allocated garment mesh, so concurrent fits against the same
/// body share nothing mutable.
pub struct GarmentBuilder<'a> {
    body: &'a Mesh,
    body_measurements: BodyMeasurements,
    garment_measurements: GarmentMeasurements,
    kind: GarmentKind,
    weight: FabricWeight,
    offset_params: OffsetParams,
    collision_params: CollisionParams,
    smooth_params: SmoothParams,
}

impl<'a> GarmentBuilder<'a> {
    /// Create a builder for fitting `garment_measurements` onto `body`.
    pub fn new(
        body: &'a Mesh,
        body_measurements: BodyMeasurements,
        garment_measurements: GarmentMeasurements,
    ) -> Self {
        Self {
            body,
            body_measurements,
            garment_measurements,
            kind: GarmentKind::default(),
            weight: FabricWeight::default(),
            offset_params: OffsetParams::default(),
            collision_params: CollisionParams::default(),
            smooth_params: SmoothParams::default(),
        }
    }

    /// Set the garment silhouette (selects the torso band).
    pub fn garment_kind(mut self, kind: GarmentKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the fabric weight class.
    pub fn fabric_weight(mut self, weight: FabricWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Override the clearance window of the offset stage.
    pub fn offset_params(mut self, params: OffsetParams) -> Self {
        self.offset_params = params;
        self
    }

    /// Override collision resolution parameters.
    pub fn collision_params(mut self, params: CollisionParams) -> Self {
        self.collision_params = params;
        self
    }

    /// Set the smoothing pass count and blend factor.
    pub fn smoothing(mut self, iterations: usize, lambda: f64) -> Self {
        self.smooth_params = SmoothParams { iterations, lambda };
        self
    }

    /// Run the full pipeline.
    pub fn build(self) -> DrapeResult<GarmentFit> {
        let _timer = OperationTimer::with_context(
            "garment_fit",
            self.body.vertex_count(),
            self.body.face_count(),
        );

        if self.smooth_params.lambda <= 0.0 || self.smooth_params.lambda > 1.0 {
            return Err(DrapeError::invalid_params(format!(
                "smoothing lambda must be in (0, 1], got {}",
                self.smooth_params.lambda
            )));
        }
        if self.offset_params.min_clearance <= 0.0
            || self.offset_params.max_clearance <= self.offset_params.min_clearance
        {
            return Err(DrapeError::invalid_params(
                "clearance window must satisfy 0 < min < max",
            ));
        }

        // Measurement side: fit report and ease values
        let report = fit::analyze_fit(&self.body_measurements, &self.garment_measurements)?;
        let ease = Ease::from_measurements(&self.body_measurements, &self.garment_measurements)?;

        // Geometry side: frame, region, spatial index
        let frame = BodyFrame::from_mesh(self.body)?;
        let band = self.kind.band();
        let sleeve_length = self.garment_measurements.sleeve_length.map(|cm| cm / 100.0);
        let region_params = RegionParams {
            band,
            sleeve_length,
        };
        let selected = region::select_torso_region(self.body, &frame, &region_params)?;
        let mut garment = selected.mesh;
        let region_vertices = garment.vertex_count();

        let bvh = TriangleBvh::from_mesh(self.body);

        // Displacement stages, in pipeline order
        apply_fabric_offset(
            &mut garment,
            &frame,
            &band,
            &EaseProfile::from_ease(&ease),
            &self.offset_params,
        );
        drape_garment(
            &mut garment,
            &bvh,
            &frame,
            &DrapeParams {
                weight: self.weight,
            },
        );
        let collision = resolve_collisions(&mut garment, &bvh, &self.collision_params);

        let adjacency = MeshAdjacency::build(&garment)?;
        laplacian_smooth(&mut garment, &adjacency, &self.smooth_params);

        if garment.is_empty() {
            return Err(DrapeError::EmptyGarment);
        }

        info!(
            garment_vertices = garment.vertex_count(),
            garment_faces = garment.face_count(),
            overall = report.overall.as_str(),
            "Garment fit complete"
        );

        Ok(GarmentFit {
            mesh: garment,
            report,
            collision,
            region_vertices,
        })
    }
}

/// Fit a garment with default parameters.
///
/// Convenience wrapper over [`GarmentBuilder`] for the common case.
pub fn fit_garment(
    body: &Mesh,
    body_measurements: &BodyMeasurements,
    garment_measurements: &GarmentMeasurements,
) -> DrapeResult<GarmentFit> {
    GarmentBuilder::new(
        body,
        body_measurements.clone(),
        garment_measurements.clone(),
    )
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_invalid_lambda_rejected() {
        let body = Mesh::new();
        let (bm, gm) = measurements();
        let err = GarmentBuilder::new(&body, bm, gm)
            .smoothing(2, 1.5)
            .build()
            .unwrap_err();
        assert!(matches!(err, DrapeError::InvalidParams { .. }));
    }

    #[test]
    fn test_invalid_clearance_window_rejected() {
        let body = Mesh::new();
        let (bm, gm) = measurements();
        let err = GarmentBuilder::new(&body, bm, gm)
            .offset_params(OffsetParams {
                min_clearance: 0.05,
                max_clearance: 0.01,
                loose_threshold: 0.01,
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, DrapeError::InvalidParams { .. }));
    }

    #[test]
    fn test_empty_body_fails_as_fit_error() {
        let body = Mesh::new();
        let (bm, gm) = measurements();
        let err = GarmentBuilder::new(&body, bm, gm).build().unwrap_err();
        assert!(matches!(err, DrapeError::Fit(_)));
    }
}
