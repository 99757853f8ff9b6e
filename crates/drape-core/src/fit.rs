//! Fit analysis: compare garment and body measurements.
//!
//! Pure functions over measurement records; no mesh geometry involved.
//! Identical inputs always yield identical outputs.

use serde::Serialize;
use tracing::debug;

use crate::error::{FitError, FitResult};
use crate::measure::{BodyMeasurements, GarmentMeasurements};

/// How a measured region fits, from percentage ease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStatus {
    TooTight,
    Tight,
    Perfect,
    Loose,
    TooLoose,
}

impl FitStatus {
    /// Severity for overall-status aggregation: extremes dominate,
    /// moderate beats perfect.
    pub fn severity(&self) -> u8 {
        match self {
            FitStatus::TooTight | FitStatus::TooLoose => 2,
            FitStatus::Tight | FitStatus::Loose => 1,
            FitStatus::Perfect => 0,
        }
    }

    /// Score used by the size recommender.
    pub fn score(&self) -> i32 {
        match self {
            FitStatus::TooTight => -10,
            FitStatus::Tight => 3,
            FitStatus::Perfect => 10,
            FitStatus::Loose => 5,
            FitStatus::TooLoose => -5,
        }
    }

    /// Ordinal index across the classification boundaries, tightest first.
    pub fn index(&self) -> usize {
        match self {
            FitStatus::TooTight => 0,
            FitStatus::Tight => 1,
            FitStatus::Perfect => 2,
            FitStatus::Loose => 3,
            FitStatus::TooLoose => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FitStatus::TooTight => "too_tight",
            FitStatus::Tight => "tight",
            FitStatus::Perfect => "perfect",
            FitStatus::Loose => "loose",
            FitStatus::TooLoose => "too_loose",
        }
    }
}

impl std::fmt::Display for FitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify percentage ease into a fit status.
///
/// Non-decreasing step function over the boundaries {-5, 2, 10, 20}.
pub fn classify_fit(percentage: f64) -> FitStatus {
    if percentage < -5.0 {
        FitStatus::TooTight
    } else if percentage < 2.0 {
        FitStatus::Tight
    } else if percentage < 10.0 {
        FitStatus::Perfect
    } else if percentage < 20.0 {
        FitStatus::Loose
    } else {
        FitStatus::TooLoose
    }
}

/// Comparison of one measured region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitMetric {
    pub garment_value: f64,
    pub body_value: f64,
    pub difference: f64,
    pub percentage_difference: f64,
    pub status: FitStatus,
}

impl FitMetric {
    /// Compare a garment measurement against the corresponding body value.
    pub fn new(garment_value: f64, body_value: f64) -> Self {
        let difference = garment_value - body_value;
        let percentage_difference = 100.0 * difference / body_value;
        Self {
            garment_value,
            body_value,
            difference,
            percentage_difference,
            status: classify_fit(percentage_difference),
        }
    }
}

/// Full fit analysis for one garment size against one body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitReport {
    pub overall: FitStatus,
    pub chest: FitMetric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist: Option<FitMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shoulder: Option<FitMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<FitMetric>,
    pub recommendation: String,
}

/// Per-region ease in centimeters, ready for the fabric offset calculator.
///
/// Missing garment fields are estimated: waist ease defaults to 0.75 of the
/// chest ease, shoulder ease to min(0.4 x chest ease, 3 cm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ease {
    pub chest_cm: f64,
    pub waist_cm: f64,
    pub shoulder_cm: f64,
}

impl Ease {
    /// Derive per-region ease from measurement records.
    ///
    /// Fails with `MissingMeasurement` when the body chest value is absent.
    pub fn from_measurements(
        body: &BodyMeasurements,
        garment: &GarmentMeasurements,
    ) -> FitResult<Self> {
        let body_chest = body
            .chest
            .ok_or_else(|| FitError::missing_measurement("chest"))?;
        let chest_cm = garment.chest - body_chest;

        let waist_cm = match (garment.waist, body.waist) {
            (Some(g), Some(b)) => g - b,
            _ => 0.75 * chest_cm,
        };

        let shoulder_cm = match (garment.shoulder_width, body.shoulder_width) {
            (Some(g), Some(b)) => g - b,
            _ => (0.4 * chest_cm).min(3.0),
        };

        Ok(Self {
            chest_cm,
            waist_cm,
            shoulder_cm,
        })
    }
}

/// Analyze how a garment fits a body, region by region.
///
/// Chest is always compared; waist, shoulder, and length participate only
/// when both garment and body values are present. The overall status is the
/// worst per-region status (extremes dominate, moderate beats perfect);
/// among equal severity the earlier region wins, in the order chest, waist,
/// shoulder, length.
pub fn analyze_fit(
    body: &BodyMeasurements,
    garment: &GarmentMeasurements,
) -> FitResult<FitReport> {
    let body_chest = body
        .chest
        .ok_or_else(|| FitError::missing_measurement("chest"))?;

    let chest = FitMetric::new(garment.chest, body_chest);

    let waist = match (garment.waist, body.waist) {
        (Some(g), Some(b)) => Some(FitMetric::new(g, b)),
        _ => None,
    };
    let shoulder = match (garment.shoulder_width, body.shoulder_width) {
        (Some(g), Some(b)) => Some(FitMetric::new(g, b)),
        _ => None,
    };
    let length = body.torso_length.map(|b| FitMetric::new(garment.length, b));

    let mut overall = chest.status;
    for metric in [&waist, &shoulder, &length].into_iter().flatten() {
        if metric.status.severity() > overall.severity() {
            overall = metric.status;
        }
    }

    let recommendation = build_recommendation(&chest, &waist, &shoulder, &length);

    debug!(
        overall = overall.as_str(),
        chest_pct = format!("{:.1}", chest.percentage_difference),
        "Fit analysis complete"
    );

    Ok(FitReport {
        overall,
        chest,
        waist,
        shoulder,
        length,
        recommendation,
    })
}

/// Assemble the human-readable recommendation.
///
/// Only too_tight, too_loose, and tight statuses contribute issue phrases;
/// with no issues the recommendation is a positive confirmation.
fn build_recommendation(
    chest: &FitMetric,
    waist: &Option<FitMetric>,
    shoulder: &Option<FitMetric>,
    length: &Option<FitMetric>,
) -> String {
    let mut phrases: Vec<String> = Vec::new();

    let regions = [
        ("chest", Some(chest)),
        ("waist", waist.as_ref()),
        ("shoulders", shoulder.as_ref()),
        ("length", length.as_ref()),
    ];

    for (name, metric) in regions {
        let Some(metric) = metric else { continue };
        match metric.status {
            FitStatus::TooTight => {
                phrases.push(format!(
                    "Very tight at the {}; consider sizing up.",
                    name
                ));
            }
            FitStatus::TooLoose => {
                phrases.push(format!(
                    "Very loose at the {}; consider sizing down.",
                    name
                ));
            }
            FitStatus::Tight => {
                phrases.push(format!("Slightly snug at the {}.", name));
            }
            FitStatus::Perfect | FitStatus::Loose => {}
        }
    }

    if phrases.is_empty() {
        "Good fit for your measurements.".to_string()
    } else {
        phrases.join(" ")
    }
}
