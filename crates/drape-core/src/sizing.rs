//! Size charts and size recommendation.
//!
//! The recommender scores every candidate size with the fit analyzer and
//! picks the best, keeping up to two wearable alternatives. Pure over its
//! inputs; chart order breaks ties.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FitError, FitResult};
use crate::fit::{self, FitReport, FitStatus};
use crate::measure::{BodyMeasurements, GarmentMeasurements};

/// One candidate size from a size chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeEntry {
    /// Size label, e.g. "S", "M", "44".
    pub name: String,
    pub measurements: GarmentMeasurements,
}

/// A garment size chart, usually loaded from a size-chart resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub garment: Option<String>,
    pub sizes: Vec<SizeEntry>,
}

/// A scored candidate size.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredSize {
    pub size: String,
    pub score: i32,
    pub report: FitReport,
}

/// Recommendation: the best size plus up to two alternatives.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeRecommendation {
    pub best: ScoredSize,
    pub alternatives: Vec<ScoredSize>,
}

/// Score one analyzed size.
///
/// The overall status counts double; chest always contributes, waist and
/// shoulder only when measured.
fn score_report(report: &FitReport) -> i32 {
    let mut score = 2 * report.overall.score() + report.chest.status.score();
    if let Some(waist) = &report.waist {
        score += waist.status.score();
    }
    if let Some(shoulder) = &report.shoulder {
        score += shoulder.status.score();
    }
    score
}

/// A size qualifies as an alternative when its score is positive and its
/// overall status is not an extreme.
fn is_wearable(candidate: &ScoredSize) -> bool {
    candidate.score > 0
        && candidate.report.overall != FitStatus::TooTight
        && candidate.report.overall != FitStatus::TooLoose
}

/// Recommend the best size from a chart for the given body.
///
/// Scans sizes in chart order, keeping the maximum-score size (first wins
/// on ties). When a later size displaces the current best, the displaced
/// size is preferred first among alternatives.
pub fn recommend_size(
    body: &BodyMeasurements,
    chart: &SizeChart,
) -> FitResult<SizeRecommendation> {
    if chart.sizes.is_empty() {
        return Err(FitError::EmptySizeChart);
    }

    let mut best: Option<ScoredSize> = None;
    let mut alternatives: Vec<ScoredSize> = Vec::new();

    for entry in &chart.sizes {
        let report = fit::analyze_fit(body, &entry.measurements)?;
        let candidate = ScoredSize {
            size: entry.name.clone(),
            score: score_report(&report),
            report,
        };

        match &best {
            None => best = Some(candidate),
            Some(current) if candidate.score > current.score => {
                // Displaced previous best goes to the front of the queue
                let displaced = best.replace(candidate).expect("best was set");
                alternatives.insert(0, displaced);
            }
            Some(_) => alternatives.push(candidate),
        }
    }

    let best = best.expect("chart has at least one size");
    alternatives.retain(is_wearable);
    alternatives.truncate(2);

    debug!(
        best = best.size.as_str(),
        score = best.score,
        alternatives = alternatives.len(),
        "Size recommendation complete"
    );

    Ok(SizeRecommendation { best, alternatives })
}
