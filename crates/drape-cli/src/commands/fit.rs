//! drape fit command - run the full garment fitting pipeline.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use drape_core::{BodyMeasurements, GarmentKind, GarmentMeasurements, Mesh};
use drape_shell::{FabricWeight, GarmentBuilder};
use serde::Serialize;

use crate::commands::load_json;
use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FitSummary<'a> {
    output: String,
    garment_vertices: usize,
    garment_faces: usize,
    region_vertices: usize,
    collision_corrections: usize,
    report: &'a drape_core::FitReport,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    input: &Path,
    measurements: &Path,
    garment: &Path,
    out: &Path,
    kind: GarmentKind,
    weight: FabricWeight,
    cli: &Cli,
) -> Result<()> {
    let body =
        Mesh::load(input).with_context(|| format!("Failed to load body mesh from {:?}", input))?;
    let body_measurements: BodyMeasurements = load_json(measurements, "body measurements")?;
    let garment_measurements: GarmentMeasurements = load_json(garment, "garment measurements")?;

    let result = GarmentBuilder::new(&body, body_measurements, garment_measurements)
        .garment_kind(kind)
        .fabric_weight(weight)
        .build()?;

    result
        .mesh
        .save(out)
        .with_context(|| format!("Failed to save garment mesh to {:?}", out))?;

    let summary = FitSummary {
        output: out.display().to_string(),
        garment_vertices: result.mesh.vertex_count(),
        garment_faces: result.mesh.face_count(),
        region_vertices: result.region_vertices,
        collision_corrections: result.collision.vertices_corrected,
        report: &result.report,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&summary, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Garment Fit".bold().underline());
                println!("  {}: {}", "Output".cyan(), out.display());
                println!(
                    "  {}: {} vertices, {} faces",
                    "Garment".cyan(),
                    summary.garment_vertices,
                    summary.garment_faces
                );
                println!(
                    "  {}: {}",
                    "Collision corrections".cyan(),
                    summary.collision_corrections
                );
                println!("  {}: {}", "Overall fit".cyan(), result.report.overall);
                println!(
                    "  {}: {}",
                    "Recommendation".cyan(),
                    result.report.recommendation
                );
            }
        }
    }

    Ok(())
}
