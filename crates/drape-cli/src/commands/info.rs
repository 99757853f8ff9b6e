//! drape info command - display mesh statistics.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use drape_core::Mesh;
use serde::Serialize;

use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct MeshInfo {
    path: String,
    vertices: usize,
    faces: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundsInfo>,
    has_normals: bool,
}

#[derive(Serialize)]
struct BoundsInfo {
    min: [f64; 3],
    max: [f64; 3],
    dimensions: [f64; 3],
}

pub fn run(input: &Path, cli: &Cli) -> Result<()> {
    let mesh =
        Mesh::load(input).with_context(|| format!("Failed to load mesh from {:?}", input))?;

    let bounds = mesh.bounds().map(|(min, max)| {
        let dims = max - min;
        BoundsInfo {
            min: [min.x, min.y, min.z],
            max: [max.x, max.y, max.z],
            dimensions: [dims.x, dims.y, dims.z],
        }
    });

    let info = MeshInfo {
        path: input.display().to_string(),
        vertices: mesh.vertex_count(),
        faces: mesh.face_count(),
        bounds,
        has_normals: mesh.has_normals(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Mesh Information".bold().underline());
                println!("  {}: {}", "File".cyan(), input.display());
                println!("  {}: {}", "Vertices".cyan(), info.vertices);
                println!("  {}: {}", "Faces".cyan(), info.faces);

                if let Some(ref b) = info.bounds {
                    println!(
                        "  {}: {:.3} x {:.3} x {:.3} m",
                        "Dimensions".cyan(),
                        b.dimensions[0],
                        b.dimensions[1],
                        b.dimensions[2]
                    );
                }

                println!(
                    "  {}: {}",
                    "Has normals".cyan(),
                    if info.has_normals { "yes" } else { "no" }
                );
            }
        }
    }

    Ok(())
}
