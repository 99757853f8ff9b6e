//! drape measure command - extract body measurements from a mesh.

use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use drape_core::{Mesh, validate_measurements};

use crate::{Cli, OutputFormat, output};

pub fn run(input: &Path, validate: bool, cli: &Cli) -> Result<()> {
    let mesh =
        Mesh::load(input).with_context(|| format!("Failed to load body mesh from {:?}", input))?;

    let measurements = mesh.measure()?;

    match cli.format {
        OutputFormat::Json => {
            output::print(&measurements, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Body Measurements (cm)".bold().underline());
                let rows = [
                    ("Height", measurements.height),
                    ("Chest", measurements.chest),
                    ("Waist", measurements.waist),
                    ("Hips", measurements.hips),
                    ("Shoulder width", measurements.shoulder_width),
                    ("Arm length", measurements.arm_length),
                    ("Inseam", measurements.inseam),
                    ("Neck circumference", measurements.neck_circumference),
                ];
                for (label, value) in rows {
                    if let Some(value) = value {
                        println!("  {}: {:.1}", label.cyan(), value);
                    }
                }
            }
        }
    }

    if validate {
        let violations = validate_measurements(&measurements);
        if !violations.is_empty() {
            if !cli.quiet {
                for v in &violations {
                    eprintln!("  {}: {}", "Out of range".yellow(), v);
                }
            }
            bail!("{} measurement(s) outside plausible ranges", violations.len());
        }
        if !cli.quiet {
            println!("  {}", "All measurements within plausible ranges".green());
        }
    }

    Ok(())
}
