//! drape analyze command - fit analysis from measurement records.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use drape_core::{BodyMeasurements, FitMetric, FitStatus, GarmentMeasurements, analyze_fit};

use crate::commands::load_json;
use crate::{Cli, OutputFormat, output};

fn status_colored(status: FitStatus) -> colored::ColoredString {
    match status {
        FitStatus::Perfect => status.as_str().green(),
        FitStatus::Tight | FitStatus::Loose => status.as_str().yellow(),
        FitStatus::TooTight | FitStatus::TooLoose => status.as_str().red(),
    }
}

fn print_metric(name: &str, metric: &FitMetric) {
    println!(
        "  {}: {:.1} cm vs {:.1} cm ({:+.1}%, {})",
        name.cyan(),
        metric.garment_value,
        metric.body_value,
        metric.percentage_difference,
        status_colored(metric.status)
    );
}

pub fn run(measurements: &Path, garment: &Path, cli: &Cli) -> Result<()> {
    let body: BodyMeasurements = load_json(measurements, "body measurements")?;
    let garment: GarmentMeasurements = load_json(garment, "garment measurements")?;

    let report = analyze_fit(&body, &garment)?;

    match cli.format {
        OutputFormat::Json => {
            output::print(&report, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Fit Analysis".bold().underline());
                print_metric("Chest", &report.chest);
                if let Some(ref waist) = report.waist {
                    print_metric("Waist", waist);
                }
                if let Some(ref shoulder) = report.shoulder {
                    print_metric("Shoulders", shoulder);
                }
                if let Some(ref length) = report.length {
                    print_metric("Length", length);
                }
                println!("  {}: {}", "Overall".cyan(), status_colored(report.overall));
                println!("  {}: {}", "Recommendation".cyan(), report.recommendation);
            }
        }
    }

    Ok(())
}
