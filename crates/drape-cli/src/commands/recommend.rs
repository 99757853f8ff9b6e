//! drape recommend command - pick the best size from a chart.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use drape_core::{BodyMeasurements, SizeChart, recommend_size};

use crate::commands::load_json;
use crate::{Cli, OutputFormat, output};

pub fn run(measurements: &Path, chart: &Path, cli: &Cli) -> Result<()> {
    let body: BodyMeasurements = load_json(measurements, "body measurements")?;
    let chart: SizeChart = load_json(chart, "size chart")?;

    let recommendation = recommend_size(&body, &chart)?;

    match cli.format {
        OutputFormat::Json => {
            output::print(&recommendation, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Size Recommendation".bold().underline());
                println!(
                    "  {}: {} (score {}, {})",
                    "Best size".cyan(),
                    recommendation.best.size.green().bold(),
                    recommendation.best.score,
                    recommendation.best.report.overall
                );
                println!(
                    "  {}: {}",
                    "Why".cyan(),
                    recommendation.best.report.recommendation
                );

                if !recommendation.alternatives.is_empty() {
                    println!("  {}:", "Alternatives".cyan());
                    for alt in &recommendation.alternatives {
                        println!(
                            "    {} (score {}, {})",
                            alt.size,
                            alt.score,
                            alt.report.overall
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
