//! Output helpers shared by all commands.

use serde::Serialize;

use crate::OutputFormat;

/// Print a serializable value in the requested format.
///
/// JSON output goes to stdout even in quiet mode so scripts can consume it.
pub fn print<T: Serialize>(value: &T, format: OutputFormat, quiet: bool) {
    match format {
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
        OutputFormat::Text => {
            if !quiet {
                if let Ok(json) = serde_json::to_string_pretty(value) {
                    println!("{}", json);
                }
            }
        }
    }
}
