//! Command implementations.

pub mod analyze;
pub mod fit;
pub mod info;
pub mod measure;
pub mod recommend;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Load a JSON record from a file.
pub fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} from {:?}", what, path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} from {:?}", what, path))
}
