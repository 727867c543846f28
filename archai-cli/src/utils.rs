//! Common utility functions shared across CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use archai_core::{ClassifierGateway, StyleCatalog};
use tracing::{debug, warn};

/// Read an input file into memory.
pub fn read_input(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read file");
    Ok(bytes)
}

/// The style catalog, in label file order when one is given.
pub fn load_catalog(labels: Option<&Path>) -> Result<StyleCatalog> {
    match labels {
        Some(path) => StyleCatalog::load_label_file(path)
            .with_context(|| format!("Failed to load label index: {}", path.display())),
        None => Ok(StyleCatalog::builtin()),
    }
}

/// The classifier to score with: the ONNX model, or the mock when asked.
pub fn load_gateway(model: &Path, catalog: &StyleCatalog, mock: bool) -> Result<ClassifierGateway> {
    if mock {
        warn!("Using the MOCK classifier (predictions are not meaningful)");
        return Ok(ClassifierGateway::mock(catalog));
    }
    ClassifierGateway::load_onnx(model, catalog)
        .with_context(|| format!("Failed to load model: {}", model.display()))
}

/// Format a ratio in [0, 1] as a percentage with two decimals.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}
