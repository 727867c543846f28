//! Styles command implementation.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::utils::load_catalog;

/// List the catalog in classifier output order.
pub fn execute(labels: Option<&Path>, json: bool, quiet: bool) -> Result<()> {
    let catalog = load_catalog(labels)?;

    if json {
        let records: Vec<_> = catalog.iter().collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for (index, style) in catalog.iter().enumerate() {
        if quiet {
            println!("{}", style.name);
        } else {
            println!(
                "{:>3}  {}  {}",
                index,
                style.name.bold(),
                style.era.dimmed()
            );
        }
    }
    Ok(())
}
