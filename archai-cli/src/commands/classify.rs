//! Classify command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use archai_core::{PredictionResult, PredictionService};
use colored::Colorize;
use serde::Serialize;
use tracing::info;

use crate::utils::{load_catalog, load_gateway, read_input};

/// Arguments of the classify command.
pub struct ClassifyArgs {
    pub file: PathBuf,
    pub top: usize,
    pub json: bool,
    pub mock: bool,
    pub model: PathBuf,
    pub labels: Option<PathBuf>,
    pub quiet: bool,
}

/// JSON report for one classified file.
#[derive(Serialize)]
struct ClassifyReport<'a> {
    file: String,
    classifier: String,
    prediction: &'a PredictionResult,
    #[serde(skip_serializing_if = "<[PredictionResult]>::is_empty")]
    alternatives: &'a [PredictionResult],
}

/// Execute the classify command.
pub fn execute(args: ClassifyArgs) -> Result<()> {
    let bytes = read_input(&args.file)?;

    let catalog = load_catalog(args.labels.as_deref())?;
    let gateway = load_gateway(&args.model, &catalog, args.mock)?;
    let service = PredictionService::new(gateway, catalog);

    let top = args.top.min(service.catalog().len());
    let ranked = service
        .classify_top_k(&bytes, top)
        .with_context(|| format!("Failed to classify {}", args.file.display()))?;
    let (best, rest) = ranked
        .split_first()
        .context("Classifier returned no ranked styles")?;

    info!(
        path = %args.file.display(),
        style = best.style.name,
        confidence = best.confidence,
        "Classified file"
    );

    if args.json {
        let report = ClassifyReport {
            file: args.file.display().to_string(),
            classifier: service.gateway().describe(),
            prediction: best,
            alternatives: rest,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if args.quiet {
        println!("{}", best.style.name);
    } else {
        print_result(best, rest);
    }

    Ok(())
}

fn print_result(best: &PredictionResult, rest: &[PredictionResult]) {
    let text = best.render();
    let mut lines = text.lines();

    // Headline in bold, details as rendered
    if let Some(headline) = lines.next() {
        println!();
        println!("{}", headline.green().bold());
    }
    for line in lines {
        println!("{}", line);
    }

    if !rest.is_empty() {
        println!();
        println!("{}", "Otras posibilidades:".dimmed());
        for (rank, alt) in rest.iter().enumerate() {
            println!(
                "   {}. {} {}",
                rank + 2,
                alt.style.name,
                format!("({})", alt.confidence_percent()).dimmed()
            );
        }
    }
}
