//! Feedback command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use archai_core::{FeedbackRecorder, FeedbackSummary, Verdict};
use colored::Colorize;

use crate::utils::format_percent;

/// Append one verdict to the feedback log.
pub fn record(log: &Path, verdict: Verdict, quiet: bool) -> Result<()> {
    let recorder = FeedbackRecorder::new(log);
    let entry = recorder
        .record(verdict)
        .with_context(|| format!("Failed to write feedback log: {}", log.display()))?;

    if !quiet {
        println!("{}", verdict.confirmation().green());
        println!("   {} {}", "Registrado:".dimmed(), entry.timestamp);
    }
    Ok(())
}

/// Summarize the feedback log.
pub fn stats(log: &Path, json: bool, quiet: bool) -> Result<()> {
    let summary = FeedbackSummary::from_log(log)
        .with_context(|| format!("Failed to read feedback log: {}", log.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let accuracy = summary
        .accuracy()
        .map(format_percent)
        .unwrap_or_else(|| "-".to_string());

    if quiet {
        println!("{} {} {}", summary.correct, summary.incorrect, accuracy);
        return Ok(());
    }

    println!();
    println!("{}", "Retroalimentación registrada".bold());
    println!("   {} {}", "Correctas:".dimmed(), summary.correct.to_string().green());
    println!("   {} {}", "Incorrectas:".dimmed(), summary.incorrect.to_string().red());
    println!("   {} {}", "Total:".dimmed(), summary.total());
    println!("   {} {}", "Precisión:".dimmed(), accuracy);
    if summary.unreadable > 0 {
        println!(
            "   {} {}",
            "Líneas ilegibles:".dimmed(),
            summary.unreadable.to_string().yellow()
        );
    }
    Ok(())
}
