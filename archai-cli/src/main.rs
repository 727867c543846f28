//! ArchAI CLI - Architectural style classification from the command line.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

use exit_codes::ExitCode;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error
  65  Invalid or unreadable image data
  66  Input file not found or unreadable
  69  Model unavailable or inference failed
  74  Feedback log could not be written
  78  Model and style catalog do not match";

#[derive(Parser)]
#[command(name = "archai")]
#[command(author, version, about = "Architectural style classification", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// Show debug logs on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Print only the essential result
    #[arg(short, long, global = true)]
    quiet: bool,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// ONNX model file
    #[arg(long, global = true, env = "MODEL_PATH", default_value = "ArchiNet.onnx")]
    model: PathBuf,

    /// Label index file listing styles in classifier output order
    #[arg(long, global = true, env = "LABELS_PATH")]
    labels: Option<PathBuf>,

    /// Feedback log file
    #[arg(
        long,
        global = true,
        env = "FEEDBACK_LOG_PATH",
        default_value = "feedback_log.txt"
    )]
    feedback_log: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the architectural style of a photograph
    Classify {
        /// Path to the image file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of ranked styles to show
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
        top: u16,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Use the deterministic mock classifier instead of the model (for testing)
        #[arg(long)]
        mock: bool,
    },

    /// Record or summarize feedback on predictions
    Feedback {
        #[command(subcommand)]
        action: FeedbackAction,
    },

    /// List the styles the classifier can predict
    Styles {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum FeedbackAction {
    /// The last prediction was correct
    Correct,
    /// The last prediction was incorrect
    Incorrect,
    /// Summarize the feedback log
    Stats {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {}
    }

    init_tracing(cli.verbose, matches!(cli.color, ColorChoice::Never));

    let quiet = cli.quiet;
    if let Err(err) = run(cli) {
        let exit = ExitCode::from_anyhow(&err);
        if let Some(message) = &exit.message {
            eprintln!("{} {}", "error:".red().bold(), message);
        }
        if let (Some(hint), false) = (exit.user_message, quiet) {
            eprintln!("{}", hint.yellow());
        }
        std::process::exit(exit.code);
    }
}

fn init_tracing(verbose: bool, no_color: bool) {
    let default_filter = if verbose { "archai=debug,archai_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(verbose)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        quiet,
        model,
        labels,
        feedback_log,
        command,
        ..
    } = cli;

    match command {
        Commands::Classify {
            file,
            top,
            json,
            mock,
        } => commands::classify::execute(commands::classify::ClassifyArgs {
            file,
            top: usize::from(top),
            json,
            mock,
            model,
            labels,
            quiet,
        }),
        Commands::Feedback { action } => match action {
            FeedbackAction::Correct => {
                commands::feedback::record(&feedback_log, archai_core::Verdict::Correct, quiet)
            }
            FeedbackAction::Incorrect => {
                commands::feedback::record(&feedback_log, archai_core::Verdict::Incorrect, quiet)
            }
            FeedbackAction::Stats { json } => commands::feedback::stats(&feedback_log, json, quiet),
        },
        Commands::Styles { json } => commands::styles::execute(labels.as_deref(), json, quiet),
    }
}
