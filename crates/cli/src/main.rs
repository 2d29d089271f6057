//! Counsel CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize the config directory
//! - `ask`     — Accumulate data and request an advisory interpretation
//! - `models`  — List models available on the Ollama server
//! - `doctor`  — Diagnose configuration and server health

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "counsel",
    about = "Counsel — local-first AI policy advisory CLI",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Accumulate data files and stream an advisory interpretation
    Ask {
        /// Data files to include (.csv, .tsv, .md, .txt)
        files: Vec<PathBuf>,

        /// Advisory brief TOML file (data_background, policy_question, model)
        #[arg(short, long)]
        brief: Option<PathBuf>,

        /// Override the brief's data background
        #[arg(long)]
        background: Option<String>,

        /// Override the brief's policy question
        #[arg(long)]
        question: Option<String>,

        /// Override the model to consult
        #[arg(short, long)]
        model: Option<String>,

        /// Free text to append to the prompt (repeatable)
        #[arg(short, long)]
        text: Vec<String>,

        /// Where to write the persisted result
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List models available on the Ollama server
    Models,

    /// Diagnose configuration and server health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Ask {
            files,
            brief,
            background,
            question,
            model,
            text,
            output,
        } => {
            commands::ask::run(commands::ask::AskArgs {
                files,
                brief,
                background,
                question,
                model,
                text,
                output,
            })
            .await?
        }
        Commands::Models => commands::models::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
