//! Binary entry point for email-triage.
//!
//! This binary provides the CLI interface for PII masking and email
//! classification.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use email_triage::cli;
use email_triage::config::TriageConfig;
use email_triage::observability::{self, InitOptions};
use std::path::PathBuf;
use std::process::ExitCode;

/// Email triage - PII masking and category classification for support email.
#[derive(Parser)]
#[command(name = "email-triage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "EMAIL_TRIAGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP classification service.
    Serve {
        /// Bind host (overrides configuration).
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides configuration).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Mask PII in a text and print the entities.
    Mask {
        /// Text to mask; read from stdin when omitted.
        text: Option<String>,

        /// Use pattern rules only.
        #[arg(long)]
        no_recognizer: bool,
    },

    /// Mask and classify a text.
    Classify {
        /// Email body; read from stdin when omitted.
        text: Option<String>,
    },

    /// Show the effective configuration.
    Config,

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    // A missing .env file is the common case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            "email-triage",
            &mut std::io::stdout(),
        );
        return ExitCode::SUCCESS;
    }

    let config = match TriageConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let expose_metrics = matches!(cli.command, Commands::Serve { .. });
    if let Err(e) = observability::init_from_config(
        &config.observability,
        InitOptions {
            verbose: cli.verbose,
            metrics_expose: expose_metrics,
        },
    ) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: &TriageConfig) -> anyhow::Result<()> {
    match command {
        Commands::Serve { host, port } => cli::cmd_serve(config, host, port),
        Commands::Mask {
            text,
            no_recognizer,
        } => cli::cmd_mask(config, text, no_recognizer),
        Commands::Classify { text } => cli::cmd_classify(config, text),
        Commands::Config => {
            cli::cmd_config(config);
            Ok(())
        },
        Commands::Completions { .. } => Ok(()),
    }
}
