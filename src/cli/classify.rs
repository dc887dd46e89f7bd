//! Classify CLI command.

// Allow print_stdout in CLI module (consistent with main.rs)
#![allow(clippy::print_stdout)]

use super::{build_triage_service, read_text};
use crate::config::TriageConfig;
use anyhow::Context;

/// Masks and classifies `text` (or stdin), printing the full record as JSON.
///
/// # Errors
///
/// Returns an error if input cannot be read, the pipeline cannot be built,
/// or either model boundary fails.
pub fn cmd_classify(config: &TriageConfig, text: Option<String>) -> anyhow::Result<()> {
    let text = read_text(text).context("failed to read input text")?;
    let service = build_triage_service(config).context("failed to build triage pipeline")?;

    let record = service.triage(&text).context("classification failed")?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}
