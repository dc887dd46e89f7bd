//! Mask CLI command.

// Allow print_stdout in CLI module (consistent with main.rs)
#![allow(clippy::print_stdout)]

use super::{build_masker, read_text};
use crate::config::{RecognizerProvider, TriageConfig};
use anyhow::Context;
use serde_json::json;

/// Masks `text` (or stdin) and prints the masked text and entities as JSON.
///
/// # Errors
///
/// Returns an error if input cannot be read or masking fails.
pub fn cmd_mask(config: &TriageConfig, text: Option<String>, no_recognizer: bool) -> anyhow::Result<()> {
    let text = read_text(text).context("failed to read input text")?;

    let config = if no_recognizer {
        config.clone().with_recognizer_provider(RecognizerProvider::None)
    } else {
        config.clone()
    };
    let masker = build_masker(&config);
    let outcome = masker
        .mask(&text)
        .with_context(|| format!("masking failed (recognizer: {})", masker.recognizer_name()))?;

    let output = json!({
        "masked_email": outcome.masked_text,
        "list_of_masked_entities": outcome.entities,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
