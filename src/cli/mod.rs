//! CLI command implementations.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run the HTTP classification service |
//! | `mask` | Mask PII in a text and print the entities |
//! | `classify` | Mask and classify a text, printing the full record |
//! | `config` | Show the effective configuration |
//! | `completions` | Generate shell completions |
//!
//! # Example Usage
//!
//! ```bash
//! # Mask with pattern rules only
//! echo "Call me at 9876543210" | email-triage mask --no-recognizer
//!
//! # Serve on a custom port
//! email-triage serve --port 8080
//! ```

mod classify;
mod config;
mod factory;
mod mask;
mod serve;

pub use classify::cmd_classify;
pub use config::cmd_config;
pub use factory::{build_classifier, build_masker, build_recognizer, build_triage_service};
pub use mask::cmd_mask;
pub use serve::cmd_serve;

use std::io::Read;

/// Returns `text`, or all of stdin when absent.
///
/// Trailing line breaks from piped input are dropped.
///
/// # Errors
///
/// Returns an error if stdin cannot be read.
pub fn read_text(text: Option<String>) -> std::io::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    let trimmed = buffer.trim_end_matches(['\r', '\n']).len();
    buffer.truncate(trimmed);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_text_prefers_argument() {
        assert_eq!(read_text(Some("hello\n".to_string())).unwrap(), "hello\n");
    }
}
