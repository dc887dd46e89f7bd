//! Config CLI command.

// Allow print_stdout in CLI module (consistent with main.rs)
#![allow(clippy::print_stdout)]

use crate::config::TriageConfig;

/// Prints the effective configuration. The API token is never shown.
pub fn cmd_config(config: &TriageConfig) {
    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("Server:");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!();
    println!("Recognizer:");
    println!("  Provider: {}", config.recognizer.provider.as_str());
    println!("  Endpoint: {}", config.recognizer.endpoint);
    println!("  Timeout: {} ms", config.recognizer.http.timeout_ms);
    println!();
    println!("Classifier:");
    println!(
        "  Endpoint: {}",
        config.classifier.endpoint.as_deref().unwrap_or("(not configured)")
    );
    println!("  Labels: {}", config.classifier.labels_path.display());
    println!("  Max Tokens: {}", config.classifier.max_tokens);
    println!("  Timeout: {} ms", config.classifier.http.timeout_ms);
    println!();
    println!("Observability:");
    println!("  Log Level: {}", config.observability.log_level);
    println!("  Log Format: {}", config.observability.log_format);
    println!(
        "  Log File: {}",
        config
            .observability
            .log_file
            .as_ref()
            .map_or_else(|| "(stderr)".to_string(), |p| p.display().to_string())
    );
    println!(
        "  Metrics: {}",
        if config.observability.metrics_enabled {
            format!("enabled on port {}", config.observability.metrics_port)
        } else {
            "disabled".to_string()
        }
    );
    println!();
    println!(
        "API Token: {}",
        if config.api_token.is_some() { "set" } else { "not set" }
    );

    let paths = TriageConfig::default_path();
    if !paths.is_empty() {
        println!();
        println!("Config search path:");
        for path in paths {
            let marker = if path.exists() { "found" } else { "missing" };
            println!("  {} ({marker})", path.display());
        }
    }
}
