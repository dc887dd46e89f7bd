//! Serve CLI command.

use crate::config::TriageConfig;

/// Runs the HTTP service until Ctrl-C.
///
/// `host` and `port` override the configured bind address.
///
/// # Errors
///
/// Returns an error if the pipeline cannot be built or the server fails.
#[cfg(feature = "http")]
pub fn cmd_serve(
    config: &TriageConfig,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    use anyhow::Context;
    use std::sync::Arc;

    let mut config = config.clone();
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    let service = Arc::new(
        super::build_triage_service(&config).context("failed to build triage pipeline")?,
    );
    crate::server::run(&config.server, &service)?;

    Ok(())
}

/// Runs the HTTP service (feature not enabled).
///
/// # Errors
///
/// Always returns [`crate::Error::FeatureNotEnabled`].
#[cfg(not(feature = "http"))]
pub fn cmd_serve(
    _config: &TriageConfig,
    _host: Option<String>,
    _port: Option<u16>,
) -> anyhow::Result<()> {
    Err(crate::Error::FeatureNotEnabled("http".to_string()).into())
}
