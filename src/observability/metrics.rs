//! Prometheus metrics.

use crate::config::ObservabilitySettings;
use crate::{Error, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::thread;

/// Metrics configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether metrics are enabled.
    pub enabled: bool,
    /// Address to bind the metrics exporter.
    pub listen_addr: SocketAddr,
}

impl MetricsConfig {
    /// Builds metrics configuration from settings.
    #[must_use]
    pub const fn from_settings(settings: &ObservabilitySettings) -> Self {
        Self {
            enabled: settings.metrics_enabled,
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), settings.metrics_port),
        }
    }
}

/// Installs the Prometheus recorder and its scrape listener.
///
/// Only long-running processes (`expose`) install anything; a one-shot
/// command has nobody to scrape it. Returns whether a recorder was installed.
/// Without one, every metric call is a no-op.
pub fn install_prometheus(config: &MetricsConfig, expose: bool) -> Result<bool> {
    if !config.enabled || !expose {
        return Ok(false);
    }

    install_listener(PrometheusBuilder::new().with_http_listener(config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "Serving Prometheus metrics");

    Ok(true)
}

/// Installs the recorder and spawns the scrape listener.
///
/// Uses the current runtime when there is one, otherwise parks a
/// single-threaded runtime on a dedicated thread.
fn install_listener(builder: PrometheusBuilder) -> Result<()> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        return install_with_runtime(builder, &handle);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::OperationFailed {
            operation: "metrics_runtime_init".to_string(),
            cause: e.to_string(),
        })?;
    install_with_runtime(builder, runtime.handle())?;
    thread::Builder::new()
        .name("prometheus-listener".to_string())
        .spawn(move || runtime.block_on(std::future::pending::<()>()))
        .map_err(|e| Error::OperationFailed {
            operation: "metrics_runtime_thread".to_string(),
            cause: e.to_string(),
        })?;

    Ok(())
}

fn install_with_runtime(
    builder: PrometheusBuilder,
    runtime: &tokio::runtime::Handle,
) -> Result<()> {
    let (recorder, exporter) = {
        let _guard = runtime.enter();
        builder.build().map_err(install_error)?
    };
    ::metrics::set_global_recorder(recorder).map_err(|e| Error::OperationFailed {
        operation: "metrics_recorder_install".to_string(),
        cause: e.to_string(),
    })?;
    runtime.spawn(exporter);

    Ok(())
}

#[allow(clippy::needless_pass_by_value)]
fn install_error(e: metrics_exporter_prometheus::BuildError) -> Error {
    Error::OperationFailed {
        operation: "metrics_recorder_install".to_string(),
        cause: e.to_string(),
    }
}
