//! Configuration management.
//!
//! Settings come from, in increasing precedence: built-in defaults, a TOML
//! file, and environment variables. The file is either given explicitly or
//! looked up in the platform config directory.

use crate::classifier::DEFAULT_MAX_TOKENS;
use crate::http_client::InferenceHttpConfig;
use crate::{Error, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default token-classification endpoint for the recognizer.
pub const DEFAULT_RECOGNIZER_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/dslim/bert-base-NER";

/// Main configuration.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Entity recognizer settings.
    pub recognizer: RecognizerSettings,
    /// Category classifier settings.
    pub classifier: ClassifierSettings,
    /// Logging and metrics settings.
    pub observability: ObservabilitySettings,
    /// Bearer token for the inference endpoints.
    pub api_token: Option<SecretString>,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
        }
    }
}

/// Available recognizer providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecognizerProvider {
    /// Hosted token-classification endpoint.
    #[default]
    Remote,
    /// No recognizer; pattern rules only.
    None,
}

impl RecognizerProvider {
    /// Parses a provider string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" | "off" | "patterns" => Self::None,
            _ => Self::Remote,
        }
    }

    /// Returns the provider name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::None => "none",
        }
    }
}

/// Entity recognizer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizerSettings {
    /// Which recognizer to use.
    pub provider: RecognizerProvider,
    /// Endpoint URL.
    pub endpoint: String,
    /// HTTP timeouts.
    pub http: InferenceHttpConfig,
}

impl Default for RecognizerSettings {
    fn default() -> Self {
        Self {
            provider: RecognizerProvider::Remote,
            endpoint: DEFAULT_RECOGNIZER_ENDPOINT.to_string(),
            http: InferenceHttpConfig::default(),
        }
    }
}

/// Category classifier settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierSettings {
    /// Endpoint URL. Required for classification.
    pub endpoint: Option<String>,
    /// Path of the JSON label table.
    pub labels_path: PathBuf,
    /// Maximum token length fed to the model.
    pub max_tokens: usize,
    /// HTTP timeouts.
    pub http: InferenceHttpConfig,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            labels_path: PathBuf::from("assets/labels.json"),
            max_tokens: DEFAULT_MAX_TOKENS,
            http: InferenceHttpConfig::default(),
        }
    }
}

/// Logging and metrics settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilitySettings {
    /// Log filter directive (for example `info` or `email_triage=debug`).
    pub log_level: String,
    /// Log format: `pretty` or `json`.
    pub log_format: String,
    /// Optional log file; logs go to stderr when absent.
    pub log_file: Option<PathBuf>,
    /// Whether the Prometheus recorder is installed.
    pub metrics_enabled: bool,
    /// Prometheus listener port.
    pub metrics_port: u16,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            log_file: None,
            metrics_enabled: false,
            metrics_port: 9090,
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Server section.
    pub server: Option<ConfigFileServer>,
    /// Recognizer section.
    pub recognizer: Option<ConfigFileRecognizer>,
    /// Classifier section.
    pub classifier: Option<ConfigFileClassifier>,
    /// Observability section.
    pub observability: Option<ConfigFileObservability>,
}

/// Server section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileServer {
    /// Bind host.
    pub host: Option<String>,
    /// Bind port.
    pub port: Option<u16>,
}

/// Recognizer section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileRecognizer {
    /// Provider name.
    pub provider: Option<String>,
    /// Endpoint URL.
    pub endpoint: Option<String>,
    /// Request timeout.
    pub timeout_ms: Option<u64>,
    /// Connect timeout.
    pub connect_timeout_ms: Option<u64>,
}

/// Classifier section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileClassifier {
    /// Endpoint URL.
    pub endpoint: Option<String>,
    /// Label table path.
    pub labels_path: Option<String>,
    /// Maximum token length.
    pub max_tokens: Option<usize>,
    /// Request timeout.
    pub timeout_ms: Option<u64>,
    /// Connect timeout.
    pub connect_timeout_ms: Option<u64>,
}

/// Observability section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileObservability {
    /// Log filter directive.
    pub log_level: Option<String>,
    /// Log format.
    pub log_format: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
    /// Metrics toggle.
    pub metrics_enabled: Option<bool>,
    /// Metrics port.
    pub metrics_port: Option<u16>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            recognizer: RecognizerSettings::default(),
            classifier: ClassifierSettings::default(),
            observability: ObservabilitySettings::default(),
            api_token: None,
        }
    }
}

impl TriageConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration for the process.
    ///
    /// Reads `path` when given, otherwise the default location, then applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `path` cannot be read or parsed, or an
    /// environment override is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default(),
        };
        config.with_env_overrides()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration file.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks `<config_dir>/email-triage/config.toml`, then
    /// `~/.config/email-triage/config.toml`. Returns defaults if neither
    /// exists or parses.
    #[must_use]
    pub fn load_default() -> Self {
        Self::default_path()
            .into_iter()
            .find(|path| path.exists())
            .and_then(|path| match Self::load_from_file(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                    None
                },
            })
            .unwrap_or_default()
    }

    /// Candidate default config file paths, in lookup order.
    #[must_use]
    pub fn default_path() -> Vec<PathBuf> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Vec::new();
        };

        let platform_config = base_dirs
            .config_dir()
            .join("email-triage")
            .join("config.toml");
        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("email-triage")
            .join("config.toml");

        if platform_config == xdg_config {
            vec![platform_config]
        } else {
            vec![platform_config, xdg_config]
        }
    }

    /// Converts a `ConfigFile` to `TriageConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(server) = file.server {
            if let Some(host) = server.host {
                config.server.host = host;
            }
            if let Some(port) = server.port {
                config.server.port = port;
            }
        }
        if let Some(recognizer) = file.recognizer {
            if let Some(provider) = recognizer.provider {
                config.recognizer.provider = RecognizerProvider::parse(&provider);
            }
            if let Some(endpoint) = recognizer.endpoint {
                config.recognizer.endpoint = endpoint;
            }
            if let Some(v) = recognizer.timeout_ms {
                config.recognizer.http.timeout_ms = v;
            }
            if let Some(v) = recognizer.connect_timeout_ms {
                config.recognizer.http.connect_timeout_ms = v;
            }
        }
        if let Some(classifier) = file.classifier {
            config.classifier.endpoint = classifier.endpoint;
            if let Some(path) = classifier.labels_path {
                config.classifier.labels_path = PathBuf::from(path);
            }
            if let Some(v) = classifier.max_tokens {
                config.classifier.max_tokens = v;
            }
            if let Some(v) = classifier.timeout_ms {
                config.classifier.http.timeout_ms = v;
            }
            if let Some(v) = classifier.connect_timeout_ms {
                config.classifier.http.connect_timeout_ms = v;
            }
        }
        if let Some(observability) = file.observability {
            if let Some(v) = observability.log_level {
                config.observability.log_level = v;
            }
            if let Some(v) = observability.log_format {
                config.observability.log_format = v;
            }
            config.observability.log_file = observability.log_file.map(PathBuf::from);
            if let Some(v) = observability.metrics_enabled {
                config.observability.metrics_enabled = v;
            }
            if let Some(v) = observability.metrics_port {
                config.observability.metrics_port = v;
            }
        }

        config
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a numeric variable does not parse.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    ///
    /// Empty values are ignored. `EMAIL_TRIAGE_PORT` takes precedence over
    /// `PORT`, and `EMAIL_TRIAGE_API_TOKEN` over `HF_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a numeric variable does not parse.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(host) = get("EMAIL_TRIAGE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("EMAIL_TRIAGE_PORT").or_else(|| get("PORT")) {
            self.server.port = parse_number("port", &port)?;
        }

        if let Some(provider) = get("EMAIL_TRIAGE_RECOGNIZER_PROVIDER") {
            self.recognizer.provider = RecognizerProvider::parse(&provider);
        }
        if let Some(endpoint) = get("EMAIL_TRIAGE_RECOGNIZER_URL") {
            self.recognizer.endpoint = endpoint;
        }
        if let Some(endpoint) = get("EMAIL_TRIAGE_CLASSIFIER_URL") {
            self.classifier.endpoint = Some(endpoint);
        }
        if let Some(path) = get("EMAIL_TRIAGE_LABELS_PATH") {
            self.classifier.labels_path = PathBuf::from(path);
        }
        if let Some(max_tokens) = get("EMAIL_TRIAGE_MAX_TOKENS") {
            self.classifier.max_tokens = parse_number("max_tokens", &max_tokens)?;
        }
        if let Some(timeout) = get("EMAIL_TRIAGE_HTTP_TIMEOUT_MS") {
            let timeout = parse_number("timeout_ms", &timeout)?;
            self.recognizer.http.timeout_ms = timeout;
            self.classifier.http.timeout_ms = timeout;
        }
        if let Some(timeout) = get("EMAIL_TRIAGE_HTTP_CONNECT_TIMEOUT_MS") {
            let timeout = parse_number("connect_timeout_ms", &timeout)?;
            self.recognizer.http.connect_timeout_ms = timeout;
            self.classifier.http.connect_timeout_ms = timeout;
        }

        if let Some(level) = get("EMAIL_TRIAGE_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = get("EMAIL_TRIAGE_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Some(file) = get("EMAIL_TRIAGE_LOG_FILE") {
            self.observability.log_file = Some(PathBuf::from(file));
        }
        if let Some(enabled) = get("EMAIL_TRIAGE_METRICS_ENABLED") {
            self.observability.metrics_enabled = parse_bool(&enabled);
        }
        if let Some(port) = get("EMAIL_TRIAGE_METRICS_PORT") {
            self.observability.metrics_port = parse_number("metrics_port", &port)?;
        }

        if let Some(token) = get("EMAIL_TRIAGE_API_TOKEN").or_else(|| get("HF_TOKEN")) {
            self.api_token = Some(SecretString::from(token));
        }

        Ok(self)
    }

    /// Sets the server host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.server.host = host.into();
        self
    }

    /// Sets the server port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Sets the recognizer provider.
    #[must_use]
    pub const fn with_recognizer_provider(mut self, provider: RecognizerProvider) -> Self {
        self.recognizer.provider = provider;
        self
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{name} must be a number, got '{value}'")))
}

fn parse_bool(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}
