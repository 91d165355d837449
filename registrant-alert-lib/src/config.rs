//! Configuration file parsing and management.
//!
//! This module handles loading client settings from TOML files and
//! `REGISTRANT_ALERT_*` environment variables, and merging them with proper
//! precedence rules.

use crate::client::ClientParams;
use crate::error::RegistrantAlertError;
use crate::options::SearchOption;
use crate::transport::HttpTransport;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Connection settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientConfig>,

    /// Defaults applied to every search before caller options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchDefaults>,
}

/// Connection settings for the API client.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ClientConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Endpoint override, e.g. a staging server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// HTTP timeout (as string, e.g., "30s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

/// Default search parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SearchDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punycode: Option<bool>,

    /// `json` or `xml`; only honored by raw data calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
}

impl FileConfig {
    /// The configured API key, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.client.as_ref().and_then(|c| c.api_key.as_deref())
    }

    /// Build client parameters from this configuration.
    ///
    /// A configured timeout becomes the timeout of a freshly built HTTP client.
    pub fn client_params(&self) -> Result<ClientParams, RegistrantAlertError> {
        let mut params = ClientParams::default();
        let Some(client) = &self.client else {
            return Ok(params);
        };

        if let Some(base_url) = &client.base_url {
            params.base_url = Some(parse_base_url(base_url)?);
        }

        if let Some(timeout) = &client.timeout {
            let seconds = parse_timeout_string(timeout).ok_or_else(|| {
                RegistrantAlertError::config(format!("Invalid timeout format '{}'", timeout))
            })?;
            params.http_client = Some(HttpTransport::default_http_client(Some(
                Duration::from_secs(seconds),
            ))?);
        }

        Ok(params)
    }

    /// Search options implied by the `[search]` section.
    pub fn search_options(&self) -> Vec<SearchOption> {
        let mut opts = Vec::new();
        if let Some(search) = &self.search {
            if let Some(punycode) = search.punycode {
                opts.push(SearchOption::Punycode(punycode));
            }
            if let Some(format) = &search.response_format {
                opts.push(SearchOption::response_format(format.as_str()));
            }
        }
        opts
    }

    /// Overlay environment settings on top of this configuration.
    pub fn with_env(mut self, env_config: &EnvConfig) -> Self {
        let client = self.client.get_or_insert_with(ClientConfig::default);
        if env_config.api_key.is_some() {
            client.api_key = env_config.api_key.clone();
        }
        if env_config.base_url.is_some() {
            client.base_url = env_config.base_url.clone();
        }
        if env_config.timeout.is_some() {
            client.timeout = env_config.timeout.clone();
        }

        let search = self.search.get_or_insert_with(SearchDefaults::default);
        if env_config.punycode.is_some() {
            search.punycode = env_config.punycode;
        }
        if env_config.response_format.is_some() {
            search.response_format = env_config.response_format.clone();
        }
        self
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to report which config files were used
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, RegistrantAlertError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| {
            RegistrantAlertError::config(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            RegistrantAlertError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config < `~/.registrant-alert.toml` < `./registrant-alert.toml`.
    pub fn discover_and_load(&self) -> Result<FileConfig, RegistrantAlertError> {
        let mut merged_config = FileConfig::default();
        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            let config = self.load_file(&path)?;
            if self.verbose {
                tracing::info!(path = %path.display(), "loaded configuration file");
            }
            merged_config = self.merge_configs(merged_config, config);
        }

        Ok(merged_config)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["./registrant-alert.toml", "./.registrant-alert.toml"]
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        [".registrant-alert.toml", "registrant-alert.toml"]
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("registrant-alert").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations. Values from `higher` win field by field.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            client: match (lower.client, higher.client) {
                (Some(lower_client), Some(higher_client)) => Some(ClientConfig {
                    api_key: higher_client.api_key.or(lower_client.api_key),
                    base_url: higher_client.base_url.or(lower_client.base_url),
                    timeout: higher_client.timeout.or(lower_client.timeout),
                }),
                (lower_client, higher_client) => higher_client.or(lower_client),
            },
            search: match (lower.search, higher.search) {
                (Some(lower_search), Some(higher_search)) => Some(SearchDefaults {
                    punycode: higher_search.punycode.or(lower_search.punycode),
                    response_format: higher_search
                        .response_format
                        .or(lower_search.response_format),
                }),
                (lower_search, higher_search) => higher_search.or(lower_search),
            },
        }
    }

    fn validate_config(&self, config: &FileConfig) -> Result<(), RegistrantAlertError> {
        if let Some(client) = &config.client {
            if let Some(timeout) = &client.timeout {
                if parse_timeout_string(timeout).is_none() {
                    return Err(RegistrantAlertError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout
                    )));
                }
            }

            if let Some(base_url) = &client.base_url {
                parse_base_url(base_url)?;
            }
        }

        if let Some(search) = &config.search {
            if let Some(format) = &search.response_format {
                if !is_known_format(format) {
                    return Err(RegistrantAlertError::config(format!(
                        "Invalid response format '{}'. Use 'json' or 'xml'",
                        format
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Settings read from `REGISTRANT_ALERT_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Option<String>,
    pub punycode: Option<bool>,
    pub response_format: Option<String>,
}

/// Load configuration from environment variables.
///
/// Invalid values are reported with a warning and ignored.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|name| env::var(name).ok())
}

fn env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    if let Some(api_key) = lookup("REGISTRANT_ALERT_API_KEY") {
        if !api_key.trim().is_empty() {
            env_config.api_key = Some(api_key.trim().to_string());
        }
    }

    if let Some(base_url) = lookup("REGISTRANT_ALERT_BASE_URL") {
        match parse_base_url(&base_url) {
            Ok(_) => env_config.base_url = Some(base_url),
            Err(_) => tracing::warn!(value = %base_url, "ignoring invalid REGISTRANT_ALERT_BASE_URL"),
        }
    }

    if let Some(timeout) = lookup("REGISTRANT_ALERT_TIMEOUT") {
        if parse_timeout_string(&timeout).is_some() {
            env_config.timeout = Some(timeout);
        } else {
            tracing::warn!(value = %timeout, "ignoring invalid REGISTRANT_ALERT_TIMEOUT, use format like '5s', '30s', '2m'");
        }
    }

    if let Some(value) = lookup("REGISTRANT_ALERT_PUNYCODE") {
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => env_config.punycode = Some(true),
            "false" | "0" | "no" | "off" => env_config.punycode = Some(false),
            _ => tracing::warn!(value = %value, "ignoring invalid REGISTRANT_ALERT_PUNYCODE, use true/false"),
        }
    }

    if let Some(format) = lookup("REGISTRANT_ALERT_RESPONSE_FORMAT") {
        if is_known_format(&format) {
            env_config.response_format = Some(format.to_lowercase());
        } else {
            tracing::warn!(value = %format, "ignoring invalid REGISTRANT_ALERT_RESPONSE_FORMAT, use json/xml");
        }
    }

    env_config
}

fn is_known_format(format: &str) -> bool {
    matches!(format.to_lowercase().as_str(), "json" | "xml")
}

fn parse_base_url(raw: &str) -> Result<Url, RegistrantAlertError> {
    if raw.trim().is_empty() {
        return Err(RegistrantAlertError::config("Base URL cannot be empty"));
    }
    Url::parse(raw.trim())
        .map_err(|e| RegistrantAlertError::config(format!("Invalid base URL '{}': {}", raw, e)))
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(seconds) = timeout_str.strip_suffix('s') {
        seconds.parse::<u64>().ok()
    } else if let Some(minutes) = timeout_str.strip_suffix('m') {
        minutes.parse::<u64>().ok().map(|m| m * 60)
    } else {
        // Assume seconds if no unit
        timeout_str.parse::<u64>().ok()
    }
}
