/*
[INPUT]:  YAML configuration file, AIRDESK_* environment variables
[OUTPUT]: Parsed desk configuration and derived ClientConfig
[POS]:    Configuration layer - task-service endpoint and poll budget
[UPDATE]: When adding new configuration options
*/

use airdesk_client::{ClientConfig, Deployment, PollOptions};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "AIRDESK";

/// Top-level configuration for the desk CLI
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeskConfig {
    /// Preset used when `base_url` is not set
    #[serde(default = "default_deployment")]
    pub deployment: Deployment,
    /// Explicit task-service base URL; wins over `deployment`
    #[serde(default)]
    pub base_url: Option<String>,
    /// Origin a relative base URL (e.g. `/api`) is resolved against
    #[serde(default)]
    pub origin: Option<String>,
    /// Per-request timeout in seconds; 0 disables it
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub poll: PollConfig,
}

/// Status polling budget
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            deployment: default_deployment(),
            base_url: None,
            origin: None,
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            poll: PollConfig::default(),
        }
    }
}

fn default_deployment() -> Deployment {
    Deployment::Local
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_max_attempts() -> u32 {
    30
}

/// `<config_dir>/airdesk/config.yaml`, when the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("airdesk").join("config.yaml"))
}

impl DeskConfig {
    /// Load configuration, layering `AIRDESK_*` variables over the file.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(default_path) = default_config_path() {
                    builder = builder.add_source(File::from(default_path).required(false));
                }
            }
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let raw = builder.build().context("read configuration")?;
        raw.try_deserialize().context("parse configuration")
    }

    pub fn client_config(&self) -> ClientConfig {
        let preset = ClientConfig::for_deployment(self.deployment);
        ClientConfig {
            base_url: self.base_url.clone().unwrap_or(preset.base_url),
            origin: self.origin.clone(),
            timeout: (self.request_timeout_secs > 0)
                .then(|| Duration::from_secs(self.request_timeout_secs)),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            poll: PollOptions::new(
                Duration::from_millis(self.poll.interval_ms),
                self.poll.max_attempts,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_task_protocol() {
        let client = DeskConfig::default().client_config();
        assert_eq!(client.base_url, "http://localhost:8000");
        assert_eq!(client.poll, PollOptions::default());
        assert_eq!(client.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_base_url_overrides_deployment() {
        let config = DeskConfig {
            deployment: Deployment::Internal,
            base_url: Some("https://tasks.example/api".to_string()),
            request_timeout_secs: 0,
            ..DeskConfig::default()
        };
        let client = config.client_config();
        assert_eq!(client.base_url, "https://tasks.example/api");
        assert_eq!(client.timeout, None);
    }

    #[test]
    fn test_yaml_with_partial_poll_section() {
        let config: DeskConfig = serde_yaml::from_str(
            "deployment: proxy\norigin: https://airdesk.example\npoll:\n  max_attempts: 5\n",
        )
        .expect("yaml");
        assert_eq!(config.deployment, Deployment::Proxy);
        assert_eq!(config.poll.max_attempts, 5);
        assert_eq!(config.poll.interval_ms, 1000);

        let resolved = config.client_config().resolve_base_url().expect("resolved");
        assert_eq!(resolved.as_str(), "https://airdesk.example/api");
    }
}
