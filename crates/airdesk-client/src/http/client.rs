/*
[INPUT]:  HTTP configuration (base URL, deployment preset, timeouts, poll budget)
[OUTPUT]: Configured reqwest client ready for task-service calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use crate::http::{Result, TaskError};
use crate::task::PollOptions;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Known task-service deployments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    /// Same-origin reverse proxy mounted at `/api`
    Proxy,
    /// Developer machine
    Local,
    /// In-cluster service name
    Internal,
}

impl Deployment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Deployment::Proxy => "/api",
            Deployment::Local => "http://localhost:8000",
            Deployment::Internal => "http://task-service:8000",
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Absolute URL, or a path resolved against `origin`
    pub base_url: String,
    pub origin: Option<String>,
    /// Per-request transport timeout; independent of the polling budget
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
    pub poll: PollOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_deployment(Deployment::Local)
    }
}

impl ClientConfig {
    pub fn for_deployment(deployment: Deployment) -> Self {
        Self {
            base_url: deployment.base_url().to_string(),
            origin: None,
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Duration::from_secs(10),
            poll: PollOptions::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve `base_url` to an absolute URL usable as a join base
    pub fn resolve_base_url(&self) -> Result<Url> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err(TaskError::Config("base_url must not be empty".to_string()));
        }

        let url = match Url::parse(base_url) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let origin = self.origin.as_deref().ok_or_else(|| {
                    TaskError::Config(format!(
                        "relative base_url {base_url:?} needs an origin to resolve against"
                    ))
                })?;
                Url::parse(origin)?.join(base_url)?
            }
            Err(err) => return Err(err.into()),
        };

        if url.cannot_be_a_base() {
            return Err(TaskError::Config(format!("base_url {url} cannot carry a path")));
        }
        Ok(url)
    }
}

/// HTTP client for the task service
#[derive(Debug, Clone)]
pub struct TaskClient {
    http_client: Client,
    base_url: Url,
    poll: PollOptions,
}

impl TaskClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.poll.validate()?;
        let base_url = config.resolve_base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url,
            poll: config.poll,
        })
    }

    /// Create a client against an explicit base URL, keeping other settings
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        Self::with_config(config.with_base_url(base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Poll budget applied by [`TaskClient::poll`]
    pub fn poll_options(&self) -> PollOptions {
        self.poll
    }

    /// Append path segments to the base URL; each segment is percent-encoded
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TaskError::Config(format!("base_url {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send and decode the body leniently.
    ///
    /// Non-2xx answers become [`TaskError::HttpStatus`]. An empty body decodes
    /// to `null` and a body that is not JSON is kept as a plain string.
    pub(crate) async fn send_value(&self, builder: RequestBuilder) -> Result<Value> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TaskError::http_status(status, body));
        }

        Ok(decode_body(&body))
    }
}

fn decode_body(body: &str) -> Value {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}
