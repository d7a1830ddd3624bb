//! Adapter configuration (builder or environment).

use std::time::Duration;

use bon::Builder;

use crate::error::{AdapterError, Result};

/// Qualifier used when none is configured.
pub const DEFAULT_QUALIFIER: &str = "DEFAULT";

/// Request timeout for the runtime HTTP client when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub const ENV_REGION: &str = "AWS_REGION";
pub const ENV_RUNTIME_ARN: &str = "AGENTCORE_RUNTIME_ARN";
pub const ENV_ENDPOINT: &str = "AGENTCORE_ENDPOINT";
pub const ENV_BEARER_TOKEN: &str = "AGENTCORE_BEARER_TOKEN";
pub const ENV_QUALIFIER: &str = "AGENTCORE_QUALIFIER";
pub const ENV_TIMEOUT_SECS: &str = "AGENTCORE_TIMEOUT_SECS";

/// Everything the adapter needs to reach one agent runtime.
///
/// `region` and `runtime_arn` are required; a config missing either one is
/// rejected by [`AdapterConfig::validate`] before any request is served.
#[derive(Clone, Builder)]
pub struct AdapterConfig {
    #[builder(into)]
    pub region: String,
    #[builder(into)]
    pub runtime_arn: String,
    /// Base URL override (scheme + host), e.g. a local emulator.
    #[builder(into)]
    pub endpoint: Option<String>,
    /// OAuth bearer token presented to the runtime endpoint.
    #[builder(into)]
    pub bearer_token: Option<String>,
    #[builder(into, default = DEFAULT_QUALIFIER.to_string())]
    pub qualifier: String,
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}

impl std::fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("region", &self.region)
            .field("runtime_arn", &self.runtime_arn)
            .field("endpoint", &self.endpoint)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| ".."))
            .field("qualifier", &self.qualifier)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AdapterConfig {
    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (environment-shaped).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let region = read(ENV_REGION).ok_or_else(|| missing(ENV_REGION))?;
        let runtime_arn = read(ENV_RUNTIME_ARN).ok_or_else(|| missing(ENV_RUNTIME_ARN))?;

        let timeout = match read(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AdapterError::Configuration(format!(
                        "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        let config = Self {
            region,
            runtime_arn,
            endpoint: read(ENV_ENDPOINT),
            bearer_token: read(ENV_BEARER_TOKEN),
            qualifier: read(ENV_QUALIFIER).unwrap_or_else(|| DEFAULT_QUALIFIER.to_string()),
            timeout,
        };
        config.validate()
    }

    /// Reject configs with blank required fields or a bearer token that
    /// cannot be sent as a header.
    pub fn validate(self) -> Result<Self> {
        self.check()?;
        Ok(self)
    }

    /// Non-consuming form of [`AdapterConfig::validate`].
    pub fn check(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(missing(ENV_REGION));
        }
        if self.runtime_arn.trim().is_empty() {
            return Err(missing(ENV_RUNTIME_ARN));
        }
        if self.qualifier.trim().is_empty() {
            return Err(AdapterError::Configuration(
                "qualifier must not be empty".to_string(),
            ));
        }
        if let Some(token) = &self.bearer_token {
            crate::runtime::http::bearer_header(token)?;
        }
        Ok(())
    }

    /// Base URL of the runtime service for this region.
    pub fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-agentcore.{}.amazonaws.com", self.region),
        }
    }

    /// Full invocation URL for `runtime_arn`.
    ///
    /// The ARN is percent-encoded as a single path segment.
    pub fn invocation_url(&self, runtime_arn: &str) -> Result<reqwest::Url> {
        let base = self.base_url();
        let mut url = reqwest::Url::parse(&base).map_err(|e| {
            AdapterError::Configuration(format!("invalid runtime endpoint '{base}': {e}"))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AdapterError::Configuration(format!("runtime endpoint '{base}' is not a base URL"))
            })?
            .pop_if_empty()
            .extend(["runtimes", runtime_arn, "invocations"]);
        url.query_pairs_mut()
            .append_pair("qualifier", &self.qualifier);
        Ok(url)
    }
}

fn missing(var: &str) -> AdapterError {
    AdapterError::Configuration(format!("missing required setting {var}"))
}
