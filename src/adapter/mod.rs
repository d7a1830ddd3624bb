//! The request pipeline: decode, validate, invoke, drain, respond.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::AdapterConfig;
use crate::error::{AdapterError, ErrorKind, Result};
use crate::runtime::{drain_completion, AgentRuntimeClient, HttpRuntimeClient};
use crate::types::{decode_payload, OutboundResponse, RequestPayload, UpstreamRequest};

/// Fronts one agent runtime for gateway requests.
///
/// Cheap to clone; the runtime client is shared.
#[derive(Clone)]
pub struct RequestAdapter {
    client: Arc<dyn AgentRuntimeClient>,
    runtime_arn: String,
}

impl std::fmt::Debug for RequestAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAdapter")
            .field("runtime_arn", &self.runtime_arn)
            .finish_non_exhaustive()
    }
}

impl RequestAdapter {
    /// Adapter over an injected runtime client. Fails if `config` is
    /// incomplete.
    pub fn new(config: &AdapterConfig, client: Arc<dyn AgentRuntimeClient>) -> Result<Self> {
        config.check()?;
        Ok(Self {
            client,
            runtime_arn: config.runtime_arn.clone(),
        })
    }

    /// Validate `config` and connect to the runtime over HTTPS.
    ///
    /// Uses the configured bearer token, or signs requests with the default
    /// AWS credential chain.
    pub async fn from_config(config: AdapterConfig) -> Result<Self> {
        let config = config.validate()?;
        let client = HttpRuntimeClient::connect(config.clone()).await?;
        Self::new(&config, Arc::new(client))
    }

    pub fn runtime_arn(&self) -> &str {
        &self.runtime_arn
    }

    /// Handle one event. Always produces a complete response.
    pub async fn handle(&self, event: Value) -> OutboundResponse {
        match self.process(event).await {
            Ok(result) => OutboundResponse::success(&result),
            Err(err) => {
                match err.kind() {
                    ErrorKind::Validation => {
                        warn!(error = %err, "rejected request");
                    }
                    kind => {
                        error!(
                            runtime_arn = %self.runtime_arn,
                            kind = %kind,
                            error = %err,
                            "Error invoking agent runtime"
                        );
                    }
                }
                OutboundResponse::from_error(&err)
            }
        }
    }

    /// Handle an event given as JSON text.
    pub async fn handle_str(&self, raw_event: &str) -> OutboundResponse {
        match serde_json::from_str::<Value>(raw_event) {
            Ok(event) => self.handle(event).await,
            Err(e) => {
                let err = AdapterError::InvalidEnvelope(e.to_string());
                error!(kind = %err.kind(), error = %err, "unreadable event");
                OutboundResponse::from_error(&err)
            }
        }
    }

    /// Run the pipeline, returning the agent result or the first error.
    pub async fn process(&self, event: Value) -> Result<Value> {
        let request = prepare(event)?;
        let input_text = request.to_input_text()?;

        debug!(runtime_arn = %self.runtime_arn, "submitting agent request");
        let response = self.client.invoke(&self.runtime_arn, input_text).await?;
        let result = drain_completion(response).await?;
        debug!(runtime_arn = %self.runtime_arn, "agent request completed");

        Ok(result)
    }
}

/// Decode and validate an event into the request sent upstream.
pub fn prepare(event: Value) -> Result<UpstreamRequest> {
    let payload = decode_payload(event)?;
    RequestPayload::from_value(payload)?.into_upstream()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct FailingClient;

    #[async_trait]
    impl AgentRuntimeClient for FailingClient {
        async fn invoke(
            &self,
            _runtime_arn: &str,
            _input_text: String,
        ) -> Result<crate::runtime::RuntimeResponse> {
            Err(AdapterError::api(503, "runtime unavailable"))
        }
    }

    fn adapter() -> RequestAdapter {
        let config = AdapterConfig::builder()
            .region("us-east-1")
            .runtime_arn("arn:test")
            .build();
        RequestAdapter::new(&config, Arc::new(FailingClient)).unwrap()
    }

    #[test]
    fn prepare_applies_defaults() {
        let request = prepare(json!({"prompt": "x"})).unwrap();
        assert_eq!(request.input.permission_mode, json!("acceptEdits"));
    }

    #[tokio::test]
    async fn missing_prompt_short_circuits_before_invoke() {
        let resp = adapter().handle(json!({"permission_mode": "plan"})).await;
        assert_eq!(resp.status_code, 400);
    }

    #[tokio::test]
    async fn invoke_failure_becomes_500() {
        let resp = adapter().handle(json!({"prompt": "x"})).await;
        assert_eq!(resp.status_code, 500);
        assert_eq!(
            resp.body_json().unwrap(),
            json!({"error": "Agent runtime error (status 503): runtime unavailable"})
        );
    }

    #[tokio::test]
    async fn unparseable_event_text_becomes_500() {
        let resp = adapter().handle_str("{not json").await;
        assert_eq!(resp.status_code, 500);
        assert!(resp.body_json().unwrap()["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid envelope"));
    }

    #[tokio::test]
    async fn from_config_rejects_missing_runtime() {
        let config = AdapterConfig::builder()
            .region("us-east-1")
            .runtime_arn("")
            .build();
        let err = RequestAdapter::from_config(config).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn new_rejects_incomplete_config() {
        for (region, arn) in [("", "arn:test"), ("us-east-1", ""), ("  ", "  ")] {
            let config = AdapterConfig::builder()
                .region(region)
                .runtime_arn(arn)
                .build();
            let err = RequestAdapter::new(&config, Arc::new(FailingClient)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration, "region={region:?} arn={arn:?}");
        }
    }
}
