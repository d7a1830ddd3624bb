//! HTTPS client for the hosted agent runtime's invocation endpoint.

use std::time::SystemTime;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{
    sign, SignableBody, SignableRequest, SigningParams, SigningSettings,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AdapterConfig;
use crate::error::{AdapterError, Result};

use super::{AgentRuntimeClient, CompletionEvent, RuntimeResponse};

/// Header carrying the per-invocation session id.
pub const SESSION_ID_HEADER: &str = "x-amzn-bedrock-agentcore-runtime-session-id";

/// SigV4 signing name of the runtime service.
pub const SIGNING_NAME: &str = "bedrock-agentcore";

const EVENT_STREAM: &str = "text/event-stream";

/// How requests to the runtime are authorized.
#[derive(Debug, Clone)]
enum RuntimeAuth {
    Bearer(HeaderValue),
    SigV4(SharedCredentialsProvider),
    Unsigned,
}

/// Agent runtime client speaking the runtime's HTTPS invocation API.
///
/// Holds one pooled `reqwest::Client`; build it once and share it. Requests
/// carry the configured bearer token, or are SigV4-signed with IAM
/// credentials when no token is set.
#[derive(Debug, Clone)]
pub struct HttpRuntimeClient {
    client: reqwest::Client,
    config: AdapterConfig,
    auth: RuntimeAuth,
}

impl HttpRuntimeClient {
    /// Client using the configured bearer token, or unsigned requests
    /// without one.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let auth = match &config.bearer_token {
            Some(token) => RuntimeAuth::Bearer(bearer_header(token)?),
            None => RuntimeAuth::Unsigned,
        };
        Self::with_auth(config, auth)
    }

    /// Client signing every request with credentials from `provider`.
    pub fn with_credentials(
        config: AdapterConfig,
        provider: impl ProvideCredentials + 'static,
    ) -> Result<Self> {
        let provider = SharedCredentialsProvider::new(provider);
        Self::with_auth(config, RuntimeAuth::SigV4(provider))
    }

    /// Client for `config`: the bearer token when set, otherwise SigV4 with
    /// the default AWS credential chain for the configured region.
    pub async fn connect(config: AdapterConfig) -> Result<Self> {
        if config.bearer_token.is_some() {
            return Self::new(config);
        }
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        match sdk_config.credentials_provider() {
            Some(provider) => Self::with_auth(config, RuntimeAuth::SigV4(provider)),
            None => {
                warn!("no AWS credential provider available, sending unsigned requests");
                Self::with_auth(config, RuntimeAuth::Unsigned)
            }
        }
    }

    fn with_auth(config: AdapterConfig, auth: RuntimeAuth) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self {
            client,
            config,
            auth,
        })
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn build_headers(&self, session_id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/event-stream"),
        );
        if let Ok(val) = HeaderValue::from_str(session_id) {
            headers.insert(SESSION_ID_HEADER, val);
        }
        headers
    }

    /// Add the authorization headers for one request.
    async fn authorize(
        &self,
        url: &reqwest::Url,
        headers: &mut HeaderMap,
        body: &str,
    ) -> Result<()> {
        match &self.auth {
            RuntimeAuth::Bearer(value) => {
                headers.insert(AUTHORIZATION, value.clone());
            }
            RuntimeAuth::SigV4(provider) => {
                let credentials = provider.provide_credentials().await.map_err(|e| {
                    AdapterError::Authentication(format!("could not load AWS credentials: {e}"))
                })?;
                let identity: Identity = credentials.into();
                sign_request(&identity, &self.config.region, url, headers, body)?;
            }
            RuntimeAuth::Unsigned => {}
        }
        Ok(())
    }
}

/// `Authorization: Bearer <token>` header, rejecting tokens that cannot be
/// sent as a header value.
pub fn bearer_header(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
        AdapterError::Configuration(
            "bearer token contains characters not allowed in an HTTP header".to_string(),
        )
    })?;
    value.set_sensitive(true);
    Ok(value)
}

/// SigV4-sign a POST to `url`, adding the signature headers to `headers`.
pub fn sign_request(
    identity: &Identity,
    region: &str,
    url: &reqwest::Url,
    headers: &mut HeaderMap,
    body: &str,
) -> Result<()> {
    let params: SigningParams<'_> = v4::SigningParams::builder()
        .identity(identity)
        .region(region)
        .name(SIGNING_NAME)
        .time(SystemTime::now())
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| AdapterError::Signing(e.to_string()))?
        .into();

    let signed_headers = headers
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)));
    let signable = SignableRequest::new(
        "POST",
        url.as_str(),
        signed_headers,
        SignableBody::Bytes(body.as_bytes()),
    )
    .map_err(|e| AdapterError::Signing(e.to_string()))?;

    let (instructions, _signature) = sign(signable, &params)
        .map_err(|e| AdapterError::Signing(e.to_string()))?
        .into_parts();

    for (name, value) in instructions.headers() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AdapterError::Signing(e.to_string()))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| AdapterError::Signing(e.to_string()))?;
        headers.insert(name, value);
    }
    Ok(())
}

#[async_trait]
impl AgentRuntimeClient for HttpRuntimeClient {
    async fn invoke(&self, runtime_arn: &str, input_text: String) -> Result<RuntimeResponse> {
        let url = self.config.invocation_url(runtime_arn)?;
        let session_id = Uuid::new_v4().to_string();

        debug!(runtime_arn, session_id = %session_id, "invoking agent runtime");

        let mut headers = self.build_headers(&session_id);
        self.authorize(&url, &mut headers, &input_text).await?;

        let resp = self
            .client
            .post(url)
            .headers(headers)
            .body(input_text)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let streaming = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with(EVENT_STREAM));

        if streaming {
            debug!(runtime_arn, "runtime answered with an event stream");
            return Ok(RuntimeResponse::Completion(sse_events(resp.bytes_stream())));
        }

        // A plain body is a single chunk.
        let body = resp.bytes().await?;
        let event = CompletionEvent::chunk(body.to_vec());
        Ok(RuntimeResponse::Completion(
            stream::iter([Ok(event)]).boxed(),
        ))
    }
}

/// Split a server-sent-event byte stream into completion fragments.
///
/// Each `data:` line becomes one chunk; every other line (blank separators,
/// `event:`/`id:` fields, comments, `[DONE]`) becomes an empty fragment.
pub fn sse_events<S, B, E>(byte_stream: S) -> BoxStream<'static, Result<CompletionEvent>>
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<AdapterError> + Send + 'static,
{
    let events = async_stream::stream! {
        let mut buffer: Vec<u8> = Vec::new();
        futures::pin_mut!(byte_stream);

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    let err: AdapterError = e.into();
                    yield Err(err);
                    break;
                }
            };

            buffer.extend_from_slice(chunk.as_ref());

            while let Some(line_end) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=line_end).collect();
                yield Ok(parse_sse_line(&line));
            }
        }

        if !buffer.is_empty() {
            yield Ok(parse_sse_line(&buffer));
        }
    };
    events.boxed()
}

/// Parse one SSE line (terminator included or not).
pub fn parse_sse_line(line: &[u8]) -> CompletionEvent {
    let line = trim_line_end(line);
    let Some(data) = line.strip_prefix(b"data:") else {
        return CompletionEvent::empty();
    };
    let data = data.strip_prefix(b" ").unwrap_or(data);
    if data == b"[DONE]" {
        return CompletionEvent::empty();
    }
    CompletionEvent::chunk(data.to_vec())
}

fn trim_line_end(mut line: &[u8]) -> &[u8] {
    while let Some((last, rest)) = line.split_last() {
        if *last == b'\n' || *last == b'\r' {
            line = rest;
        } else {
            break;
        }
    }
    line
}

/// Map a non-success runtime status to an error.
pub fn status_to_error(status: u16, body: &str) -> AdapterError {
    let message = extract_message(body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            format!("runtime returned status {status}")
        } else {
            body.trim().to_string()
        }
    });
    match status {
        401 | 403 => AdapterError::Authentication(message),
        429 => AdapterError::Throttled(message),
        _ => AdapterError::api(status, message),
    }
}

fn extract_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("Message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
