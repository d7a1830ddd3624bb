//! Agent runtime client trait and response draining.

pub mod http;

use std::fmt;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{AdapterError, Result};

pub use http::HttpRuntimeClient;

/// One fragment of a streamed completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionEvent {
    pub chunk: Option<PayloadPart>,
}

/// Raw bytes carried by a fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadPart {
    pub bytes: Vec<u8>,
}

impl CompletionEvent {
    pub fn chunk(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            chunk: Some(PayloadPart {
                bytes: bytes.into(),
            }),
        }
    }

    /// A fragment with no chunk (keep-alives, metadata frames).
    pub fn empty() -> Self {
        Self { chunk: None }
    }

    fn chunk_bytes(&self) -> Option<&[u8]> {
        self.chunk
            .as_ref()
            .map(|part| part.bytes.as_slice())
            .filter(|bytes| !bytes.is_empty())
    }
}

/// What a runtime invocation answers with.
pub enum RuntimeResponse {
    /// A complete structured result.
    Direct(Value),
    /// A sequence of fragments to drain.
    Completion(BoxStream<'static, Result<CompletionEvent>>),
}

impl fmt::Debug for RuntimeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(value) => f.debug_tuple("Direct").field(value).finish(),
            Self::Completion(_) => f.write_str("Completion(..)"),
        }
    }
}

/// Invokes a hosted agent runtime.
///
/// Implementations are constructed once and shared across requests.
#[async_trait]
pub trait AgentRuntimeClient: Send + Sync {
    /// Send `input_text` to the runtime identified by `runtime_arn`.
    async fn invoke(&self, runtime_arn: &str, input_text: String) -> Result<RuntimeResponse>;
}

/// Reduce a runtime response to a single JSON value.
///
/// Every non-empty chunk is decoded and replaces the previous result, so only
/// the last one survives. A completion with no non-empty chunk yields `{}`.
pub async fn drain_completion(response: RuntimeResponse) -> Result<Value> {
    let mut events = match response {
        RuntimeResponse::Direct(value) => return Ok(value),
        RuntimeResponse::Completion(events) => events,
    };

    let mut result = Value::Object(Map::new());
    let mut fragments = 0usize;
    let mut decoded = 0usize;

    while let Some(event) = events.next().await {
        let event = event?;
        fragments += 1;
        let Some(bytes) = event.chunk_bytes() else {
            continue;
        };
        let text = std::str::from_utf8(bytes)?;
        result = serde_json::from_str(text).map_err(AdapterError::ChunkDecode)?;
        decoded += 1;
    }

    debug!(fragments, decoded, "drained runtime completion");
    Ok(result)
}
