//! Shared test helpers and a scripted runtime client.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;

use agentcore_adapter::adapter::RequestAdapter;
use agentcore_adapter::config::AdapterConfig;
use agentcore_adapter::error::{AdapterError, Result};
use agentcore_adapter::runtime::{AgentRuntimeClient, CompletionEvent, RuntimeResponse};

pub const TEST_ARN: &str = "arn:aws:bedrock-agentcore:us-east-1:123456789012:runtime/demo";

/// A canned runtime reply.
pub enum Scripted {
    Direct(Value),
    Chunks(Vec<Option<&'static [u8]>>),
    Fail(AdapterError),
}

/// Chunk literal helper for [`Scripted::Chunks`].
pub fn chunk(bytes: &'static [u8]) -> Option<&'static [u8]> {
    Some(bytes)
}

/// Runtime client that replays scripted replies and records every call.
#[derive(Default)]
pub struct ScriptedRuntimeClient {
    replies: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedRuntimeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self, reply: Scripted) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// `(runtime_arn, input_text)` for each invocation so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// The parsed input of the most recent invocation.
    pub fn last_input(&self) -> Value {
        let calls = self.calls.lock().unwrap();
        let (_, text) = calls.last().expect("no invocation recorded");
        serde_json::from_str(text).expect("input text is JSON")
    }
}

#[async_trait]
impl AgentRuntimeClient for ScriptedRuntimeClient {
    async fn invoke(&self, runtime_arn: &str, input_text: String) -> Result<RuntimeResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((runtime_arn.to_string(), input_text));

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Scripted::Chunks(Vec::new()));

        match reply {
            Scripted::Direct(value) => Ok(RuntimeResponse::Direct(value)),
            Scripted::Fail(err) => Err(err),
            Scripted::Chunks(chunks) => {
                let events: Vec<Result<CompletionEvent>> = chunks
                    .into_iter()
                    .map(|chunk| {
                        Ok(match chunk {
                            Some(bytes) => CompletionEvent::chunk(bytes.to_vec()),
                            None => CompletionEvent::empty(),
                        })
                    })
                    .collect();
                Ok(RuntimeResponse::Completion(stream::iter(events).boxed()))
            }
        }
    }
}

pub fn test_config() -> AdapterConfig {
    AdapterConfig::builder()
        .region("us-east-1")
        .runtime_arn(TEST_ARN)
        .build()
}

/// Adapter wired to a fresh scripted client.
pub fn scripted_adapter() -> (RequestAdapter, Arc<ScriptedRuntimeClient>) {
    let client = Arc::new(ScriptedRuntimeClient::new());
    let adapter = RequestAdapter::new(&test_config(), client.clone()).expect("valid config");
    (adapter, client)
}
