//! Caller payload and the upstream request built from it.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AdapterError, Result};

use super::{is_truthy, json_type_name};

/// Permission mode sent when the caller omits one.
pub const DEFAULT_PERMISSION_MODE: &str = "acceptEdits";

/// Tool allow-list sent when the caller omits one.
pub const DEFAULT_ALLOWED_TOOLS: &str = "Bash,Read,Write,Replace,Search,List,WebFetch,AskFollowup";

/// The caller's request, as decoded from the envelope.
///
/// Fields are kept as raw JSON values: apart from the presence of `prompt`
/// nothing is type-checked, and whatever the caller sent is forwarded as-is.
/// `None` means the key was absent; an explicit `null` is `Some(Value::Null)`.
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestPayload {
    pub prompt: Option<Value>,
    pub permission_mode: Option<Value>,
    pub allowed_tools: Option<Value>,
}

impl RequestPayload {
    /// Parse a decoded payload value. Only JSON objects are payloads.
    pub fn from_value(payload: Value) -> Result<Self> {
        let Value::Object(mut fields) = payload else {
            return Err(AdapterError::InvalidPayload(serde_json::Error::custom(
                format!("expected a JSON object, got {}", json_type_name(&payload)),
            )));
        };
        Ok(Self {
            prompt: fields.remove("prompt"),
            permission_mode: fields.remove("permission_mode"),
            allowed_tools: fields.remove("allowed_tools"),
        })
    }

    /// Validate `prompt` and fill in defaults for absent options.
    pub fn into_upstream(self) -> Result<UpstreamRequest> {
        let prompt = self
            .prompt
            .filter(is_truthy)
            .ok_or(AdapterError::MissingField("prompt"))?;

        Ok(UpstreamRequest {
            input: UpstreamInput {
                prompt,
                permission_mode: self
                    .permission_mode
                    .unwrap_or_else(|| Value::from(DEFAULT_PERMISSION_MODE)),
                allowed_tools: self
                    .allowed_tools
                    .unwrap_or_else(|| Value::from(DEFAULT_ALLOWED_TOOLS)),
            },
        })
    }
}

/// Request body understood by the agent runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamRequest {
    pub input: UpstreamInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamInput {
    pub prompt: Value,
    pub permission_mode: Value,
    pub allowed_tools: Value,
}

impl UpstreamRequest {
    /// Serialize to the textual input handed to the runtime client.
    pub fn to_input_text(&self) -> Result<String> {
        serde_json::to_string(self).map_err(AdapterError::Serialization)
    }
}
