//! Inbound event decoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::error::{AdapterError, Result};

use super::{is_truthy, json_type_name};

/// An event as handed to the adapter by its front end.
///
/// Gateway proxy events wrap the caller's JSON in a string `body`, optionally
/// base64-encoded (any truthy `isBase64Encoded` counts). Anything without a
/// `body` key is a direct invocation and is the payload itself.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Gateway {
        body: Value,
        is_base64_encoded: bool,
    },
    Direct(Value),
}

impl InboundEvent {
    /// Classify a raw event.
    pub fn from_value(event: Value) -> Self {
        match event {
            Value::Object(mut map) if map.contains_key("body") => {
                let is_base64_encoded = map.get("isBase64Encoded").is_some_and(is_truthy);
                let body = map.remove("body").unwrap_or(Value::Null);
                Self::Gateway {
                    body,
                    is_base64_encoded,
                }
            }
            other => Self::Direct(other),
        }
    }

    /// Unwrap the caller's payload.
    pub fn into_payload(self) -> Result<Value> {
        match self {
            Self::Direct(payload) => Ok(payload),
            Self::Gateway {
                body: Value::String(body),
                is_base64_encoded,
            } => {
                let raw = if is_base64_encoded {
                    // Line breaks and padding whitespace are tolerated.
                    let compact: String = body
                        .chars()
                        .filter(|c| !c.is_ascii_whitespace())
                        .collect();
                    STANDARD.decode(compact)?
                } else {
                    body.into_bytes()
                };
                serde_json::from_slice(&raw).map_err(AdapterError::InvalidPayload)
            }
            Self::Gateway { body, .. } => Err(AdapterError::InvalidEnvelope(format!(
                "body must be a JSON string, got {}",
                json_type_name(&body)
            ))),
        }
    }
}

/// Decode a raw event straight to its payload.
pub fn decode_payload(event: Value) -> Result<Value> {
    InboundEvent::from_value(event).into_payload()
}
