//! Outbound HTTP response shape.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AdapterError, Result};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const APPLICATION_JSON: &str = "application/json";

/// Proxy-integration response: `{ statusCode, headers, body }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl OutboundResponse {
    /// 200 with the agent result and open CORS.
    ///
    /// Non-ASCII text in `result` is written literally, not escaped.
    pub fn success(result: &Value) -> Self {
        let mut headers = json_headers();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN.to_string(), "*".to_string());
        Self {
            status_code: 200,
            headers,
            body: result.to_string(),
        }
    }

    /// An `{"error": message}` response with the given status.
    pub fn error(status_code: u16, message: impl Display) -> Self {
        let body = serde_json::json!({ "error": message.to_string() });
        Self {
            status_code,
            headers: json_headers(),
            body: body.to_string(),
        }
    }

    /// Map an adapter error to its response.
    pub fn from_error(err: &AdapterError) -> Self {
        Self::error(err.status_code(), err)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Parse `body` back into JSON.
    pub fn body_json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(AdapterError::Serialization)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

fn json_headers() -> BTreeMap<String, String> {
    BTreeMap::from([(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())])
}
