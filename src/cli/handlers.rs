//! CLI command handlers.

use std::io::Read;

use serde_json::{Map, Value};

use crate::adapter::RequestAdapter;
use crate::error::{AdapterError, Result};
use crate::types::OutboundResponse;

use super::{InvokeArgs, PromptArgs};

/// Handle `agentcore-adapter invoke`.
pub async fn handle_invoke(adapter: &RequestAdapter, args: &InvokeArgs) -> Result<OutboundResponse> {
    let raw = read_event(&args.event)?;
    Ok(adapter.handle_str(&raw).await)
}

/// Handle `agentcore-adapter prompt`.
pub async fn handle_prompt(adapter: &RequestAdapter, args: &PromptArgs) -> OutboundResponse {
    adapter.handle(prompt_payload(args)).await
}

/// Read an event from a file path, or stdin for `-`.
pub fn read_event(source: &str) -> Result<String> {
    let read = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        std::fs::read_to_string(source)
    };
    read.map_err(|e| AdapterError::InvalidEnvelope(format!("cannot read event from '{source}': {e}")))
}

/// Direct-invocation payload carrying only the options actually given.
pub fn prompt_payload(args: &PromptArgs) -> Value {
    let mut payload = Map::new();
    payload.insert("prompt".into(), Value::from(args.prompt.clone()));
    if let Some(mode) = &args.permission_mode {
        payload.insert("permission_mode".into(), Value::from(mode.clone()));
    }
    if let Some(tools) = &args.allowed_tools {
        payload.insert("allowed_tools".into(), Value::from(tools.clone()));
    }
    Value::Object(payload)
}

/// Render a response for stdout.
pub fn render(response: &OutboundResponse, body_only: bool) -> Result<String> {
    if body_only {
        return Ok(response.body.clone());
    }
    serde_json::to_string_pretty(response).map_err(AdapterError::Serialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn prompt_payload_omits_unset_options() {
        let args = PromptArgs {
            prompt: "hi".to_string(),
            permission_mode: None,
            allowed_tools: Some("Read".to_string()),
        };
        assert_eq!(
            prompt_payload(&args),
            json!({"prompt": "hi", "allowed_tools": "Read"})
        );
    }

    #[test]
    fn read_event_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"prompt\":\"hi\"}}").unwrap();

        let raw = read_event(file.path().to_str().unwrap()).unwrap();
        assert_eq!(raw, "{\"prompt\":\"hi\"}");
    }

    #[test]
    fn read_event_missing_file_is_envelope_error() {
        let err = read_event("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, AdapterError::InvalidEnvelope(_)));
    }

    #[test]
    fn render_full_and_body_only() {
        let resp = OutboundResponse::success(&json!({"result": "done"}));
        assert_eq!(render(&resp, true).unwrap(), "{\"result\":\"done\"}");

        let full: Value = serde_json::from_str(&render(&resp, false).unwrap()).unwrap();
        assert_eq!(full["statusCode"], json!(200));
    }
}
