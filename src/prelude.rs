//! Convenience re-exports for common use.

pub use crate::adapter::RequestAdapter;
pub use crate::config::AdapterConfig;
pub use crate::error::{AdapterError, ErrorKind, Result};
pub use crate::runtime::{
    AgentRuntimeClient, CompletionEvent, HttpRuntimeClient, PayloadPart, RuntimeResponse,
};
pub use crate::types::{OutboundResponse, RequestPayload, UpstreamRequest};
