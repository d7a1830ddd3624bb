//! agentcore-adapter — gateway front end for hosted agent runtimes.
//!
//! Decodes an HTTP proxy event, validates the caller's payload, invokes a
//! remote agent runtime and relays its result as a proxy-integration
//! response.
//!
//! # Quick Start
//!
//! ```no_run
//! use agentcore_adapter::prelude::*;
//!
//! # async fn example() -> agentcore_adapter::error::Result<()> {
//! let adapter = RequestAdapter::from_config(AdapterConfig::from_env()?).await?;
//! let response = adapter
//!     .handle(serde_json::json!({"prompt": "Create a hello world app"}))
//!     .await;
//! println!("{}", response.body);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod prelude;
pub mod runtime;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
