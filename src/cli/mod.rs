//! CLI entry point for the adapter.

pub mod handlers;

use clap::{Parser, Subcommand};

/// Invoke a hosted agent runtime through the gateway adapter.
#[derive(Parser, Debug)]
#[command(
    name = "agentcore-adapter",
    version,
    about = "Gateway adapter for hosted agent runtimes"
)]
pub struct Cli {
    /// Print only the response body instead of the full proxy response
    #[arg(long, global = true)]
    pub body_only: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a gateway or direct-invocation event through the adapter
    Invoke(InvokeArgs),
    /// Send a prompt as a direct invocation
    Prompt(PromptArgs),
}

/// Arguments for `invoke`.
#[derive(Parser, Debug)]
pub struct InvokeArgs {
    /// Event JSON file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub event: String,
}

/// Arguments for `prompt`.
#[derive(Parser, Debug)]
pub struct PromptArgs {
    /// Task description for the agent
    pub prompt: String,

    /// Permission mode forwarded to the agent (runtime default: acceptEdits)
    #[arg(long)]
    pub permission_mode: Option<String>,

    /// Comma-separated tool allow-list forwarded to the agent
    #[arg(long)]
    pub allowed_tools: Option<String>,
}
