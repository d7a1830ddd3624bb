//! agentcore-adapter binary entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use agentcore_adapter::adapter::RequestAdapter;
use agentcore_adapter::cli::handlers::{handle_invoke, handle_prompt, render};
use agentcore_adapter::cli::{Cli, Commands};
use agentcore_adapter::config::AdapterConfig;

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let adapter = match connect().await {
        Ok(adapter) => adapter,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let response = match &cli.command {
        Commands::Invoke(args) => handle_invoke(&adapter, args).await,
        Commands::Prompt(args) => Ok(handle_prompt(&adapter, args).await),
    };

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match render(&response, cli.body_only) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    if !response.is_success() {
        std::process::exit(1);
    }
}

async fn connect() -> agentcore_adapter::error::Result<RequestAdapter> {
    let config = AdapterConfig::from_env()?;
    RequestAdapter::from_config(config).await
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("agentcore_adapter=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
