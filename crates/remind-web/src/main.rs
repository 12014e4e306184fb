//! Reminder agent behind an HTTP webhook.
//!
//! # Usage
//!
//! ```bash
//! OPENROUTER_KEY=sk-... cargo run -p remind-web
//! OPENROUTER_KEY=sk-... cargo run -p remind-web -- --port 8080 --retries 2
//! RUST_LOG=remind_rs=debug,info OPENROUTER_KEY=sk-... cargo run -p remind-web
//! ```
//!
//! Then forward chat messages to it:
//!
//! ```bash
//! curl -s localhost:3001/api/message \
//!   -H 'content-type: application/json' \
//!   -d '{"conversation_id": "15551234567@c.us", "text": "Remind me to call mom at 6pm"}'
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use remind_rs::prelude::*;
use remind_web::{WebConfig, spawn_web};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Reminder agent HTTP server.
#[derive(Parser)]
#[command(about = "Conversational reminder agent behind an HTTP webhook")]
struct Args {
    /// Interface to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: std::net::IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Model used for extraction.
    #[arg(long, default_value = remind_rs::DEFAULT_MODEL)]
    model: String,

    /// Per-attempt backend timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Retries for transient backend failures.
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Constrain backend output with a JSON Schema response format.
    #[arg(long)]
    structured_output: bool,

    /// Heartbeat period in seconds (0 disables).
    #[arg(long, default_value_t = 60)]
    heartbeat_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 1. Backend client; fails fast when the key is missing.
    let client = OpenRouterClient::from_env()?;

    // 2. Agent configuration.
    let config = AgentConfig::default()
        .with_model(args.model)
        .with_request_timeout(Duration::from_secs(args.timeout_secs))
        .with_retries(args.retries)
        .with_structured_output(args.structured_output)
        .with_heartbeat_interval(Duration::from_secs(args.heartbeat_secs));
    info!(
        "Model {} (timeout {}s, {} retries)",
        config.model, args.timeout_secs, config.retry.max_retries
    );

    // 3. Store, heartbeat, router.
    let store = Arc::new(ReminderStore::new());
    let heartbeat = spawn_heartbeat(store.clone(), config.heartbeat_interval);
    let extractor = ExtractionClient::new(Arc::new(client), config);
    let router = MessageRouter::new(store, Arc::new(extractor));

    // 4. Serve until Ctrl-C.
    let web_config = WebConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
    };
    let addr = spawn_web(router, web_config)
        .await
        .map_err(|e| format!("failed to bind {}:{}: {e}", args.host, args.port))?;
    println!("Reminder agent: http://{addr}/api/message");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to listen for shutdown signal: {e}"))?;
    info!("Shutting down");
    if let Some(handle) = heartbeat {
        handle.abort();
    }
    Ok(())
}
