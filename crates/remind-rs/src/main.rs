//! Console transport for the reminder agent.
//!
//! Treats stdin as one direct conversation: every line is a message, every
//! reply is printed to stdout. Blank lines are skipped here and never reach
//! the router, so they cost no extraction call. Logs go to stderr (filter
//! with `RUST_LOG`).
//! Reads the API key from the `OPENROUTER_KEY` environment variable.
//!
//! # Examples
//!
//! ```sh
//! remind
//! > Remind me to call mom at 6pm
//! > list
//!
//! # Scripted
//! printf 'buy milk tomorrow\nlist\n' | remind --model openai/gpt-4o-mini
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use remind_rs::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Chat with the reminder agent on the terminal.
#[derive(Parser)]
#[command(name = "remind")]
struct Cli {
    /// Conversation id used for every line read from stdin.
    #[arg(long, default_value = "console")]
    conversation: String,

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
    #[arg(long, default_value_t = 0)]
    heartbeat_secs: u64,
}

/// Turn one stdin line into a direct message. Blank lines yield `None`.
fn console_message(conversation: &str, line: String) -> Option<InboundMessage> {
    if line.trim().is_empty() {
        None
    } else {
        Some(InboundMessage::direct(conversation, line))
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let client = OpenRouterClient::from_env()?;

    let config = AgentConfig::default()
        .with_model(cli.model)
        .with_request_timeout(Duration::from_secs(cli.timeout_secs))
        .with_retries(cli.retries)
        .with_structured_output(cli.structured_output)
        .with_heartbeat_interval(Duration::from_secs(cli.heartbeat_secs));

    let store = Arc::new(ReminderStore::new());
    let _heartbeat = spawn_heartbeat(store.clone(), config.heartbeat_interval);
    let extractor = ExtractionClient::new(Arc::new(client), config);
    let router = MessageRouter::new(store, Arc::new(extractor));

    info!("Ready. Type \"help\" for examples.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| format!("failed to read stdin: {e}"))?
    {
        let Some(message) = console_message(&cli.conversation, line) else {
            continue;
        };
        if let Some(reply) = router.handle(&message).await {
            println!("{reply}\n");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
