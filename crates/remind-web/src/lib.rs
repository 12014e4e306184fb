//! HTTP webhook transport for the `remind-rs` reminder agent.
//!
//! A chat gateway (WhatsApp bridge, Slack bot, test harness…) forwards each
//! inbound message as a JSON POST and relays the reply body back to the same
//! conversation. Pairing, authentication and delivery stay on the gateway's
//! side.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/message` | `{"conversation_id", "text", "is_group"?}` → `200 {"reply"}`, or `204` when ignored |
//! | `GET` | `/api/reminders` | JSON snapshot of all stored reminders |
//! | `GET` | `/api/health` | `{"status": "ok", "reminders": N}` |
//!
//! When `is_group` is omitted, conversation ids ending in `@g.us` are
//! treated as group chats.
//!
//! # Quick start
//!
//! ```ignore
//! use remind_web::{WebConfig, spawn_web};
//!
//! let addr = spawn_web(router, WebConfig::default()).await?;
//! println!("Listening on http://{addr}");
//! ```

mod api;
mod server;

pub use api::{GROUP_SUFFIX, MessageRequest, ReplyBody, is_group_conversation};

use std::net::SocketAddr;

use remind_rs::router::MessageRouter;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3001`.
    pub bind_addr: SocketAddr,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
        }
    }
}

/// Bind the server and serve it on a Tokio task.
///
/// Returns the bound address (useful with port 0). The server runs until the
/// Tokio runtime shuts down.
pub async fn spawn_web(router: MessageRouter, config: WebConfig) -> std::io::Result<SocketAddr> {
    let app = server::build_router(router);
    server::start_server(app, config.bind_addr).await
}
