//! Axum server setup and router construction.

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};
use remind_rs::router::MessageRouter;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::{self, AppState};

/// Build the axum router for all endpoints.
pub fn build_router(router: MessageRouter) -> Router {
    let state = AppState { router };

    Router::new()
        .route("/api/message", post(api::post_message))
        .route("/api/reminders", get(api::get_reminders))
        .route("/api/health", get(api::get_health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind `bind_addr`, spawn the server, and return the bound address.
pub async fn start_server(app: Router, bind_addr: SocketAddr) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;
    info!("Listening on http://{addr}");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {e}");
        }
    });

    Ok(addr)
}
