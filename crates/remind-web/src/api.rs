//! REST endpoint handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use remind_rs::router::{InboundMessage, MessageRouter};
use remind_rs::store::ReminderRecord;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Conversation id suffix WhatsApp uses for group chats.
pub const GROUP_SUFFIX: &str = "@g.us";

/// Whether a conversation id names a group chat.
pub fn is_group_conversation(conversation_id: &str) -> bool {
    conversation_id.ends_with(GROUP_SUFFIX)
}

/// Shared application state passed to all handlers via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub router: MessageRouter,
}

/// Request body for POST /api/message.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageRequest {
    pub conversation_id: String,
    pub text: String,
    /// Explicit group flag; inferred from the conversation id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_group: Option<bool>,
}

impl MessageRequest {
    pub fn into_inbound(self) -> InboundMessage {
        let is_group = self
            .is_group
            .unwrap_or_else(|| is_group_conversation(&self.conversation_id));
        InboundMessage {
            conversation_id: self.conversation_id,
            is_group,
            text: self.text,
        }
    }
}

/// Response body for a handled message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyBody {
    pub reply: String,
}

/// POST /api/message: Handle one inbound chat message.
///
/// Returns 200 with the reply, 204 when the message is ignored (group
/// chats), 400 for a blank conversation id.
///
/// Handling runs on its own task, so a caller that disconnects mid-request
/// does not cancel an extraction that is already under way.
pub async fn post_message(
    State(app): State<AppState>,
    Json(body): Json<MessageRequest>,
) -> Response {
    if body.conversation_id.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "conversation_id must not be empty").into_response();
    }

    let message = body.into_inbound();
    let router = app.router.clone();
    let handled = tokio::spawn(async move { router.handle(&message).await }).await;

    match handled {
        Ok(Some(reply)) => (StatusCode::OK, Json(ReplyBody { reply })).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Message handler task failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// GET /api/reminders: All stored reminders, in insertion order.
pub async fn get_reminders(State(app): State<AppState>) -> Json<Vec<ReminderRecord>> {
    Json(app.router.store().list())
}

/// GET /api/health: Liveness plus the current reminder count.
pub async fn get_health(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "reminders": app.router.store().len(),
    }))
}
