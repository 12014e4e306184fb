//! Conversational reminder intake agent.
//!
//! `remind-rs` takes free-text chat messages, decides whether each one is a
//! command (`help`, `list`, `clear`) or a natural-language reminder request,
//! and turns reminder requests into structured records by asking an LLM
//! (via the [OpenRouter](https://openrouter.ai/) chat completions API) to
//! extract `task`, `time` and `date` fields.
//!
//! The pipeline, leaf-first:
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`store`] | [`ReminderStore`](store::ReminderStore): append-only, in-memory, clearable |
//! | [`extract`] | [`ExtractionClient`](extract::ExtractionClient): prompt, fence stripping, strict parsing |
//! | [`format`] | Fixed reply templates |
//! | [`router`] | [`MessageRouter`](router::MessageRouter): classification and dispatch |
//! | [`heartbeat`] | Periodic no-op tick that only logs |
//! | [`api`] | Backend seam, retry with backoff, correlation ids |
//!
//! Transports live outside this crate. The `remind` binary is a console
//! transport (one direct conversation on stdin/stdout) and the `remind-web`
//! crate exposes the router over HTTP.
//!
//! # Example
//!
//! ```ignore
//! use remind_rs::prelude::*;
//! use std::sync::Arc;
//!
//! let client = OpenRouterClient::new(std::env::var("OPENROUTER_KEY")?)?;
//! let store = Arc::new(ReminderStore::new());
//! let extractor = ExtractionClient::new(Arc::new(client), AgentConfig::default());
//! let router = MessageRouter::new(store.clone(), Arc::new(extractor));
//!
//! let reply = router
//!     .handle(&InboundMessage::direct("alice", "Remind me to call mom at 6pm"))
//!     .await;
//! ```

pub mod api;
pub mod config;
pub mod extract;
pub mod format;
pub mod heartbeat;
pub mod prelude;
pub mod router;
pub mod store;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

// ── Constants ──────────────────────────────────────────────────────

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model for extraction calls.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Environment variable holding the backend credential.
pub const API_KEY_ENV: &str = "OPENROUTER_KEY";

// ── Schema generation ──────────────────────────────────────────────

/// Generate a JSON Schema `serde_json::Value` from a type that implements
/// `schemars::JsonSchema`.
///
/// ```
/// use remind_rs::json_schema_for;
/// use remind_rs::extract::ExtractedReminder;
///
/// let schema = json_schema_for::<ExtractedReminder>();
/// assert_eq!(schema["type"], "object");
/// assert_eq!(schema["required"].as_array().unwrap().len(), 3);
/// ```
pub fn json_schema_for<T: JsonSchema>() -> serde_json::Value {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object", "properties": {}}))
}

// ── Request types ──────────────────────────────────────────────────

/// Chat completion request body. Only the fields extraction needs; unset
/// optional fields are omitted from serialization.
#[derive(Serialize, Debug, Default)]
pub struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    pub messages: Vec<Message>,

    #[serde(skip_serializing_if = "is_zero_u32")]
    pub max_tokens: u32,
    /// Sampling temperature. `Some(0.0)` is sent as-is; `None` leaves the
    /// provider default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

/// JSON output format type.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ResponseFormatType {
    #[serde(rename = "json_object")]
    JsonObject,
    #[serde(rename = "json_schema")]
    JsonSchema,
}

/// JSON output mode.
#[derive(Serialize, Debug)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub fmt_type: ResponseFormatType,
    /// Schema payload, only sent with [`ResponseFormatType::JsonSchema`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<JsonSchemaFormat>,
}

impl ResponseFormat {
    /// Strict structured output constrained to the given schema.
    pub fn json_schema(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            fmt_type: ResponseFormatType::JsonSchema,
            json_schema: Some(JsonSchemaFormat {
                name: name.into(),
                strict: true,
                schema,
            }),
        }
    }
}

/// Named schema for `response_format.type = "json_schema"`.
#[derive(Serialize, Debug)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: serde_json::Value,
}

// ── Message types ──────────────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A message in the completion request.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub role: MessageRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: Some(content.into()),
        }
    }
}

// ── Response types ─────────────────────────────────────────────────

/// Raw API response (internal deserialization target).
#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

/// Clean return type from `OpenRouterClient::chat()`.
#[derive(Debug)]
pub struct ChatCompletion {
    pub content: Option<String>,
    pub usage: Option<UsageInfo>,
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the OpenRouter chat completions API.
pub struct OpenRouterClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) referer: String,
    pub(crate) title: String,
}

impl OpenRouterClient {
    /// Create a new client with the given API key and default headers.
    pub fn new(api_key: impl Into<String>) -> Result<Self, String> {
        Self::with_headers(api_key, "https://github.com/remind-rs", "remind-rs")
    }

    /// Create a client from the `OPENROUTER_KEY` environment variable.
    pub fn from_env() -> Result<Self, String> {
        let api_key =
            std::env::var(API_KEY_ENV).map_err(|_| format!("{API_KEY_ENV} not set"))?;
        if api_key.trim().is_empty() {
            return Err(format!("{API_KEY_ENV} is empty"));
        }
        Self::new(api_key)
    }

    /// Create a new client with custom Referer and X-Title headers.
    pub fn with_headers(
        api_key: impl Into<String>,
        referer: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent("remind-rs/0.1")
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            referer: referer.into(),
            title: title.into(),
        })
    }

    /// Send a chat completion request.
    pub async fn chat(&self, body: &ChatRequest) -> Result<ChatCompletion, String> {
        debug!(
            "LLM request: model={}, messages={}, max_tokens={}, temp={:?}",
            body.model.as_deref().unwrap_or("(none)"),
            body.messages.len(),
            body.max_tokens,
            body.temperature,
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(OPENROUTER_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| format!("failed to read response: {e}"))?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(format!("OpenRouter API HTTP {status}: {text}"));
        }

        let parsed: RawChatResponse =
            serde_json::from_str(&text).map_err(|e| format!("failed to parse response: {e}"))?;

        if let Some(err) = parsed.error {
            return Err(format!("OpenRouter API error: {}", err.message));
        }

        if let Some(ref usage) = parsed.usage {
            debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens.unwrap_or(0),
                usage.completion_tokens.unwrap_or(0),
                usage.total_tokens.unwrap_or(0),
            );
        }

        match parsed.choices.and_then(|c| c.into_iter().next()) {
            Some(c) => {
                debug!(
                    "LLM output: {} chars",
                    c.message.content.as_ref().map_or(0, |s| s.len())
                );
                Ok(ChatCompletion {
                    content: c.message.content,
                    usage: parsed.usage,
                    finish_reason: c.finish_reason,
                })
            }
            None => {
                debug!("LLM output: empty (no choices)");
                Ok(ChatCompletion {
                    content: None,
                    usage: parsed.usage,
                    finish_reason: None,
                })
            }
        }
    }
}
