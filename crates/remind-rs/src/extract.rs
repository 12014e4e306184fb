//! Structured reminder extraction through a text-completion backend.
//!
//! The backend gets one fixed prompt asking for a bare JSON object with
//! `task`, `time` and `date`. Whatever comes back is untrusted: surrounding
//! code fences are stripped, then the remainder must parse as exactly that
//! object (three string fields, nothing else) or the extraction fails.
//!
//! All failures reach the caller as one [`ExtractionError`] type, with a
//! variant per cause so logs can tell them apart:
//!
//! | Variant | Cause |
//! |---------|-------|
//! | [`BackendUnavailable`](ExtractionError::BackendUnavailable) | HTTP/network error, quota, attempt timeout |
//! | [`MalformedResponse`](ExtractionError::MalformedResponse) | not JSON, not an object, wrong types, extra keys |
//! | [`IncompleteResult`](ExtractionError::IncompleteResult) | a required key missing or null, or a blank task |

use std::sync::{Arc, LazyLock};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::api::backend::{CompletionBackend, CompletionRequest};
use crate::api::retry::ATTEMPT_TIMED_OUT;
use crate::config::AgentConfig;
use crate::json_schema_for;

/// Sentinel for a reminder without a time.
pub const TIME_NOT_SPECIFIED: &str = "not specified";

/// Sentinel for a reminder without a date.
pub const DATE_TODAY: &str = "today";

const REQUIRED_FIELDS: [&str; 3] = ["task", "time", "date"];

/// The structured result of one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExtractedReminder {
    /// What to do.
    pub task: String,
    /// Time mentioned, or `"not specified"`.
    pub time: String,
    /// Date mentioned, or `"today"`.
    pub date: String,
}

/// Why an extraction failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("extraction backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("malformed extraction response: {0}")]
    MalformedResponse(String),
    #[error("incomplete extraction result: missing `{0}`")]
    IncompleteResult(&'static str),
}

impl ExtractionError {
    /// Stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::BackendUnavailable(_) => "backend_unavailable",
            ExtractionError::MalformedResponse(_) => "malformed_response",
            ExtractionError::IncompleteResult(_) => "incomplete_result",
        }
    }
}

static RESPONSE_VALIDATOR: LazyLock<Option<jsonschema::Validator>> =
    LazyLock::new(|| jsonschema::validator_for(&json_schema_for::<ExtractedReminder>()).ok());

/// Build the extraction prompt for one message.
///
/// The message is embedded as a JSON string literal so quotes and newlines
/// in user text cannot break out of the instruction.
pub fn build_prompt(text: &str) -> String {
    let quoted = serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""));
    format!(
        "Extract reminder details from: {quoted}\n\n\
         Return ONLY a JSON object like this:\n\
         {{\"task\": \"what to do\", \"time\": \"time mentioned or '{TIME_NOT_SPECIFIED}'\", \
         \"date\": \"date mentioned or '{DATE_TODAY}'\"}}"
    )
}

/// Remove a leading ```` ``` ```` fence (with optional language tag) and a
/// trailing ```` ``` ```` fence, then trim.
///
/// ```
/// use remind_rs::extract::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
/// assert_eq!(strip_code_fence("  {} "), "{}");
/// ```
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// Strictly parse a raw backend response into an [`ExtractedReminder`].
pub fn parse_extraction(raw: &str) -> Result<ExtractedReminder, ExtractionError> {
    let cleaned = strip_code_fence(raw);
    if cleaned.is_empty() {
        return Err(ExtractionError::MalformedResponse("empty response".into()));
    }

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| ExtractionError::MalformedResponse(format!("not JSON: {e}")))?;

    let Some(object) = value.as_object() else {
        return Err(ExtractionError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        )));
    };

    for field in REQUIRED_FIELDS {
        if object.get(field).is_none_or(Value::is_null) {
            return Err(ExtractionError::IncompleteResult(field));
        }
    }

    if let Some(validator) = RESPONSE_VALIDATOR.as_ref() {
        let errors: Vec<String> = validator
            .iter_errors(&value)
            .map(|e| format!("{}: {e}", e.instance_path()))
            .collect();
        if !errors.is_empty() {
            return Err(ExtractionError::MalformedResponse(errors.join("; ")));
        }
    }

    let parsed: ExtractedReminder = serde_json::from_value(value)
        .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

    let task = parsed.task.trim();
    if task.is_empty() {
        return Err(ExtractionError::IncompleteResult("task"));
    }

    Ok(ExtractedReminder {
        task: task.to_string(),
        time: or_sentinel(&parsed.time, TIME_NOT_SPECIFIED),
        date: or_sentinel(&parsed.date, DATE_TODAY),
    })
}

fn or_sentinel(value: &str, sentinel: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        sentinel.to_string()
    } else {
        trimmed.to_string()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Client ─────────────────────────────────────────────────────────

/// Turns free text into an [`ExtractedReminder`] via a [`CompletionBackend`].
pub struct ExtractionClient {
    backend: Arc<dyn CompletionBackend>,
    config: AgentConfig,
}

impl ExtractionClient {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: AgentConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// The backend request for one message.
    pub fn request_for(&self, text: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            prompt: build_prompt(text),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            response_schema: self
                .config
                .structured_output
                .then(json_schema_for::<ExtractedReminder>),
        }
    }

    /// Extract reminder fields from `text`.
    pub async fn extract(&self, text: &str) -> Result<ExtractedReminder, ExtractionError> {
        let request = self.request_for(text);
        let raw = self.complete_with_retry(&request).await?;
        trace!("Extraction response: {raw}");
        let extracted = parse_extraction(&raw)?;
        debug!(
            "Extracted task={:?} time={:?} date={:?}",
            extracted.task, extracted.time, extracted.date
        );
        Ok(extracted)
    }

    async fn complete_with_retry(
        &self,
        request: &CompletionRequest,
    ) -> Result<String, ExtractionError> {
        let timeout = self.config.request_timeout;
        let mut attempt = 0;
        loop {
            let outcome = match tokio::time::timeout(timeout, self.backend.complete(request)).await
            {
                Ok(result) => result,
                Err(_) => Err(format!(
                    "{ATTEMPT_TIMED_OUT} after {:.1}s",
                    timeout.as_secs_f64()
                )),
            };

            match outcome {
                Ok(text) => return Ok(text),
                Err(e) if self.config.retry.should_retry(attempt, &e) => {
                    let delay = self.config.retry.delay_for_attempt(attempt);
                    warn!(
                        "Extraction attempt {} failed: {e}. Retrying in {:.1}s",
                        attempt + 1,
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(ExtractionError::BackendUnavailable(e)),
            }
        }
    }
}
