//! The completion seam between extraction and the text model.
//!
//! Extraction only ever needs "send this prompt, give me the text back", so
//! the backend is a single-method trait. Errors stay as strings in the
//! OpenRouter client's format (`"request failed: …"`, `"… HTTP 503: …"`) so
//! [`Failure::classify`](super::retry::Failure::classify) can sort them.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::{ChatRequest, Message, OpenRouterClient, ResponseFormat};

/// Boxed future returned by [`CompletionBackend::complete`].
pub type CompletionFuture<'a> = Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>;

/// One text-completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// When set, ask the backend to constrain output to this JSON Schema.
    pub response_schema: Option<serde_json::Value>,
}

/// A text-completion service.
pub trait CompletionBackend: Send + Sync {
    /// Complete the prompt and return the raw response text.
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a>;
}

impl CompletionBackend for OpenRouterClient {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        Box::pin(async move {
            let body = ChatRequest {
                model: Some(request.model.clone()),
                messages: vec![Message::user(&request.prompt)],
                max_tokens: request.max_tokens,
                temperature: Some(request.temperature),
                response_format: request
                    .response_schema
                    .clone()
                    .map(|schema| ResponseFormat::json_schema("reminder", schema)),
                ..Default::default()
            };
            let completion = self.chat(&body).await?;
            Ok(completion.content.unwrap_or_default())
        })
    }
}

/// Closure-backed [`CompletionBackend`], for canned responses in demos and
/// tests.
///
/// ```
/// use remind_rs::api::FnBackend;
///
/// let backend = FnBackend::new(|_req| Ok(r#"{"task":"x","time":"6pm","date":"today"}"#.into()));
/// ```
pub struct FnBackend<F> {
    f: F,
}

impl<F> FnBackend<F> {
    pub fn new(f: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, String> + Send + Sync,
    {
        Self { f }
    }
}

impl<F> CompletionBackend for FnBackend<F>
where
    F: Fn(&CompletionRequest) -> Result<String, String> + Send + Sync,
{
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> CompletionFuture<'a> {
        let result = (self.f)(request);
        Box::pin(async move { result })
    }
}

impl<F> fmt::Debug for FnBackend<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnBackend").finish_non_exhaustive()
    }
}
