//! Backend interaction layer: the completion seam, retry, and correlation ids.
//!
//! - [`backend`]: [`CompletionBackend`], the one-method trait the
//!   extraction client calls. Implemented by
//!   [`OpenRouterClient`](crate::OpenRouterClient) and by [`FnBackend`] for
//!   closures.
//! - [`retry`]: classification of backend failures (429, 5xx, transport
//!   errors, attempt timeouts are transient) with configurable exponential
//!   backoff and jitter. Never retries 4xx rejections.
//! - [`tracing`]: per-message correlation ids for log lines.

pub mod backend;
pub mod retry;
pub mod tracing;

pub use backend::{CompletionBackend, CompletionFuture, CompletionRequest, FnBackend};
pub use retry::{Failure, RetryConfig};
pub use tracing::generate_message_id;
